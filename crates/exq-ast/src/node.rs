//! Arena storage for the expression tree.
//!
//! Each node is a small header ([`Node`]) holding its kind, flags and an
//! index into a typed data pool. Parent pointers live in a side table
//! ([`ExtendedNodeInfo`]) so the header stays compact.
//!
//! Nodes are only ever appended. A substitution re-points the parent's child
//! slot at the new node and marks the old one [`NodeFlags::DETACHED`]; the
//! old node's data is left as it was.

use crate::base::{NodeIndex, NodeList};
use crate::flags::NodeFlags;
use crate::syntax_kind::{SyntaxKind, syntax_kind_ext};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Node header.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Node {
    /// `SyntaxKind` value or a `syntax_kind_ext` constant
    pub kind: u16,
    /// Packed `NodeFlags`
    pub flags: u16,
    /// Index into the kind-specific pool (`u32::MAX` = no data)
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    pub fn new(kind: u16) -> Node {
        Node {
            kind,
            flags: 0,
            data_index: Self::NO_DATA,
        }
    }

    #[inline]
    pub fn with_data(kind: u16, data_index: u32) -> Node {
        Node {
            kind,
            flags: 0,
            data_index,
        }
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.data_index != Self::NO_DATA
    }

    #[inline]
    pub fn node_flags(&self) -> NodeFlags {
        NodeFlags::from_bits_truncate(self.flags)
    }

    #[inline]
    pub fn is_detached(&self) -> bool {
        self.node_flags().contains(NodeFlags::DETACHED)
    }

    #[inline]
    pub fn is_synthesized(&self) -> bool {
        self.node_flags().contains(NodeFlags::SYNTHESIZED)
    }
}

/// Data for identifiers
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

/// Data for string and numeric literals
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiteralData {
    pub text: String,
    /// For numeric literals only
    pub value: Option<f64>,
}

/// Data for binary expressions (arithmetic, comparison, logical, assignment)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: u16, // SyntaxKind
    pub right: NodeIndex,
}

/// Data for prefix unary expressions (`typeof x`, `void 0`, `!x`)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnaryExprData {
    pub operator: u16, // SyntaxKind
    pub operand: NodeIndex,
}

/// Data for call expressions
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub arguments: NodeList,
}

/// Data for property/element access.
///
/// For property access `name_or_argument` is an identifier; for element
/// access it is an arbitrary expression.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParenthesizedData {
    pub expression: NodeIndex,
}

/// Data for expression statements
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExprStatementData {
    pub expression: NodeIndex,
}

/// Data for return statements (`NONE` for a bare `return;`)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceFileData {
    pub statements: NodeList,
}

/// Side-table entry for every node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
}

impl Default for ExtendedNodeInfo {
    fn default() -> Self {
        ExtendedNodeInfo {
            parent: NodeIndex::NONE,
        }
    }
}

/// Failure to commit a substitution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubstituteError {
    #[error("node {0:?} does not exist in the arena")]
    MissingNode(NodeIndex),
    #[error("node {0:?} is already detached from the tree")]
    AlreadyDetached(NodeIndex),
    #[error("parent {parent:?} does not hold {child:?} in any child slot")]
    NotAChild { parent: NodeIndex, child: NodeIndex },
}

// =============================================================================
// Node Arena
// =============================================================================

/// Arena for nodes with typed data pools.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,

    // Names and literals
    pub identifiers: Vec<IdentifierData>,
    pub literals: Vec<LiteralData>,

    // Expressions
    pub binary_exprs: Vec<BinaryExprData>,
    pub unary_exprs: Vec<UnaryExprData>,
    pub call_exprs: Vec<CallExprData>,
    pub access_exprs: Vec<AccessExprData>,
    pub conditional_exprs: Vec<ConditionalExprData>,
    pub parenthesized: Vec<ParenthesizedData>,

    // Statements
    pub expr_statements: Vec<ExprStatementData>,
    pub return_data: Vec<ReturnData>,
    pub source_files: Vec<SourceFileData>,

    // Parent pointers, one entry per node
    pub extended_info: Vec<ExtendedNodeInfo>,
}

/// Push `$data` into `$pool` and append a header of `$kind` pointing at it.
macro_rules! push_node {
    ($self:ident, $pool:ident, $kind:expr, $data:expr) => {{
        let data_index = $self.$pool.len() as u32;
        $self.$pool.push($data);
        $self.push_header(Node::with_data($kind, data_index))
    }};
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        let mut arena = NodeArena::default();
        arena.nodes = Vec::with_capacity(capacity);
        arena.extended_info = Vec::with_capacity(capacity);
        arena.identifiers = Vec::with_capacity(capacity / 3);
        arena.access_exprs = Vec::with_capacity(capacity / 8);
        arena.binary_exprs = Vec::with_capacity(capacity / 8);
        arena
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ============================================================================
    // Parent Mapping Helpers
    // ============================================================================

    /// Set the parent for a single child node.
    #[inline]
    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_some() {
            if let Some(info) = self.extended_info.get_mut(child.0 as usize) {
                info.parent = parent;
            }
        }
    }

    #[inline]
    fn set_parent_list(&mut self, list: &NodeList, parent: NodeIndex) {
        for &child in &list.nodes {
            self.set_parent(child, parent);
        }
    }

    fn push_header(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        self.extended_info.push(ExtendedNodeInfo::default());
        NodeIndex(index)
    }

    // ============================================================================
    // Node Creation Methods
    // ============================================================================

    /// Add a token node with no data (`true`, `false`, `null`, `this`)
    pub fn add_token(&mut self, kind: SyntaxKind) -> NodeIndex {
        self.push_header(Node::new(kind as u16))
    }

    pub fn add_identifier(&mut self, text: impl Into<String>) -> NodeIndex {
        push_node!(
            self,
            identifiers,
            SyntaxKind::Identifier as u16,
            IdentifierData {
                escaped_text: text.into(),
            }
        )
    }

    /// Add a numeric literal; `text` is kept verbatim for printing.
    pub fn add_numeric_literal(&mut self, text: impl Into<String>, value: f64) -> NodeIndex {
        push_node!(
            self,
            literals,
            SyntaxKind::NumericLiteral as u16,
            LiteralData {
                text: text.into(),
                value: Some(value),
            }
        )
    }

    /// Add a string literal; `text` is the unquoted value.
    pub fn add_string_literal(&mut self, text: impl Into<String>) -> NodeIndex {
        push_node!(
            self,
            literals,
            SyntaxKind::StringLiteral as u16,
            LiteralData {
                text: text.into(),
                value: None,
            }
        )
    }

    pub fn add_binary_expr(&mut self, data: BinaryExprData) -> NodeIndex {
        let (left, right) = (data.left, data.right);
        let parent = push_node!(self, binary_exprs, syntax_kind_ext::BINARY_EXPRESSION, data);
        self.set_parent(left, parent);
        self.set_parent(right, parent);
        parent
    }

    pub fn add_unary_expr(&mut self, data: UnaryExprData) -> NodeIndex {
        let operand = data.operand;
        let parent = push_node!(
            self,
            unary_exprs,
            syntax_kind_ext::PREFIX_UNARY_EXPRESSION,
            data
        );
        self.set_parent(operand, parent);
        parent
    }

    pub fn add_call_expr(&mut self, data: CallExprData) -> NodeIndex {
        let expression = data.expression;
        let arguments = data.arguments.clone();
        let parent = push_node!(self, call_exprs, syntax_kind_ext::CALL_EXPRESSION, data);
        self.set_parent(expression, parent);
        self.set_parent_list(&arguments, parent);
        parent
    }

    /// Add a property access (`kind = PROPERTY_ACCESS_EXPRESSION`) or an
    /// element access (`kind = ELEMENT_ACCESS_EXPRESSION`).
    pub fn add_access_expr(&mut self, kind: u16, data: AccessExprData) -> NodeIndex {
        debug_assert!(
            kind == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
                || kind == syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION
        );
        let (expression, name) = (data.expression, data.name_or_argument);
        let parent = push_node!(self, access_exprs, kind, data);
        self.set_parent(expression, parent);
        self.set_parent(name, parent);
        parent
    }

    pub fn add_conditional_expr(&mut self, data: ConditionalExprData) -> NodeIndex {
        let children = [data.condition, data.when_true, data.when_false];
        let parent = push_node!(
            self,
            conditional_exprs,
            syntax_kind_ext::CONDITIONAL_EXPRESSION,
            data
        );
        for child in children {
            self.set_parent(child, parent);
        }
        parent
    }

    pub fn add_parenthesized(&mut self, expression: NodeIndex) -> NodeIndex {
        let parent = push_node!(
            self,
            parenthesized,
            syntax_kind_ext::PARENTHESIZED_EXPRESSION,
            ParenthesizedData { expression }
        );
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        let parent = push_node!(
            self,
            expr_statements,
            syntax_kind_ext::EXPRESSION_STATEMENT,
            ExprStatementData { expression }
        );
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_return_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        let parent = push_node!(
            self,
            return_data,
            syntax_kind_ext::RETURN_STATEMENT,
            ReturnData { expression }
        );
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_source_file(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        let statements = NodeList::from_vec(statements);
        let list = statements.clone();
        let parent = push_node!(
            self,
            source_files,
            syntax_kind_ext::SOURCE_FILE,
            SourceFileData { statements }
        );
        self.set_parent_list(&list, parent);
        parent
    }

    /// Set flag bits on an existing node.
    pub fn mark(&mut self, idx: NodeIndex, flags: NodeFlags) {
        if let Some(node) = self.get_mut(idx) {
            node.flags |= flags.bits();
        }
    }

    // ============================================================================
    // Access Methods
    // ============================================================================

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_extended(&self, index: NodeIndex) -> Option<&ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get(index.0 as usize)
        }
    }

    /// Parent of `index`, or `None` for the root and for unknown nodes.
    #[inline]
    pub fn parent_of(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.get_extended(index)?.parent.into_option()
    }

    #[inline]
    pub fn get_identifier(&self, node: &Node) -> Option<&IdentifierData> {
        if node.has_data() && node.kind == SyntaxKind::Identifier as u16 {
            self.identifiers.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_literal(&self, node: &Node) -> Option<&LiteralData> {
        if node.has_data()
            && (node.kind == SyntaxKind::NumericLiteral as u16
                || node.kind == SyntaxKind::StringLiteral as u16)
        {
            self.literals.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_binary_expr(&self, node: &Node) -> Option<&BinaryExprData> {
        if node.has_data() && node.kind == syntax_kind_ext::BINARY_EXPRESSION {
            self.binary_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_unary_expr(&self, node: &Node) -> Option<&UnaryExprData> {
        if node.has_data() && node.kind == syntax_kind_ext::PREFIX_UNARY_EXPRESSION {
            self.unary_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_call_expr(&self, node: &Node) -> Option<&CallExprData> {
        if node.has_data() && node.kind == syntax_kind_ext::CALL_EXPRESSION {
            self.call_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_access_expr(&self, node: &Node) -> Option<&AccessExprData> {
        use syntax_kind_ext::{ELEMENT_ACCESS_EXPRESSION, PROPERTY_ACCESS_EXPRESSION};
        if node.has_data()
            && (node.kind == PROPERTY_ACCESS_EXPRESSION || node.kind == ELEMENT_ACCESS_EXPRESSION)
        {
            self.access_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_conditional_expr(&self, node: &Node) -> Option<&ConditionalExprData> {
        if node.has_data() && node.kind == syntax_kind_ext::CONDITIONAL_EXPRESSION {
            self.conditional_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_parenthesized(&self, node: &Node) -> Option<&ParenthesizedData> {
        if node.has_data() && node.kind == syntax_kind_ext::PARENTHESIZED_EXPRESSION {
            self.parenthesized.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_expression_statement(&self, node: &Node) -> Option<&ExprStatementData> {
        if node.has_data() && node.kind == syntax_kind_ext::EXPRESSION_STATEMENT {
            self.expr_statements.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_return_statement(&self, node: &Node) -> Option<&ReturnData> {
        if node.has_data() && node.kind == syntax_kind_ext::RETURN_STATEMENT {
            self.return_data.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_source_file(&self, node: &Node) -> Option<&SourceFileData> {
        if node.has_data() && node.kind == syntax_kind_ext::SOURCE_FILE {
            self.source_files.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Identifier text of `idx`, if it is an identifier.
    pub fn identifier_text(&self, idx: NodeIndex) -> Option<&str> {
        let node = self.get(idx)?;
        self.get_identifier(node).map(|id| id.escaped_text.as_str())
    }

    /// Children of `idx` in source order.
    pub fn children(&self, idx: NodeIndex) -> SmallVec<[NodeIndex; 4]> {
        let mut out = SmallVec::new();
        let Some(node) = self.get(idx) else {
            return out;
        };
        match node.kind {
            syntax_kind_ext::SOURCE_FILE => {
                if let Some(sf) = self.get_source_file(node) {
                    out.extend(sf.statements.nodes.iter().copied());
                }
            }
            syntax_kind_ext::EXPRESSION_STATEMENT => {
                if let Some(stmt) = self.get_expression_statement(node) {
                    out.push(stmt.expression);
                }
            }
            syntax_kind_ext::RETURN_STATEMENT => {
                if let Some(ret) = self.get_return_statement(node) {
                    out.push(ret.expression);
                }
            }
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
            | syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => {
                if let Some(access) = self.get_access_expr(node) {
                    out.push(access.expression);
                    out.push(access.name_or_argument);
                }
            }
            syntax_kind_ext::CALL_EXPRESSION => {
                if let Some(call) = self.get_call_expr(node) {
                    out.push(call.expression);
                    out.extend(call.arguments.nodes.iter().copied());
                }
            }
            syntax_kind_ext::BINARY_EXPRESSION => {
                if let Some(bin) = self.get_binary_expr(node) {
                    out.push(bin.left);
                    out.push(bin.right);
                }
            }
            syntax_kind_ext::PREFIX_UNARY_EXPRESSION => {
                if let Some(unary) = self.get_unary_expr(node) {
                    out.push(unary.operand);
                }
            }
            syntax_kind_ext::CONDITIONAL_EXPRESSION => {
                if let Some(cond) = self.get_conditional_expr(node) {
                    out.push(cond.condition);
                    out.push(cond.when_true);
                    out.push(cond.when_false);
                }
            }
            syntax_kind_ext::PARENTHESIZED_EXPRESSION => {
                if let Some(paren) = self.get_parenthesized(node) {
                    out.push(paren.expression);
                }
            }
            _ => {}
        }
        out.retain(|child| child.is_some());
        out
    }

    // ============================================================================
    // Substitution
    // ============================================================================

    /// Swap `target` for `replacement` at the same tree position.
    ///
    /// The parent's child slot is re-pointed, `replacement` adopts the parent
    /// and `target` is marked detached. A root `target` (no parent) just
    /// becomes detached; the caller tracks the new root.
    pub fn substitute(
        &mut self,
        target: NodeIndex,
        replacement: NodeIndex,
    ) -> Result<(), SubstituteError> {
        let node = self.get(target).ok_or(SubstituteError::MissingNode(target))?;
        if node.is_detached() {
            return Err(SubstituteError::AlreadyDetached(target));
        }
        if self.get(replacement).is_none() {
            return Err(SubstituteError::MissingNode(replacement));
        }

        if let Some(parent) = self.parent_of(target) {
            if !self.replace_child_slot(parent, target, replacement) {
                return Err(SubstituteError::NotAChild {
                    parent,
                    child: target,
                });
            }
            self.set_parent(replacement, parent);
        } else {
            self.set_parent(replacement, NodeIndex::NONE);
        }

        self.set_parent(target, NodeIndex::NONE);
        self.mark(target, NodeFlags::DETACHED);
        Ok(())
    }

    /// Re-point the slot of `parent` that holds `old` at `new`.
    fn replace_child_slot(&mut self, parent: NodeIndex, old: NodeIndex, new: NodeIndex) -> bool {
        let Some(node) = self.get(parent).copied() else {
            return false;
        };
        let slot = node.data_index as usize;

        fn swap(field: &mut NodeIndex, old: NodeIndex, new: NodeIndex) -> bool {
            if *field == old {
                *field = new;
                true
            } else {
                false
            }
        }

        fn swap_list(list: &mut NodeList, old: NodeIndex, new: NodeIndex) -> bool {
            match list.nodes.iter_mut().find(|n| **n == old) {
                Some(entry) => {
                    *entry = new;
                    true
                }
                None => false,
            }
        }

        match node.kind {
            syntax_kind_ext::SOURCE_FILE => self
                .source_files
                .get_mut(slot)
                .is_some_and(|sf| swap_list(&mut sf.statements, old, new)),
            syntax_kind_ext::EXPRESSION_STATEMENT => self
                .expr_statements
                .get_mut(slot)
                .is_some_and(|s| swap(&mut s.expression, old, new)),
            syntax_kind_ext::RETURN_STATEMENT => self
                .return_data
                .get_mut(slot)
                .is_some_and(|r| swap(&mut r.expression, old, new)),
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
            | syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => {
                self.access_exprs.get_mut(slot).is_some_and(|a| {
                    swap(&mut a.expression, old, new) || swap(&mut a.name_or_argument, old, new)
                })
            }
            syntax_kind_ext::CALL_EXPRESSION => self.call_exprs.get_mut(slot).is_some_and(|c| {
                swap(&mut c.expression, old, new) || swap_list(&mut c.arguments, old, new)
            }),
            syntax_kind_ext::BINARY_EXPRESSION => self
                .binary_exprs
                .get_mut(slot)
                .is_some_and(|b| swap(&mut b.left, old, new) || swap(&mut b.right, old, new)),
            syntax_kind_ext::PREFIX_UNARY_EXPRESSION => self
                .unary_exprs
                .get_mut(slot)
                .is_some_and(|u| swap(&mut u.operand, old, new)),
            syntax_kind_ext::CONDITIONAL_EXPRESSION => {
                self.conditional_exprs.get_mut(slot).is_some_and(|c| {
                    swap(&mut c.condition, old, new)
                        || swap(&mut c.when_true, old, new)
                        || swap(&mut c.when_false, old, new)
                })
            }
            syntax_kind_ext::PARENTHESIZED_EXPRESSION => self
                .parenthesized
                .get_mut(slot)
                .is_some_and(|p| swap(&mut p.expression, old, new)),
            _ => false,
        }
    }
}
