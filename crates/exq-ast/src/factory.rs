//! Node builders.
//!
//! [`NodeFactory`] is the capability set a rewrite rule receives from the
//! host for constructing new nodes. Rules are generic over it and never
//! allocate nodes any other way. [`NodeArena`] is the reference
//! implementation; every node it builds through this trait is flagged
//! [`NodeFlags::SYNTHESIZED`].

use crate::base::{NodeIndex, NodeList};
use crate::flags::NodeFlags;
use crate::node::{
    AccessExprData, BinaryExprData, CallExprData, ConditionalExprData, NodeArena, UnaryExprData,
};
use crate::syntax_kind::{SyntaxKind, syntax_kind_ext};

/// Constructors for expression nodes.
pub trait NodeFactory {
    /// `left <operator> right` for comparison and arithmetic operators
    fn create_binary(&mut self, left: NodeIndex, operator: SyntaxKind, right: NodeIndex)
    -> NodeIndex;

    /// `left && right`, `left || right`, `left ?? right`
    fn create_logical(
        &mut self,
        left: NodeIndex,
        operator: SyntaxKind,
        right: NodeIndex,
    ) -> NodeIndex;

    /// `condition ? when_true : when_false`
    fn create_conditional(
        &mut self,
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    ) -> NodeIndex;

    /// Prefix unary: `typeof x`, `void 0`, `!x`, `-x`
    fn create_unary(&mut self, operator: SyntaxKind, operand: NodeIndex) -> NodeIndex;

    fn create_call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex;

    fn create_identifier(&mut self, name: &str) -> NodeIndex;

    fn create_boolean_literal(&mut self, value: bool) -> NodeIndex;

    fn create_null_literal(&mut self) -> NodeIndex;

    fn create_numeric_literal(&mut self, value: f64) -> NodeIndex;

    fn create_string_literal(&mut self, value: &str) -> NodeIndex;

    /// Deep copy of the subtree rooted at `idx`.
    ///
    /// Nodes have a single parent, so an expression used in several operand
    /// positions needs one copy per position.
    fn clone_node(&mut self, idx: NodeIndex) -> NodeIndex;

    /// `void 0`
    fn create_void_zero(&mut self) -> NodeIndex {
        let zero = self.create_numeric_literal(0.0);
        self.create_unary(SyntaxKind::VoidKeyword, zero)
    }
}

impl NodeArena {
    fn synthesized(&mut self, idx: NodeIndex) -> NodeIndex {
        self.mark(idx, NodeFlags::SYNTHESIZED);
        idx
    }
}

impl NodeFactory for NodeArena {
    fn create_binary(
        &mut self,
        left: NodeIndex,
        operator: SyntaxKind,
        right: NodeIndex,
    ) -> NodeIndex {
        let idx = self.add_binary_expr(BinaryExprData {
            left,
            operator_token: operator as u16,
            right,
        });
        self.synthesized(idx)
    }

    fn create_logical(
        &mut self,
        left: NodeIndex,
        operator: SyntaxKind,
        right: NodeIndex,
    ) -> NodeIndex {
        debug_assert!(
            operator.is_logical_operator(),
            "create_logical called with non-logical operator {operator:?}"
        );
        self.create_binary(left, operator, right)
    }

    fn create_conditional(
        &mut self,
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    ) -> NodeIndex {
        let idx = self.add_conditional_expr(ConditionalExprData {
            condition,
            when_true,
            when_false,
        });
        self.synthesized(idx)
    }

    fn create_unary(&mut self, operator: SyntaxKind, operand: NodeIndex) -> NodeIndex {
        let idx = self.add_unary_expr(UnaryExprData {
            operator: operator as u16,
            operand,
        });
        self.synthesized(idx)
    }

    fn create_call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        let idx = self.add_call_expr(CallExprData {
            expression: callee,
            arguments: NodeList::from_vec(arguments),
        });
        self.synthesized(idx)
    }

    fn create_identifier(&mut self, name: &str) -> NodeIndex {
        let idx = self.add_identifier(name);
        self.synthesized(idx)
    }

    fn create_boolean_literal(&mut self, value: bool) -> NodeIndex {
        let kind = if value {
            SyntaxKind::TrueKeyword
        } else {
            SyntaxKind::FalseKeyword
        };
        let idx = self.add_token(kind);
        self.synthesized(idx)
    }

    fn create_null_literal(&mut self) -> NodeIndex {
        let idx = self.add_token(SyntaxKind::NullKeyword);
        self.synthesized(idx)
    }

    fn create_numeric_literal(&mut self, value: f64) -> NodeIndex {
        let idx = self.add_numeric_literal(format!("{value}"), value);
        self.synthesized(idx)
    }

    fn create_string_literal(&mut self, value: &str) -> NodeIndex {
        let idx = self.add_string_literal(value);
        self.synthesized(idx)
    }

    fn clone_node(&mut self, idx: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(idx).copied() else {
            return NodeIndex::NONE;
        };

        let cloned = match node.kind {
            k if k == SyntaxKind::Identifier as u16 => match self.get_identifier(&node) {
                Some(id) => {
                    let text = id.escaped_text.clone();
                    self.add_identifier(text)
                }
                None => return NodeIndex::NONE,
            },
            k if k == SyntaxKind::NumericLiteral as u16 => match self.get_literal(&node) {
                Some(lit) => {
                    let (text, value) = (lit.text.clone(), lit.value.unwrap_or_default());
                    self.add_numeric_literal(text, value)
                }
                None => return NodeIndex::NONE,
            },
            k if k == SyntaxKind::StringLiteral as u16 => match self.get_literal(&node) {
                Some(lit) => {
                    let text = lit.text.clone();
                    self.add_string_literal(text)
                }
                None => return NodeIndex::NONE,
            },
            syntax_kind_ext::BINARY_EXPRESSION => {
                let Some(bin) = self.get_binary_expr(&node).cloned() else {
                    return NodeIndex::NONE;
                };
                let left = self.clone_node(bin.left);
                let right = self.clone_node(bin.right);
                self.add_binary_expr(BinaryExprData {
                    left,
                    operator_token: bin.operator_token,
                    right,
                })
            }
            syntax_kind_ext::PREFIX_UNARY_EXPRESSION => {
                let Some(unary) = self.get_unary_expr(&node).cloned() else {
                    return NodeIndex::NONE;
                };
                let operand = self.clone_node(unary.operand);
                self.add_unary_expr(UnaryExprData {
                    operator: unary.operator,
                    operand,
                })
            }
            syntax_kind_ext::CALL_EXPRESSION => {
                let Some(call) = self.get_call_expr(&node).cloned() else {
                    return NodeIndex::NONE;
                };
                let callee = self.clone_node(call.expression);
                let arguments = call
                    .arguments
                    .nodes
                    .iter()
                    .map(|&arg| self.clone_node(arg))
                    .collect();
                self.add_call_expr(CallExprData {
                    expression: callee,
                    arguments: NodeList::from_vec(arguments),
                })
            }
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
            | syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => {
                let Some(access) = self.get_access_expr(&node).cloned() else {
                    return NodeIndex::NONE;
                };
                let expression = self.clone_node(access.expression);
                let name_or_argument = self.clone_node(access.name_or_argument);
                self.add_access_expr(
                    node.kind,
                    AccessExprData {
                        expression,
                        name_or_argument,
                    },
                )
            }
            syntax_kind_ext::CONDITIONAL_EXPRESSION => {
                let Some(cond) = self.get_conditional_expr(&node).cloned() else {
                    return NodeIndex::NONE;
                };
                let condition = self.clone_node(cond.condition);
                let when_true = self.clone_node(cond.when_true);
                let when_false = self.clone_node(cond.when_false);
                self.add_conditional_expr(ConditionalExprData {
                    condition,
                    when_true,
                    when_false,
                })
            }
            syntax_kind_ext::PARENTHESIZED_EXPRESSION => {
                let Some(paren) = self.get_parenthesized(&node).cloned() else {
                    return NodeIndex::NONE;
                };
                let inner = self.clone_node(paren.expression);
                self.add_parenthesized(inner)
            }
            // Data-less tokens: true, false, null, this
            kind if !node.has_data() => self.push_token_kind(kind),
            _ => return NodeIndex::NONE,
        };

        // Copies inherit the source's flags minus detachment
        let flags = node.node_flags().difference(NodeFlags::DETACHED);
        self.mark(cloned, flags);
        cloned
    }
}

impl NodeArena {
    fn push_token_kind(&mut self, kind: u16) -> NodeIndex {
        match SyntaxKind::from_u16(kind) {
            Some(token) => self.add_token(token),
            None => NodeIndex::NONE,
        }
    }
}
