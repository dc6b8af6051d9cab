//! Match and rewrite of a single existential access.
//!
//! [`plan_rewrite`] reads the tree and decides what to do; [`build_replacement`]
//! allocates the replacement through any [`NodeFactory`]. Neither commits the
//! substitution, so the pair can be driven by any traversal engine.
//! [`rewrite_existential_access`] combines both over a [`NodeArena`].

use crate::classifier::{self, RewriteContext};
use crate::config::{ExistentialOptions, NullGuardOperand};
use crate::error::{Result, RewriteError};
use crate::guards::GuardSubject;
use crate::branches;
use exq_ast::{NodeArena, NodeFactory, NodeIndex, NodePath, SyntaxKind, syntax_kind_ext};
use tracing::{debug, trace};

/// A node to swap into the tree in place of `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Replacement {
    pub target: NodeIndex,
    pub node: NodeIndex,
}

/// Everything read from the tree that the builders need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewritePlan {
    /// The matched access.
    pub access: NodeIndex,
    /// The access's object expression.
    pub base: NodeIndex,
    /// The sentinel name identifier.
    pub name: NodeIndex,
    pub context: RewriteContext,
    /// Whether the value of the substituted node is used.
    pub consumed: bool,
}

impl RewritePlan {
    /// Node the replacement is substituted for.
    pub fn target(&self) -> NodeIndex {
        match &self.context {
            RewriteContext::Member => self.access,
            RewriteContext::Call { call, .. } => *call,
        }
    }
}

/// Decide whether `node` is a sentinel access, and how to rewrite it.
///
/// Returns `Ok(None)` for anything that is not a dotted access named after
/// the sentinel. Computed access (`a["ex"]`) never matches.
pub fn plan_rewrite(
    arena: &NodeArena,
    node: NodeIndex,
    options: &ExistentialOptions,
) -> Result<Option<RewritePlan>> {
    let access_node = arena.get(node).ok_or(RewriteError::MissingNode(node))?;
    if access_node.kind != syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION {
        return Ok(None);
    }
    let access = arena
        .get_access_expr(access_node)
        .ok_or(RewriteError::MalformedNode {
            node,
            expected: "property access data",
        })?;

    let name_node = arena
        .get(access.name_or_argument)
        .filter(|n| n.kind == SyntaxKind::Identifier as u16)
        .ok_or(RewriteError::MissingPropertyName(node))?;
    let name = arena
        .get_identifier(name_node)
        .ok_or(RewriteError::MissingPropertyName(node))?;

    if !options.is_sentinel(&name.escaped_text) {
        trace!(node = node.0, name = %name.escaped_text, "not a sentinel access");
        return Ok(None);
    }
    if access.expression.is_none() {
        return Err(RewriteError::MalformedNode {
            node,
            expected: "object expression",
        });
    }

    let path = NodePath::new(arena, node);
    let context = classifier::select_context(path, options)?;
    let consumed = match &context {
        RewriteContext::Member => classifier::result_is_consumed(path),
        RewriteContext::Call { call, .. } => {
            classifier::result_is_consumed(NodePath::new(arena, *call))
        }
    };

    debug!(
        node = node.0,
        context = context.name(),
        consumed,
        "sentinel access matched"
    );
    Ok(Some(RewritePlan {
        access: node,
        base: access.expression,
        name: access.name_or_argument,
        context,
        consumed,
    }))
}

/// Build `test ? consequent : alternative` for `plan`.
pub fn build_replacement<F: NodeFactory>(
    factory: &mut F,
    plan: &RewritePlan,
    options: &ExistentialOptions,
) -> Result<Replacement> {
    let subject = match options.null_guard {
        NullGuardOperand::BaseObject => GuardSubject::new(plan.base),
        NullGuardOperand::PropertyName => GuardSubject::new(plan.base).with_null_operand(plan.name),
    };

    let node = match &plan.context {
        RewriteContext::Member => branches::member_branch(factory, subject, plan.consumed)?,
        RewriteContext::Call { arguments, .. } => {
            branches::call_branch(factory, subject, arguments.clone(), plan.consumed)?
        }
    };

    Ok(Replacement {
        target: plan.target(),
        node,
    })
}

/// Match `node` and build its replacement without committing it.
///
/// In call-branch mode the enclosing call's arguments are adopted by the new
/// call, so the returned replacement should be substituted.
pub fn rewrite_existential_access(
    arena: &mut NodeArena,
    node: NodeIndex,
    options: &ExistentialOptions,
) -> Result<Option<Replacement>> {
    let Some(plan) = plan_rewrite(arena, node, options)? else {
        return Ok(None);
    };
    build_replacement(arena, &plan, options).map(Some)
}
