//! Syntactic context of a matched access.
//!
//! All predicates are pure reads over a [`NodePath`]; they never touch the
//! arena mutably and are total over missing parents.

use crate::config::{CallPositionMode, ExistentialOptions};
use crate::error::{Result, RewriteError};
use exq_ast::{NodeIndex, NodePath, syntax_kind_ext};
use tracing::warn;

/// Which branch family rewrites a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewriteContext {
    /// Rewrite the access node itself.
    Member,
    /// Replace the enclosing call; its arguments move to the new call.
    Call {
        call: NodeIndex,
        arguments: Vec<NodeIndex>,
    },
}

impl RewriteContext {
    pub fn name(&self) -> &'static str {
        match self {
            RewriteContext::Member => "member",
            RewriteContext::Call { .. } => "call",
        }
    }
}

pub fn has_parent(path: NodePath<'_>) -> bool {
    path.parent().is_some()
}

/// True unless the value is discarded by an enclosing expression statement.
///
/// A node without a parent counts as consumed.
pub fn result_is_consumed(path: NodePath<'_>) -> bool {
    path.parent()
        .is_none_or(|parent| parent.kind() != Some(syntax_kind_ext::EXPRESSION_STATEMENT))
}

/// True when the node is the callee (not an argument) of its parent call.
pub fn is_call_target(path: NodePath<'_>) -> bool {
    let Some(parent) = path.parent() else {
        return false;
    };
    let Some(node) = parent.node() else {
        return false;
    };
    if node.kind != syntax_kind_ext::CALL_EXPRESSION {
        return false;
    }
    path.arena()
        .get_call_expr(node)
        .is_some_and(|call| call.expression == path.index())
}

/// True when the grandparent is itself a member access (`x.y.z` seen from `x`).
///
/// Computed access (`x.y[z]`) counts as a member access too.
pub fn scope_is_accessed(path: NodePath<'_>) -> bool {
    path.grandparent().and_then(|gp| gp.kind()).is_some_and(|kind| {
        kind == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
            || kind == syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION
    })
}

/// Pick the branch family for the access at `path`.
pub fn select_context(path: NodePath<'_>, options: &ExistentialOptions) -> Result<RewriteContext> {
    if !is_call_target(path) {
        return Ok(RewriteContext::Member);
    }

    match options.call_position {
        CallPositionMode::MemberBranch => {
            warn!(
                node = path.index().0,
                "call target rewritten with member branch"
            );
            Ok(RewriteContext::Member)
        }
        CallPositionMode::CallBranch => {
            let parent = path
                .parent()
                .ok_or(RewriteError::MissingCallParent(path.index()))?;
            let call = parent
                .node()
                .and_then(|node| path.arena().get_call_expr(node))
                .ok_or(RewriteError::MissingCallParent(path.index()))?;
            Ok(RewriteContext::Call {
                call: parent.index(),
                arguments: call.arguments.nodes.clone(),
            })
        }
    }
}
