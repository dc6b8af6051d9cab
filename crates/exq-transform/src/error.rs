//! Errors raised while matching or rewriting an existential access.

use exq_ast::{NodeIndex, VisitError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("node {0:?} is not in the arena")]
    MissingNode(NodeIndex),

    /// The access has no identifier name (computed `a[x]` access).
    #[error("member access {0:?} has no property name")]
    MissingPropertyName(NodeIndex),

    #[error("call-position rewrite of {0:?} without an enclosing call")]
    MissingCallParent(NodeIndex),

    #[error("node {node:?} is malformed: expected {expected}")]
    MalformedNode {
        node: NodeIndex,
        expected: &'static str,
    },

    #[error(transparent)]
    Substitution(#[from] VisitError),
}

pub type Result<T> = std::result::Result<T, RewriteError>;
