//! Reference traversal host.
//!
//! Walks the tree in post-order and calls a [`Visitor`] on every node of the
//! kind it registered for. A visitor may request one substitution per
//! callback through [`VisitContext::replace_with`]; the traversal commits it
//! right after the callback returns and never descends into the replacement
//! within the same pass.
//!
//! Post-order means an access's object has already been visited (and
//! possibly rewritten) by the time the access itself is visited, so nested
//! matches such as `a.ex.ex` are rewritten inside out.

use crate::base::NodeIndex;
use crate::factory::NodeFactory;
use crate::node::{NodeArena, SubstituteError};
use crate::path::NodePath;
use crate::syntax_kind::syntax_kind_ext;
use thiserror::Error;
use tracing::{debug, trace};

/// Maximum recursion depth for AST traversal to prevent stack overflow
pub const MAX_AST_DEPTH: u32 = 500;

/// A rewrite callback registered for one node kind.
pub trait Visitor {
    type Error: std::error::Error + 'static;

    /// Node kind this visitor is registered for.
    fn node_kind(&self) -> u16;

    /// Called once per node of `node_kind()` after its children.
    fn enter(&mut self, cx: &mut VisitContext<'_>) -> Result<(), Self::Error>;
}

/// A requested swap of `target` for `node`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Substitution {
    pub target: NodeIndex,
    pub node: NodeIndex,
}

/// Per-callback handle given to a [`Visitor`].
pub struct VisitContext<'a> {
    arena: &'a mut NodeArena,
    current: NodeIndex,
    requested: Option<Substitution>,
}

impl<'a> VisitContext<'a> {
    pub fn new(arena: &'a mut NodeArena, current: NodeIndex) -> Self {
        Self {
            arena,
            current,
            requested: None,
        }
    }

    /// The node being visited.
    pub fn current(&self) -> NodeIndex {
        self.current
    }

    /// Read-only path for the node being visited.
    pub fn path(&self) -> NodePath<'_> {
        NodePath::new(self.arena, self.current)
    }

    pub fn arena(&self) -> &NodeArena {
        self.arena
    }

    /// Node builders for constructing the replacement.
    pub fn factory(&mut self) -> &mut impl NodeFactory {
        &mut *self.arena
    }

    /// Request that `target` (the current node or one of its ancestors) be
    /// swapped for `node`. Only one request per callback is accepted.
    pub fn replace_with(&mut self, target: NodeIndex, node: NodeIndex) -> Result<(), VisitError> {
        if let Some(existing) = self.requested {
            return Err(VisitError::DuplicateSubstitution {
                target: existing.target,
            });
        }
        let is_current_or_ancestor = target == self.current
            || self.path().ancestors().any(|ancestor| ancestor.index() == target);
        if !is_current_or_ancestor {
            return Err(VisitError::TargetOutOfScope {
                current: self.current,
                target,
            });
        }
        self.requested = Some(Substitution { target, node });
        Ok(())
    }

    pub fn requested(&self) -> Option<Substitution> {
        self.requested
    }
}

/// Rejected substitution request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VisitError {
    #[error("a substitution for {target:?} was already requested in this callback")]
    DuplicateSubstitution { target: NodeIndex },
    #[error("substitution target {target:?} is not {current:?} or one of its ancestors")]
    TargetOutOfScope { current: NodeIndex, target: NodeIndex },
}

#[derive(Debug, Error)]
pub enum TraversalError<E: std::error::Error + 'static> {
    #[error("visitor failed at {node:?}: {source}")]
    Visitor {
        node: NodeIndex,
        #[source]
        source: E,
    },
    #[error(transparent)]
    Substitute(#[from] SubstituteError),
    #[error("tree is deeper than {limit} levels at {node:?}")]
    DepthExceeded { node: NodeIndex, limit: u32 },
}

/// Outcome of one traversal pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraversalReport {
    /// Root after the pass (differs from the input root if it was replaced)
    pub root: NodeIndex,
    /// Nodes of the registered kind that were handed to the visitor
    pub visited: usize,
    pub substitutions: usize,
}

/// One post-order pass over a tree.
pub struct Traversal<'a> {
    arena: &'a mut NodeArena,
    root: NodeIndex,
    visited: usize,
    substitutions: usize,
    /// Current recursion depth for stack overflow protection
    depth: u32,
}

impl<'a> Traversal<'a> {
    pub fn new(arena: &'a mut NodeArena, root: NodeIndex) -> Self {
        Self {
            arena,
            root,
            visited: 0,
            substitutions: 0,
            depth: 0,
        }
    }

    /// Run `visitor` over the whole tree.
    pub fn run<V: Visitor>(
        mut self,
        visitor: &mut V,
    ) -> Result<TraversalReport, TraversalError<V::Error>> {
        let kind = visitor.node_kind();
        debug!(
            root = self.root.0,
            kind = syntax_kind_ext::kind_name(kind),
            "traversal start"
        );
        self.visit(self.root, kind, visitor)?;
        let report = TraversalReport {
            root: self.root,
            visited: self.visited,
            substitutions: self.substitutions,
        };
        debug!(?report, "traversal done");
        Ok(report)
    }

    fn visit<V: Visitor>(
        &mut self,
        idx: NodeIndex,
        kind: u16,
        visitor: &mut V,
    ) -> Result<(), TraversalError<V::Error>> {
        if self.depth >= MAX_AST_DEPTH {
            return Err(TraversalError::DepthExceeded {
                node: idx,
                limit: MAX_AST_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.visit_inner(idx, kind, visitor);
        self.depth -= 1;
        result
    }

    fn visit_inner<V: Visitor>(
        &mut self,
        idx: NodeIndex,
        kind: u16,
        visitor: &mut V,
    ) -> Result<(), TraversalError<V::Error>> {
        for child in self.arena.children(idx) {
            self.visit(child, kind, visitor)?;
        }

        let Some(node) = self.arena.get(idx) else {
            return Ok(());
        };
        // Replaced while visiting a descendant (substitution of an ancestor)
        if node.is_detached() || node.kind != kind {
            return Ok(());
        }

        self.visited += 1;
        let requested = {
            let mut cx = VisitContext::new(self.arena, idx);
            visitor
                .enter(&mut cx)
                .map_err(|source| TraversalError::Visitor { node: idx, source })?;
            cx.requested()
        };

        if let Some(Substitution { target, node }) = requested {
            trace!(replaced = target.0, replacement = node.0, "committing substitution");
            self.arena.substitute(target, node)?;
            self.substitutions += 1;
            if target == self.root {
                self.root = node;
            }
        }
        Ok(())
    }
}
