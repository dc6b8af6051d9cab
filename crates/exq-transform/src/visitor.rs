//! Traversal entry point for the existential access rewrite.

use crate::classifier::RewriteContext;
use crate::config::ExistentialOptions;
use crate::error::RewriteError;
use crate::rewrite::{build_replacement, plan_rewrite};
use exq_ast::{NodeIndex, Traversal, TraversalError, TraversalReport, VisitContext, Visitor};
use exq_ast::{NodeArena, syntax_kind_ext};
use serde::Serialize;
use tracing::debug;

/// Per-run counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteStats {
    /// Sentinel accesses seen.
    pub matched: usize,
    /// Substitutions requested.
    pub rewritten: usize,
    pub member_branches: usize,
    pub call_branches: usize,
}

/// Rewrites every `x.ex` property access it is handed.
///
/// Registered for property access nodes. The only state is [`RewriteStats`],
/// which accumulates across runs and never influences how a match is
/// rewritten, so one visitor can be reused over any number of trees.
pub struct ExistentialAccessVisitor {
    options: ExistentialOptions,
    stats: RewriteStats,
}

impl ExistentialAccessVisitor {
    pub fn new(options: ExistentialOptions) -> Self {
        ExistentialAccessVisitor {
            options,
            stats: RewriteStats::default(),
        }
    }

    pub fn stats(&self) -> RewriteStats {
        self.stats
    }
}

impl Default for ExistentialAccessVisitor {
    fn default() -> Self {
        Self::new(ExistentialOptions::default())
    }
}

impl Visitor for ExistentialAccessVisitor {
    type Error = RewriteError;

    fn node_kind(&self) -> u16 {
        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
    }

    fn enter(&mut self, cx: &mut VisitContext<'_>) -> Result<(), RewriteError> {
        let current = cx.current();
        let Some(plan) = plan_rewrite(cx.arena(), current, &self.options)? else {
            return Ok(());
        };
        self.stats.matched += 1;

        let replacement = build_replacement(cx.factory(), &plan, &self.options)?;
        cx.replace_with(replacement.target, replacement.node)?;

        self.stats.rewritten += 1;
        match plan.context {
            RewriteContext::Member => self.stats.member_branches += 1,
            RewriteContext::Call { .. } => self.stats.call_branches += 1,
        }
        debug!(
            node = current.0,
            replacement = replacement.node.0,
            "existential access rewritten"
        );
        Ok(())
    }
}

/// Result of [`run_existential_pass`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassOutcome {
    pub report: TraversalReport,
    pub stats: RewriteStats,
}

/// One full pass over the tree rooted at `root`.
pub fn run_existential_pass(
    arena: &mut NodeArena,
    root: NodeIndex,
    options: &ExistentialOptions,
) -> Result<PassOutcome, TraversalError<RewriteError>> {
    let mut visitor = ExistentialAccessVisitor::new(options.clone());
    let report = Traversal::new(arena, root).run(&mut visitor)?;
    Ok(PassOutcome {
        report,
        stats: visitor.stats(),
    })
}
