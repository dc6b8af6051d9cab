//! Existential access rewrite.
//!
//! Rewrites the sentinel access `x.ex` into a guarded conditional that only
//! evaluates `x` when it is neither `undefined` nor `null`:
//!
//! ```text
//! b = a.ex;   =>  b = typeof a !== "undefined" && a !== null ? a : void 0;
//! a.ex;       =>  typeof a !== "undefined" && a !== null ? true : false;
//! ```
//!
//! The crate is layered leaf first:
//! - [`guards`]: `typeof`/`null` comparison builders
//! - [`branches`]: member and call-position conditionals
//! - [`classifier`]: syntactic context of a match
//! - [`rewrite`]: match, plan and build (no mutation of the existing tree)
//! - [`visitor`]: the [`exq_ast::Visitor`] that commits substitutions

pub mod branches;
pub mod classifier;
pub mod config;
pub mod error;
pub mod guards;
pub mod rewrite;
pub mod visitor;

pub use classifier::RewriteContext;
pub use config::{CallPositionMode, ExistentialOptions, NullGuardOperand};
pub use error::RewriteError;
pub use rewrite::{
    Replacement, RewritePlan, build_replacement, plan_rewrite, rewrite_existential_access,
};
pub use visitor::{ExistentialAccessVisitor, PassOutcome, RewriteStats, run_existential_pass};
