//! Expression tree host for the exq rewrite pipeline.
//!
//! This crate provides what a rewrite rule is registered against:
//! - Arena storage with parent pointers (`NodeArena`, `NodeIndex`)
//! - Node builders (`NodeFactory`)
//! - Non-owning navigation (`NodePath`)
//! - A post-order traversal host (`Traversal`, `Visitor`, `VisitContext`)
//! - ESTree JSON interchange (`Estree`)
//! - A compact JavaScript printer for diagnostics and tests

pub mod base;
pub use base::{NodeIndex, NodeList};

pub mod flags;
pub use flags::NodeFlags;

pub mod syntax_kind;
pub use syntax_kind::{SyntaxKind, syntax_kind_ext};

pub mod node;
pub use node::{Node, NodeArena, SubstituteError};

pub mod factory;
pub use factory::NodeFactory;

pub mod path;
pub use path::NodePath;

pub mod traverse;
pub use traverse::{
    Substitution, Traversal, TraversalError, TraversalReport, VisitContext, VisitError, Visitor,
};

pub mod estree;
pub use estree::{Estree, EstreeError};

pub mod printer;
pub use printer::Printer;
