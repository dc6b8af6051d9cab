//! Guard expression builders.
//!
//! Each builder takes the subject expression by index and places a fresh
//! deep copy of it in every operand position, so the caller's node is never
//! adopted by the guard.
//!
//! ```text
//! exists(x)                  typeof x !== "undefined" && x !== null
//! exists_and_not_callable(x) exists(x) && typeof x !== "function"
//! ```

use crate::error::{Result, RewriteError};
use exq_ast::{NodeFactory, NodeIndex, SyntaxKind};

/// Subject of the existence checks.
///
/// `null_operand` is what the `!== null` half compares; normally the same
/// expression as `subject`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardSubject {
    pub subject: NodeIndex,
    pub null_operand: NodeIndex,
}

impl GuardSubject {
    pub fn new(subject: NodeIndex) -> Self {
        GuardSubject {
            subject,
            null_operand: subject,
        }
    }

    pub fn with_null_operand(mut self, operand: NodeIndex) -> Self {
        self.null_operand = operand;
        self
    }
}

fn copy_of<F: NodeFactory>(factory: &mut F, expr: NodeIndex) -> Result<NodeIndex> {
    let copy = factory.clone_node(expr);
    if copy.is_none() {
        return Err(RewriteError::MissingNode(expr));
    }
    Ok(copy)
}

/// `left !== right`, taking ownership of both operands.
pub fn not_equal<F: NodeFactory>(factory: &mut F, left: NodeIndex, right: NodeIndex) -> NodeIndex {
    factory.create_binary(left, SyntaxKind::ExclamationEqualsEqualsToken, right)
}

/// `typeof expr !== "<type_name>"`
pub fn typeof_not_equal<F: NodeFactory>(
    factory: &mut F,
    expr: NodeIndex,
    type_name: &str,
) -> Result<NodeIndex> {
    let operand = copy_of(factory, expr)?;
    let type_of = factory.create_unary(SyntaxKind::TypeOfKeyword, operand);
    let name = factory.create_string_literal(type_name);
    Ok(not_equal(factory, type_of, name))
}

pub fn is_not_undefined<F: NodeFactory>(factory: &mut F, expr: NodeIndex) -> Result<NodeIndex> {
    typeof_not_equal(factory, expr, "undefined")
}

/// `expr !== null`
pub fn is_not_null<F: NodeFactory>(factory: &mut F, expr: NodeIndex) -> Result<NodeIndex> {
    let operand = copy_of(factory, expr)?;
    let null = factory.create_null_literal();
    Ok(not_equal(factory, operand, null))
}

pub fn is_not_function<F: NodeFactory>(factory: &mut F, expr: NodeIndex) -> Result<NodeIndex> {
    typeof_not_equal(factory, expr, "function")
}

/// `typeof x !== "undefined" && x !== null`
pub fn exists_guard<F: NodeFactory>(factory: &mut F, subject: GuardSubject) -> Result<NodeIndex> {
    let defined = is_not_undefined(factory, subject.subject)?;
    let not_null = is_not_null(factory, subject.null_operand)?;
    Ok(factory.create_logical(defined, SyntaxKind::AmpersandAmpersandToken, not_null))
}

/// `exists(x) && typeof x !== "function"`
pub fn exists_and_is_not_callable_guard<F: NodeFactory>(
    factory: &mut F,
    subject: GuardSubject,
) -> Result<NodeIndex> {
    let exists = exists_guard(factory, subject)?;
    let not_function = is_not_function(factory, subject.subject)?;
    Ok(factory.create_logical(exists, SyntaxKind::AmpersandAmpersandToken, not_function))
}
