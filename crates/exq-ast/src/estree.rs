//! ESTree-shaped JSON interchange.
//!
//! The host pipeline hands trees around as ESTree JSON (the format emitted
//! by most JavaScript parsers). [`Estree`] mirrors the subset of node types
//! the arena models; [`Estree::lower`] imports a tree into a [`NodeArena`]
//! and [`Estree::raise`] exports an arena subtree back.

use crate::base::{NodeIndex, NodeList};
use crate::node::{
    AccessExprData, BinaryExprData, CallExprData, ConditionalExprData, NodeArena, UnaryExprData,
};
use crate::syntax_kind::{SyntaxKind, syntax_kind_ext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Estree {
    Program {
        body: Vec<Estree>,
    },
    ExpressionStatement {
        expression: Box<Estree>,
    },
    ReturnStatement {
        #[serde(default)]
        argument: Option<Box<Estree>>,
    },
    Identifier {
        name: String,
    },
    Literal {
        value: serde_json::Value,
    },
    ThisExpression,
    MemberExpression {
        object: Box<Estree>,
        property: Box<Estree>,
        #[serde(default)]
        computed: bool,
    },
    CallExpression {
        callee: Box<Estree>,
        #[serde(default)]
        arguments: Vec<Estree>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Estree>,
        right: Box<Estree>,
    },
    LogicalExpression {
        operator: String,
        left: Box<Estree>,
        right: Box<Estree>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<Estree>,
        right: Box<Estree>,
    },
    UnaryExpression {
        operator: String,
        argument: Box<Estree>,
        #[serde(default = "default_prefix")]
        prefix: bool,
    },
    ConditionalExpression {
        test: Box<Estree>,
        consequent: Box<Estree>,
        alternate: Box<Estree>,
    },
    ParenthesizedExpression {
        expression: Box<Estree>,
    },
}

fn default_prefix() -> bool {
    true
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstreeError {
    #[error("unsupported operator `{operator}` in {node_type}")]
    UnsupportedOperator {
        node_type: &'static str,
        operator: String,
    },
    #[error("unsupported literal value {0}")]
    UnsupportedLiteral(serde_json::Value),
    #[error("postfix unary expressions are not supported")]
    PostfixUnary,
    #[error("non-computed member property must be an Identifier")]
    InvalidMemberProperty,
    #[error("node {0:?} does not exist in the arena")]
    MissingNode(NodeIndex),
    #[error("node {index:?} of kind {kind} has no ESTree form")]
    UnsupportedKind { index: NodeIndex, kind: &'static str },
}

impl Estree {
    pub fn identifier(name: impl Into<String>) -> Self {
        Estree::Identifier { name: name.into() }
    }

    /// Import this tree into `arena`, returning the root index.
    pub fn lower(&self, arena: &mut NodeArena) -> Result<NodeIndex, EstreeError> {
        Ok(match self {
            Estree::Program { body } => {
                let statements = body
                    .iter()
                    .map(|stmt| stmt.lower(arena))
                    .collect::<Result<Vec<_>, _>>()?;
                arena.add_source_file(statements)
            }
            Estree::ExpressionStatement { expression } => {
                let expression = expression.lower(arena)?;
                arena.add_expression_statement(expression)
            }
            Estree::ReturnStatement { argument } => {
                let expression = match argument {
                    Some(arg) => arg.lower(arena)?,
                    None => NodeIndex::NONE,
                };
                arena.add_return_statement(expression)
            }
            Estree::Identifier { name } => arena.add_identifier(name.as_str()),
            Estree::Literal { value } => lower_literal(value, arena)?,
            Estree::ThisExpression => arena.add_token(SyntaxKind::ThisKeyword),
            Estree::MemberExpression {
                object,
                property,
                computed,
            } => {
                let expression = object.lower(arena)?;
                let (kind, name_or_argument) = if *computed {
                    (
                        syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
                        property.lower(arena)?,
                    )
                } else {
                    let Estree::Identifier { name } = property.as_ref() else {
                        return Err(EstreeError::InvalidMemberProperty);
                    };
                    (
                        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                        arena.add_identifier(name.as_str()),
                    )
                };
                arena.add_access_expr(
                    kind,
                    AccessExprData {
                        expression,
                        name_or_argument,
                    },
                )
            }
            Estree::CallExpression { callee, arguments } => {
                let expression = callee.lower(arena)?;
                let arguments = arguments
                    .iter()
                    .map(|arg| arg.lower(arena))
                    .collect::<Result<Vec<_>, _>>()?;
                arena.add_call_expr(CallExprData {
                    expression,
                    arguments: NodeList::from_vec(arguments),
                })
            }
            Estree::BinaryExpression {
                operator,
                left,
                right,
            } => lower_binary("BinaryExpression", operator, left, right, arena, |op| {
                !op.is_logical_operator()
                    && op != SyntaxKind::EqualsToken
                    && op.text().is_some_and(|t| t != "typeof" && t != "void" && t != "!")
            })?,
            Estree::LogicalExpression {
                operator,
                left,
                right,
            } => lower_binary("LogicalExpression", operator, left, right, arena, |op| {
                op.is_logical_operator()
            })?,
            Estree::AssignmentExpression {
                operator,
                left,
                right,
            } => lower_binary("AssignmentExpression", operator, left, right, arena, |op| {
                op == SyntaxKind::EqualsToken
            })?,
            Estree::UnaryExpression {
                operator,
                argument,
                prefix,
            } => {
                if !*prefix {
                    return Err(EstreeError::PostfixUnary);
                }
                let op = SyntaxKind::from_operator_text(operator)
                    .filter(|op| {
                        matches!(
                            op,
                            SyntaxKind::TypeOfKeyword
                                | SyntaxKind::VoidKeyword
                                | SyntaxKind::ExclamationToken
                                | SyntaxKind::MinusToken
                                | SyntaxKind::PlusToken
                        )
                    })
                    .ok_or_else(|| EstreeError::UnsupportedOperator {
                        node_type: "UnaryExpression",
                        operator: operator.clone(),
                    })?;
                let operand = argument.lower(arena)?;
                arena.add_unary_expr(UnaryExprData {
                    operator: op as u16,
                    operand,
                })
            }
            Estree::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                let condition = test.lower(arena)?;
                let when_true = consequent.lower(arena)?;
                let when_false = alternate.lower(arena)?;
                arena.add_conditional_expr(ConditionalExprData {
                    condition,
                    when_true,
                    when_false,
                })
            }
            Estree::ParenthesizedExpression { expression } => {
                let inner = expression.lower(arena)?;
                arena.add_parenthesized(inner)
            }
        })
    }

    /// Export the subtree rooted at `idx`.
    pub fn raise(arena: &NodeArena, idx: NodeIndex) -> Result<Estree, EstreeError> {
        let node = arena.get(idx).ok_or(EstreeError::MissingNode(idx))?;
        let unsupported = || EstreeError::UnsupportedKind {
            index: idx,
            kind: syntax_kind_ext::kind_name(node.kind),
        };
        let boxed = |child: NodeIndex| Estree::raise(arena, child).map(Box::new);

        Ok(match node.kind {
            syntax_kind_ext::SOURCE_FILE => {
                let sf = arena.get_source_file(node).ok_or_else(unsupported)?;
                Estree::Program {
                    body: sf
                        .statements
                        .nodes
                        .iter()
                        .map(|&stmt| Estree::raise(arena, stmt))
                        .collect::<Result<_, _>>()?,
                }
            }
            syntax_kind_ext::EXPRESSION_STATEMENT => {
                let stmt = arena.get_expression_statement(node).ok_or_else(unsupported)?;
                Estree::ExpressionStatement {
                    expression: boxed(stmt.expression)?,
                }
            }
            syntax_kind_ext::RETURN_STATEMENT => {
                let ret = arena.get_return_statement(node).ok_or_else(unsupported)?;
                Estree::ReturnStatement {
                    argument: match ret.expression.into_option() {
                        Some(expr) => Some(boxed(expr)?),
                        None => None,
                    },
                }
            }
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
            | syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => {
                let access = arena.get_access_expr(node).ok_or_else(unsupported)?;
                Estree::MemberExpression {
                    object: boxed(access.expression)?,
                    property: boxed(access.name_or_argument)?,
                    computed: node.kind == syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
                }
            }
            syntax_kind_ext::CALL_EXPRESSION => {
                let call = arena.get_call_expr(node).ok_or_else(unsupported)?;
                Estree::CallExpression {
                    callee: boxed(call.expression)?,
                    arguments: call
                        .arguments
                        .nodes
                        .iter()
                        .map(|&arg| Estree::raise(arena, arg))
                        .collect::<Result<_, _>>()?,
                }
            }
            syntax_kind_ext::BINARY_EXPRESSION => {
                let bin = arena.get_binary_expr(node).ok_or_else(unsupported)?;
                let op = SyntaxKind::from_u16(bin.operator_token).ok_or_else(unsupported)?;
                let operator = op.text().ok_or_else(unsupported)?.to_string();
                let (left, right) = (boxed(bin.left)?, boxed(bin.right)?);
                if op == SyntaxKind::EqualsToken {
                    Estree::AssignmentExpression {
                        operator,
                        left,
                        right,
                    }
                } else if op.is_logical_operator() {
                    Estree::LogicalExpression {
                        operator,
                        left,
                        right,
                    }
                } else {
                    Estree::BinaryExpression {
                        operator,
                        left,
                        right,
                    }
                }
            }
            syntax_kind_ext::PREFIX_UNARY_EXPRESSION => {
                let unary = arena.get_unary_expr(node).ok_or_else(unsupported)?;
                let operator = SyntaxKind::from_u16(unary.operator)
                    .and_then(SyntaxKind::text)
                    .ok_or_else(unsupported)?;
                Estree::UnaryExpression {
                    operator: operator.to_string(),
                    argument: boxed(unary.operand)?,
                    prefix: true,
                }
            }
            syntax_kind_ext::CONDITIONAL_EXPRESSION => {
                let cond = arena.get_conditional_expr(node).ok_or_else(unsupported)?;
                Estree::ConditionalExpression {
                    test: boxed(cond.condition)?,
                    consequent: boxed(cond.when_true)?,
                    alternate: boxed(cond.when_false)?,
                }
            }
            syntax_kind_ext::PARENTHESIZED_EXPRESSION => {
                let paren = arena.get_parenthesized(node).ok_or_else(unsupported)?;
                Estree::ParenthesizedExpression {
                    expression: boxed(paren.expression)?,
                }
            }
            k if k == SyntaxKind::Identifier as u16 => {
                let id = arena.get_identifier(node).ok_or_else(unsupported)?;
                Estree::identifier(id.escaped_text.as_str())
            }
            k if k == SyntaxKind::StringLiteral as u16 => {
                let lit = arena.get_literal(node).ok_or_else(unsupported)?;
                Estree::Literal {
                    value: serde_json::Value::String(lit.text.clone()),
                }
            }
            k if k == SyntaxKind::NumericLiteral as u16 => {
                let lit = arena.get_literal(node).ok_or_else(unsupported)?;
                let number = lit.value.and_then(json_number).ok_or_else(unsupported)?;
                Estree::Literal {
                    value: serde_json::Value::Number(number),
                }
            }
            k if k == SyntaxKind::TrueKeyword as u16 => Estree::Literal {
                value: serde_json::Value::Bool(true),
            },
            k if k == SyntaxKind::FalseKeyword as u16 => Estree::Literal {
                value: serde_json::Value::Bool(false),
            },
            k if k == SyntaxKind::NullKeyword as u16 => Estree::Literal {
                value: serde_json::Value::Null,
            },
            k if k == SyntaxKind::ThisKeyword as u16 => Estree::ThisExpression,
            _ => return Err(unsupported()),
        })
    }
}

/// Whole numbers within the safe integer range come back as JSON integers.
fn json_number(value: f64) -> Option<serde_json::Number> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Some(serde_json::Number::from(value as i64))
    } else {
        serde_json::Number::from_f64(value)
    }
}

fn lower_literal(
    value: &serde_json::Value,
    arena: &mut NodeArena,
) -> Result<NodeIndex, EstreeError> {
    Ok(match value {
        serde_json::Value::Null => arena.add_token(SyntaxKind::NullKeyword),
        serde_json::Value::Bool(true) => arena.add_token(SyntaxKind::TrueKeyword),
        serde_json::Value::Bool(false) => arena.add_token(SyntaxKind::FalseKeyword),
        serde_json::Value::String(text) => arena.add_string_literal(text.as_str()),
        serde_json::Value::Number(number) => {
            let parsed = number
                .as_f64()
                .ok_or_else(|| EstreeError::UnsupportedLiteral(value.clone()))?;
            arena.add_numeric_literal(number.to_string(), parsed)
        }
        other => return Err(EstreeError::UnsupportedLiteral(other.clone())),
    })
}

fn lower_binary(
    node_type: &'static str,
    operator: &str,
    left: &Estree,
    right: &Estree,
    arena: &mut NodeArena,
    accepts: impl Fn(SyntaxKind) -> bool,
) -> Result<NodeIndex, EstreeError> {
    let op = SyntaxKind::from_operator_text(operator)
        .filter(|&op| accepts(op))
        .ok_or_else(|| EstreeError::UnsupportedOperator {
            node_type,
            operator: operator.to_string(),
        })?;
    let left = left.lower(arena)?;
    let right = right.lower(arena)?;
    Ok(arena.add_binary_expr(BinaryExprData {
        left,
        operator_token: op as u16,
        right,
    }))
}
