//! Compact JavaScript rendering of arena trees.
//!
//! Output is single-line per statement with precedence-driven
//! parenthesisation. It exists for diagnostics, CLI text output and tests;
//! comments, formatting and source positions are not preserved.

use crate::base::NodeIndex;
use crate::node::NodeArena;
use crate::syntax_kind::{SyntaxKind, syntax_kind_ext};
use std::fmt::Write;

mod precedence {
    pub const LOWEST: u8 = 0;
    pub const ASSIGNMENT: u8 = 2;
    pub const CONDITIONAL: u8 = 3;
    pub const LOGICAL_OR: u8 = 4;
    pub const LOGICAL_AND: u8 = 5;
    pub const EQUALITY: u8 = 9;
    pub const RELATIONAL: u8 = 10;
    pub const ADDITIVE: u8 = 12;
    pub const MULTIPLICATIVE: u8 = 13;
    pub const UNARY: u8 = 15;
    pub const MEMBER: u8 = 18;
    pub const PRIMARY: u8 = 20;
}

pub struct Printer<'a> {
    arena: &'a NodeArena,
    out: String,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        Self {
            arena,
            out: String::new(),
        }
    }

    /// Render `idx` (a statement, a source file or an expression).
    pub fn print_to_string(arena: &NodeArena, idx: NodeIndex) -> String {
        let mut printer = Printer::new(arena);
        printer.emit(idx);
        printer.out
    }

    pub fn emit(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        match node.kind {
            syntax_kind_ext::SOURCE_FILE => {
                if let Some(sf) = arena.get_source_file(node) {
                    for (i, &stmt) in sf.statements.nodes.iter().enumerate() {
                        if i > 0 {
                            self.out.push('\n');
                        }
                        self.emit(stmt);
                    }
                }
            }
            syntax_kind_ext::EXPRESSION_STATEMENT => {
                if let Some(stmt) = arena.get_expression_statement(node) {
                    self.emit_expr(stmt.expression, precedence::LOWEST);
                    self.out.push(';');
                }
            }
            syntax_kind_ext::RETURN_STATEMENT => {
                if let Some(ret) = arena.get_return_statement(node) {
                    self.out.push_str("return");
                    if ret.expression.is_some() {
                        self.out.push(' ');
                        self.emit_expr(ret.expression, precedence::LOWEST);
                    }
                    self.out.push(';');
                }
            }
            _ => self.emit_expr(idx, precedence::LOWEST),
        }
    }

    fn precedence_of(&self, idx: NodeIndex) -> u8 {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return precedence::PRIMARY;
        };
        match node.kind {
            syntax_kind_ext::CONDITIONAL_EXPRESSION => precedence::CONDITIONAL,
            syntax_kind_ext::BINARY_EXPRESSION => arena
                .get_binary_expr(node)
                .and_then(|bin| SyntaxKind::from_u16(bin.operator_token))
                .map_or(precedence::LOWEST, operator_precedence),
            syntax_kind_ext::PREFIX_UNARY_EXPRESSION => precedence::UNARY,
            syntax_kind_ext::CALL_EXPRESSION
            | syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
            | syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => precedence::MEMBER,
            _ => precedence::PRIMARY,
        }
    }

    fn emit_expr(&mut self, idx: NodeIndex, min_precedence: u8) {
        if self.precedence_of(idx) < min_precedence {
            self.out.push('(');
            self.emit_expr_inner(idx);
            self.out.push(')');
        } else {
            self.emit_expr_inner(idx);
        }
    }

    fn emit_expr_inner(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };

        match node.kind {
            k if k == SyntaxKind::Identifier as u16 => {
                if let Some(id) = arena.get_identifier(node) {
                    self.out.push_str(&id.escaped_text);
                }
            }
            k if k == SyntaxKind::NumericLiteral as u16 => {
                if let Some(lit) = arena.get_literal(node) {
                    self.out.push_str(&lit.text);
                }
            }
            k if k == SyntaxKind::StringLiteral as u16 => {
                if let Some(lit) = arena.get_literal(node) {
                    self.emit_string(&lit.text);
                }
            }
            syntax_kind_ext::BINARY_EXPRESSION => {
                let Some(bin) = arena.get_binary_expr(node) else {
                    return;
                };
                let op = SyntaxKind::from_u16(bin.operator_token);
                let prec = op.map_or(precedence::LOWEST, operator_precedence);
                let (left_min, right_min) = if op == Some(SyntaxKind::EqualsToken) {
                    (precedence::MEMBER, precedence::ASSIGNMENT)
                } else {
                    (prec, prec + 1)
                };
                self.emit_expr(bin.left, left_min);
                let _ = write!(self.out, " {} ", op.and_then(SyntaxKind::text).unwrap_or("?"));
                self.emit_expr(bin.right, right_min);
            }
            syntax_kind_ext::PREFIX_UNARY_EXPRESSION => {
                let Some(unary) = arena.get_unary_expr(node) else {
                    return;
                };
                let op = SyntaxKind::from_u16(unary.operator);
                self.out.push_str(op.and_then(SyntaxKind::text).unwrap_or("?"));
                if matches!(
                    op,
                    Some(SyntaxKind::TypeOfKeyword) | Some(SyntaxKind::VoidKeyword)
                ) {
                    self.out.push(' ');
                }
                let operand_start = self.out.len();
                self.emit_expr(unary.operand, precedence::UNARY);
                // `- -a` and `+ +a` must not fuse into `--a` / `++a`
                let sign = match op {
                    Some(SyntaxKind::MinusToken) => Some('-'),
                    Some(SyntaxKind::PlusToken) => Some('+'),
                    _ => None,
                };
                if let Some(sign) = sign {
                    if self.out[operand_start..].starts_with(sign) {
                        self.out.insert(operand_start, ' ');
                    }
                }
            }
            syntax_kind_ext::CALL_EXPRESSION => {
                let Some(call) = arena.get_call_expr(node) else {
                    return;
                };
                self.emit_expr(call.expression, precedence::MEMBER);
                self.out.push('(');
                for (i, &arg) in call.arguments.nodes.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.emit_expr(arg, precedence::ASSIGNMENT);
                }
                self.out.push(')');
            }
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION => {
                let Some(access) = arena.get_access_expr(node) else {
                    return;
                };
                self.emit_expr(access.expression, precedence::MEMBER);
                self.out.push('.');
                self.emit_expr_inner(access.name_or_argument);
            }
            syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => {
                let Some(access) = arena.get_access_expr(node) else {
                    return;
                };
                self.emit_expr(access.expression, precedence::MEMBER);
                self.out.push('[');
                self.emit_expr(access.name_or_argument, precedence::LOWEST);
                self.out.push(']');
            }
            syntax_kind_ext::CONDITIONAL_EXPRESSION => {
                let Some(cond) = arena.get_conditional_expr(node) else {
                    return;
                };
                self.emit_expr(cond.condition, precedence::LOGICAL_OR);
                self.out.push_str(" ? ");
                self.emit_expr(cond.when_true, precedence::ASSIGNMENT);
                self.out.push_str(" : ");
                self.emit_expr(cond.when_false, precedence::ASSIGNMENT);
            }
            syntax_kind_ext::PARENTHESIZED_EXPRESSION => {
                if let Some(paren) = arena.get_parenthesized(node) {
                    self.out.push('(');
                    self.emit_expr(paren.expression, precedence::LOWEST);
                    self.out.push(')');
                }
            }
            k => {
                if let Some(text) = SyntaxKind::from_u16(k).and_then(SyntaxKind::text) {
                    self.out.push_str(text);
                }
            }
        }
    }

    fn emit_string(&mut self, text: &str) {
        self.out.push('"');
        for ch in text.chars() {
            match ch {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}

fn operator_precedence(op: SyntaxKind) -> u8 {
    match op {
        SyntaxKind::EqualsToken => precedence::ASSIGNMENT,
        SyntaxKind::BarBarToken | SyntaxKind::QuestionQuestionToken => precedence::LOGICAL_OR,
        SyntaxKind::AmpersandAmpersandToken => precedence::LOGICAL_AND,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => precedence::EQUALITY,
        SyntaxKind::LessThanToken | SyntaxKind::GreaterThanToken => precedence::RELATIONAL,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => precedence::ADDITIVE,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken => precedence::MULTIPLICATIVE,
        _ => precedence::LOWEST,
    }
}

#[cfg(test)]
#[path = "../tests/printer.rs"]
mod tests;
