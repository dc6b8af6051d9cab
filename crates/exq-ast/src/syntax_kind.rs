//! Node kind discriminators.
//!
//! Token kinds (identifiers, keywords, operators) live in [`SyntaxKind`];
//! composite node kinds that have no token of their own are the `u16`
//! constants in [`syntax_kind_ext`]. Both share the `Node::kind` field.

use serde::{Deserialize, Serialize};

#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    Unknown = 0,

    // Names and literals
    Identifier,
    NumericLiteral,
    StringLiteral,

    // Keywords
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    ThisKeyword,
    TypeOfKeyword,
    VoidKeyword,

    // Punctuation / operators
    EqualsToken,
    EqualsEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsToken,
    ExclamationEqualsEqualsToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionQuestionToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    LessThanToken,
    GreaterThanToken,
    ExclamationToken,
}

impl SyntaxKind {
    /// Reverse lookup for token kinds stored as `u16`.
    pub fn from_u16(value: u16) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        const ALL: [SyntaxKind; 25] = [
            Unknown,
            Identifier,
            NumericLiteral,
            StringLiteral,
            TrueKeyword,
            FalseKeyword,
            NullKeyword,
            ThisKeyword,
            TypeOfKeyword,
            VoidKeyword,
            EqualsToken,
            EqualsEqualsToken,
            EqualsEqualsEqualsToken,
            ExclamationEqualsToken,
            ExclamationEqualsEqualsToken,
            AmpersandAmpersandToken,
            BarBarToken,
            QuestionQuestionToken,
            PlusToken,
            MinusToken,
            AsteriskToken,
            SlashToken,
            LessThanToken,
            GreaterThanToken,
            ExclamationToken,
        ];
        ALL.get(value as usize).copied()
    }

    /// Source text of an operator or keyword token.
    pub fn text(self) -> Option<&'static str> {
        Some(match self {
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::FalseKeyword => "false",
            SyntaxKind::NullKeyword => "null",
            SyntaxKind::ThisKeyword => "this",
            SyntaxKind::TypeOfKeyword => "typeof",
            SyntaxKind::VoidKeyword => "void",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::EqualsEqualsToken => "==",
            SyntaxKind::EqualsEqualsEqualsToken => "===",
            SyntaxKind::ExclamationEqualsToken => "!=",
            SyntaxKind::ExclamationEqualsEqualsToken => "!==",
            SyntaxKind::AmpersandAmpersandToken => "&&",
            SyntaxKind::BarBarToken => "||",
            SyntaxKind::QuestionQuestionToken => "??",
            SyntaxKind::PlusToken => "+",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::SlashToken => "/",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::ExclamationToken => "!",
            _ => return None,
        })
    }

    /// Parse an operator spelling back into its token kind.
    pub fn from_operator_text(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "=" => SyntaxKind::EqualsToken,
            "==" => SyntaxKind::EqualsEqualsToken,
            "===" => SyntaxKind::EqualsEqualsEqualsToken,
            "!=" => SyntaxKind::ExclamationEqualsToken,
            "!==" => SyntaxKind::ExclamationEqualsEqualsToken,
            "&&" => SyntaxKind::AmpersandAmpersandToken,
            "||" => SyntaxKind::BarBarToken,
            "??" => SyntaxKind::QuestionQuestionToken,
            "+" => SyntaxKind::PlusToken,
            "-" => SyntaxKind::MinusToken,
            "*" => SyntaxKind::AsteriskToken,
            "/" => SyntaxKind::SlashToken,
            "<" => SyntaxKind::LessThanToken,
            ">" => SyntaxKind::GreaterThanToken,
            "!" => SyntaxKind::ExclamationToken,
            "typeof" => SyntaxKind::TypeOfKeyword,
            "void" => SyntaxKind::VoidKeyword,
            _ => return None,
        })
    }

    /// `&&`, `||` and `??`.
    pub fn is_logical_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::AmpersandAmpersandToken
                | SyntaxKind::BarBarToken
                | SyntaxKind::QuestionQuestionToken
        )
    }
}

/// Composite node kinds. Values start above the token range so the two
/// spaces never collide in `Node::kind`.
pub mod syntax_kind_ext {
    pub const FIRST_NODE: u16 = 200;
    pub const SOURCE_FILE: u16 = 200;
    pub const EXPRESSION_STATEMENT: u16 = 201;
    pub const RETURN_STATEMENT: u16 = 202;
    pub const PROPERTY_ACCESS_EXPRESSION: u16 = 210;
    pub const ELEMENT_ACCESS_EXPRESSION: u16 = 211;
    pub const CALL_EXPRESSION: u16 = 212;
    pub const BINARY_EXPRESSION: u16 = 213;
    pub const PREFIX_UNARY_EXPRESSION: u16 = 214;
    pub const CONDITIONAL_EXPRESSION: u16 = 215;
    pub const PARENTHESIZED_EXPRESSION: u16 = 216;

    /// Human readable kind name, for diagnostics and error messages.
    pub fn kind_name(kind: u16) -> &'static str {
        match kind {
            SOURCE_FILE => "SourceFile",
            EXPRESSION_STATEMENT => "ExpressionStatement",
            RETURN_STATEMENT => "ReturnStatement",
            PROPERTY_ACCESS_EXPRESSION => "PropertyAccessExpression",
            ELEMENT_ACCESS_EXPRESSION => "ElementAccessExpression",
            CALL_EXPRESSION => "CallExpression",
            BINARY_EXPRESSION => "BinaryExpression",
            PREFIX_UNARY_EXPRESSION => "PrefixUnaryExpression",
            CONDITIONAL_EXPRESSION => "ConditionalExpression",
            PARENTHESIZED_EXPRESSION => "ParenthesizedExpression",
            k => match super::SyntaxKind::from_u16(k) {
                Some(super::SyntaxKind::Identifier) => "Identifier",
                Some(super::SyntaxKind::NumericLiteral) => "NumericLiteral",
                Some(super::SyntaxKind::StringLiteral) => "StringLiteral",
                Some(super::SyntaxKind::TrueKeyword) => "TrueKeyword",
                Some(super::SyntaxKind::FalseKeyword) => "FalseKeyword",
                Some(super::SyntaxKind::NullKeyword) => "NullKeyword",
                Some(super::SyntaxKind::ThisKeyword) => "ThisKeyword",
                _ => "Unknown",
            },
        }
    }
}
