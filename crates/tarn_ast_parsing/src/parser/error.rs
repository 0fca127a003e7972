use crate::lexer::LexError;
use std::fmt::{Display, Formatter};
use std::io;
use tarn_tokens::token::TokenKind;

pub type ParseResult<T> = Result<T, ParseError>;

/// Which side of an infix operator an operand is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Represents an error occurring while parsing. Every variant is fatal to the parse.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("{} opened on line {line} is never closed", .open.lexeme().unwrap_or_default())]
    UnclosedEnclosure { open: TokenKind, line: u32 },
    #[error(
        "Expected {} but found {} on line {line}",
        .expected.lexeme().unwrap_or_default(),
        .found.lexeme().unwrap_or_default()
    )]
    MismatchedEnclosure {
        expected: TokenKind,
        found: TokenKind,
        line: u32,
    },
    #[error("Unmatched {} on line {line}", .close.lexeme().unwrap_or_default())]
    UnmatchedClose { close: TokenKind, line: u32 },
    #[error(
        "Invalid {side} hand side for {} operator on line {line}",
        .operator.lexeme().unwrap_or_default()
    )]
    InvalidOperand {
        operator: TokenKind,
        side: Side,
        line: u32,
    },
    #[error("Nesting deeper than {limit} levels on line {line}")]
    NestingTooDeep { limit: usize, line: u32 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ParseError {
    /// The line this error occurred on, if it came from the source text
    pub fn line(&self) -> Option<u32> {
        match self {
            ParseError::Lex(e) => Some(e.line()),
            ParseError::UnclosedEnclosure { line, .. }
            | ParseError::MismatchedEnclosure { line, .. }
            | ParseError::UnmatchedClose { line, .. }
            | ParseError::InvalidOperand { line, .. }
            | ParseError::NestingTooDeep { line, .. } => Some(*line),
            ParseError::Io(_) => None,
        }
    }
}
