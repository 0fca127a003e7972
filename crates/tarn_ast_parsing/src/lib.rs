#![doc = include_str!("../README.md")]

use crate::lexer::tokenize;
use crate::parser::{ParseError, Pipeline, Tree};
use std::path::Path;
use tracing::debug;

pub mod lexer;
pub mod parser;

/// Tokenizes and parses source text with the standard grammar.
pub fn parse_str(src: &str) -> Result<Tree, ParseError> {
    let tokens = tokenize(src)?;
    debug!("tokenized {} tokens", tokens.len());
    Pipeline::standard().parse(tokens)
}

/// Parses a path syntactically, performing no validity checks.
///
/// This creates the baseline tree for tarn source code.
pub fn syntactic_parse(path: &Path) -> Result<Tree, ParseError> {
    let src = std::fs::read_to_string(path)?;
    debug!("read {} bytes from {path:?}", src.len());
    parse_str(&src)
}
