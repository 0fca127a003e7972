//! Responsible with converting source text into a token stream

use crate::lexer::patterns::{standard_patterns, Pattern};
use tarn_tokens::token::{Token, TokenKind};
use tarn_tokens::LexerState;
use thiserror::Error;
use tracing::{debug, trace};

mod literals;
pub mod patterns;

/// Tokenizes `src` with the standard patterns, starting on line 1
pub fn tokenize(src: &str) -> LexResult<Vec<Token>> {
    Tokenizer::new().tokenize(src)
}

/// Drives a priority ordered pattern list over source text.
#[derive(Debug)]
pub struct Tokenizer {
    patterns: Vec<Box<dyn Pattern>>,
    state: LexerState,
}

impl Tokenizer {
    /// Creates a new tokenizer with the standard patterns
    pub fn new() -> Self {
        Self::with_patterns(standard_patterns())
    }

    /// Creates a tokenizer over a custom pattern list, highest priority first
    pub fn with_patterns(patterns: Vec<Box<dyn Pattern>>) -> Self {
        Self {
            patterns,
            state: LexerState::new(),
        }
    }

    /// The current lexer state
    pub fn state(&self) -> LexerState {
        self.state
    }

    /// Creates an iterator over the tokens of `src`. Ignored tokens are never yielded.
    pub fn tokens<'t, 's>(&'t mut self, src: &'s str) -> Tokens<'t, 's> {
        Tokens {
            tokenizer: self,
            remaining: src,
            failed: false,
        }
    }

    /// Tokenizes all of `src`
    pub fn tokenize(&mut self, src: &str) -> LexResult<Vec<Token>> {
        let tokens = self.tokens(src).collect::<LexResult<Vec<_>>>()?;
        debug!("tokenized {} tokens over {} lines", tokens.len(), self.state.line());
        Ok(tokens)
    }

    fn next_token<'s>(&mut self, src: &'s str) -> LexResult<(&'s str, Token)> {
        let pattern = self
            .patterns
            .iter()
            .find(|pattern| pattern.matches(src))
            .ok_or_else(|| LexError::no_match(src, self.state.line()))?;
        let (rest, token) = pattern.lex(src, &mut self.state)?;
        if rest.len() >= src.len() {
            return Err(LexError::no_match(src, token.line()));
        }
        trace!("{} produced {token:?}", pattern.name());
        Ok((rest, token))
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// The tokens of one source text, see [Tokenizer::tokens]
#[derive(Debug)]
pub struct Tokens<'t, 's> {
    tokenizer: &'t mut Tokenizer,
    remaining: &'s str,
    failed: bool,
}

impl Iterator for Tokens<'_, '_> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed && !self.remaining.is_empty() {
            match self.tokenizer.next_token(self.remaining) {
                Ok((rest, token)) => {
                    self.remaining = rest;
                    if !token.is(TokenKind::Ignore) {
                        return Some(Ok(token));
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

pub type LexResult<T> = Result<T, LexError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    /// No pattern claims the remaining source
    #[error("No matching token type for: {remaining:?} on line {line}")]
    NoMatch { line: u32, remaining: String },
}

impl LexError {
    /// A dead end at `src`, reporting the rest of its first line
    pub fn no_match(src: &str, line: u32) -> Self {
        let remaining = src
            .split('\n')
            .next()
            .unwrap_or_default()
            .replace('\r', "");
        Self::NoMatch { line, remaining }
    }

    /// The line the error occurred on
    pub fn line(&self) -> u32 {
        match self {
            LexError::NoMatch { line, .. } => *line,
        }
    }
}
