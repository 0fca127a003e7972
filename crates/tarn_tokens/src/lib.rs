//! Tokens produced by the tarn lexer.
//!
//! A [Token](token::Token) is immutable once built and carries only the line it started on.

pub mod literal;
pub mod token;

/// State threaded through one tokenizer run.
///
/// Lines start at `1`. A fresh state is required for every independent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerState {
    line: u32,
}

impl LexerState {
    /// Creates a new lexer state positioned on the first line
    pub const fn new() -> Self {
        Self { line: 1 }
    }

    /// The current line
    #[inline]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Advances the line counter by `lines`
    #[inline]
    pub fn advance_lines(&mut self, lines: usize) {
        self.line = self.line.saturating_add(lines as u32);
    }
}

impl Default for LexerState {
    fn default() -> Self {
        Self::new()
    }
}
