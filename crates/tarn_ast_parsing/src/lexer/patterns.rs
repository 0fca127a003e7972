//! The priority ordered lexical rules.

use crate::lexer::literals::{self, Lexeme};
use crate::lexer::{LexError, LexResult};
use std::fmt::{Debug, Formatter};
use tarn_tokens::token::{Token, TokenKind};
use tarn_tokens::LexerState;

/// One lexical rule.
///
/// Patterns are tried in order and the first one that [matches](Pattern::matches) the
/// remaining source is the one used to [lex](Pattern::lex) it.
pub trait Pattern {
    /// A name for this pattern, used in traces
    fn name(&self) -> &str;

    /// Checks whether this pattern claims the start of `src`
    fn matches(&self, src: &str) -> bool;

    /// Consumes the claimed prefix of `src`, stamping the produced token with the current line
    /// of `state` and advancing it past any newlines consumed.
    fn lex<'s>(&self, src: &'s str, state: &mut LexerState) -> LexResult<(&'s str, Token)>;
}

impl Debug for dyn Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pattern({})", self.name())
    }
}

/// A pattern that claims whatever its scanner accepts
pub struct Scanned<F> {
    name: String,
    scanner: F,
}

impl<F> Scanned<F>
where
    F: for<'a> Fn(&'a str) -> literals::Result<'a, Lexeme>,
{
    pub fn new(name: impl Into<String>, scanner: F) -> Self {
        Self {
            name: name.into(),
            scanner,
        }
    }
}

impl<F> Pattern for Scanned<F>
where
    F: for<'a> Fn(&'a str) -> literals::Result<'a, Lexeme>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, src: &str) -> bool {
        (self.scanner)(src).is_ok()
    }

    fn lex<'s>(&self, src: &'s str, state: &mut LexerState) -> LexResult<(&'s str, Token)> {
        let line = state.line();
        let (rest, (kind, literal)) =
            (self.scanner)(src).map_err(|_| LexError::no_match(src, line))?;
        let consumed = &src[..src.len() - rest.len()];
        state.advance_lines(consumed.matches('\n').count());
        let token = match literal {
            Some(literal) => Token::with_literal(kind, literal, line),
            None => Token::new(kind, line),
        };
        Ok((rest, token))
    }
}

/// Block comments claim `/*` on sight, so an unterminated one is a dead end instead of
/// falling through to the division and multiplication symbols.
#[derive(Debug, Default)]
pub struct BlockComment;

impl Pattern for BlockComment {
    fn name(&self) -> &str {
        "block comment"
    }

    fn matches(&self, src: &str) -> bool {
        src.starts_with("/*")
    }

    fn lex<'s>(&self, src: &'s str, state: &mut LexerState) -> LexResult<(&'s str, Token)> {
        Scanned::new("block comment", literals::block_comment).lex(src, state)
    }
}

fn scanned<F>(name: impl Into<String>, scanner: F) -> Box<dyn Pattern>
where
    F: for<'a> Fn(&'a str) -> literals::Result<'a, Lexeme> + 'static,
{
    Box::new(Scanned::new(name, scanner))
}

const STRINGS: [TokenKind; 8] = [
    TokenKind::String,
    TokenKind::String8,
    TokenKind::String16,
    TokenKind::String32,
    TokenKind::String16l,
    TokenKind::String32l,
    TokenKind::String16b,
    TokenKind::String32b,
];

const KEYWORDS: [TokenKind; 42] = {
    use TokenKind::*;
    [
        From, Import, As, Struct, Union, Enum, Typedef, Let, Set, Constexpr, Const, Array,
        Reference, Shared, Unique, Pointer, Extern, Unsafe, Func, Class, Public, Protected,
        Private, Friend, Virtual, Override, Static, Super, If, Elif, Else, Foreach, For, While,
        Continue, Break, Match, Return, Lambda, And, Or, Not,
    ]
};

/// Longest first
const MULTI_CHAR_SYMBOLS: [TokenKind; 21] = {
    use TokenKind::*;
    [
        PowAssign,
        LShiftAssign,
        RShiftAssign,
        Arrow,
        TypeAssign,
        Eq,
        Neq,
        Lte,
        Gte,
        PlusAssign,
        MinusAssign,
        MultAssign,
        DivAssign,
        RemAssign,
        BitAndAssign,
        BitOrAssign,
        BitXorAssign,
        BitNotAssign,
        Pow,
        LShift,
        RShift,
    ]
};

const SINGLE_CHAR_SYMBOLS: [TokenKind; 22] = {
    use TokenKind::*;
    [
        Comma, Dot, LCurly, RCurly, LBracket, RBracket, LParen, RParen, SemiColon, Colon, Plus,
        Minus, Star, Div, Rem, BitwiseAnd, BitwiseOr, BitwiseXor, BitwiseNot, Assign, Lt, Gt,
    ]
};

/// The full pattern list, highest priority first
pub fn standard_patterns() -> Vec<Box<dyn Pattern>> {
    let mut patterns: Vec<Box<dyn Pattern>> = vec![
        scanned("whitespace", literals::whitespace),
        scanned("newline", literals::newline),
        scanned("line comment", literals::line_comment),
        Box::new(BlockComment),
    ];
    patterns.extend(STRINGS.into_iter().map(|kind| {
        scanned(kind.name(), move |src: &str| literals::string(kind, src))
    }));
    patterns.extend([
        scanned("single float", literals::single_float),
        scanned("double float", literals::double_float),
        scanned("unsigned integer", literals::unsigned_integer),
        scanned("signed integer", literals::signed_integer),
        scanned("boolean", literals::boolean),
    ]);
    patterns.extend(
        KEYWORDS
            .into_iter()
            .chain(MULTI_CHAR_SYMBOLS)
            .chain(SINGLE_CHAR_SYMBOLS)
            .map(|kind| scanned(kind.name(), move |src: &str| literals::fixed(kind, src))),
    );
    patterns.push(scanned("identifier", literals::identifier));
    patterns
}
