//! A lexical token from a source file

use crate::literal::{quote, Encoding, Endian, Literal};
use std::fmt::{Debug, Display, Formatter};
use strum::{AsRefStr, EnumIter, IntoStaticStr};

/// A lexical token from a source file
#[derive(Clone)]
pub struct Token {
    kind: TokenKind,
    literal: Option<Literal>,
    line: u32,
}

impl Token {
    /// Creates a new token without a payload
    pub fn new(kind: TokenKind, line: u32) -> Self {
        Self {
            kind,
            literal: None,
            line,
        }
    }

    /// Creates a new token carrying a literal payload
    pub fn with_literal(kind: TokenKind, literal: Literal, line: u32) -> Self {
        Self {
            kind,
            literal: Some(literal),
            line,
        }
    }

    /// Gets the kind for this token
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Gets the payload of this token, if any
    pub fn literal(&self) -> Option<&Literal> {
        self.literal.as_ref()
    }

    /// The line this token started on
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Checks whether this token is of the given kind
    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// The identifier text, if this is an identifier
    pub fn identifier(&self) -> Option<&str> {
        match (&self.kind, &self.literal) {
            (TokenKind::Identifier, Some(Literal::Text(text))) => Some(text),
            _ => None,
        }
    }

    /// Writes this token back as source text that lexes to an equal token.
    pub fn to_source(&self) -> String {
        if let Some(lexeme) = self.kind.lexeme() {
            return lexeme.to_string();
        }
        match (&self.literal, self.kind.encoding()) {
            (Some(Literal::Bytes(bytes)), Some(encoding)) => {
                let marker = self.kind.string_marker().unwrap_or_default();
                format!("{marker}{}", quote(&encoding.decode(bytes)))
            }
            (Some(Literal::Signed(v)), _) => v.to_string(),
            (Some(Literal::Unsigned(v)), _) => format!("u{v}"),
            (Some(Literal::Single(v)), _) if v.is_infinite() => format!("{}f", past_range(39)),
            (Some(Literal::Single(v)), _) => format!("{}f", with_fraction(v.to_string())),
            (Some(Literal::Double(v)), _) if v.is_infinite() => past_range(309),
            (Some(Literal::Double(v)), _) => with_fraction(v.to_string()),
            (Some(Literal::Boolean(v)), _) => v.to_string(),
            (Some(Literal::Text(text)), _) => text.clone(),
            _ => String::new(),
        }
    }
}

fn with_fraction(mut digits: String) -> String {
    if !digits.contains('.') {
        digits.push_str(".0");
    }
    digits
}

/// `10^exponent` written out in full. Float literals only overflow to infinity, and they lex
/// back to it when written past the type's range.
fn past_range(exponent: usize) -> String {
    format!("1{}.0", "0".repeat(exponent))
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.literal {
            None => self.kind.fmt(f),
            Some(literal) => write!(f, "{:?}({literal:?})", self.kind),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.kind.lexeme(), &self.literal) {
            (Some(lexeme), _) => write!(f, "{}", lexeme.trim_end()),
            (None, Some(Literal::Bytes(bytes))) => match self.kind.encoding() {
                Some(encoding) => write!(f, "{} {}", self.kind.name(), encoding.decode(bytes)),
                None => write!(f, "{}", self.kind.name()),
            },
            (None, Some(literal)) => write!(f, "{} {literal}", self.kind.name()),
            (None, None) => write!(f, "{}", self.kind.name()),
        }
    }
}

/// Tokens are structurally equal when their kinds and payloads match, lines are ignored.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.literal == other.literal
    }
}

/// The kind for this token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr, EnumIter)]
pub enum TokenKind {
    /// whitespace, newlines and comments, never emitted by the tokenizer
    Ignore,

    // literals
    Integer,
    UInteger,
    FloatSingle,
    FloatDouble,
    Boolean,
    String,
    String8,
    String16,
    String32,
    String16l,
    String32l,
    String16b,
    String32b,
    Identifier,

    // keywords
    From,
    Import,
    As,
    Struct,
    Union,
    Enum,
    Typedef,
    Let,
    Set,
    Const,
    Constexpr,
    Array,
    Reference,
    Shared,
    Unique,
    Pointer,
    Extern,
    Unsafe,
    Func,
    Class,
    Public,
    Protected,
    Private,
    Friend,
    Virtual,
    Override,
    Static,
    Super,
    If,
    Elif,
    Else,
    For,
    Foreach,
    While,
    Continue,
    Break,
    Match,
    Return,
    Lambda,
    And,
    Or,
    Not,

    // punctuation
    Comma,
    Dot,
    LCurly,
    RCurly,
    LBracket,
    RBracket,
    LParen,
    RParen,
    SemiColon,
    Colon,
    /// ->
    Arrow,

    // operators
    Plus,
    Minus,
    Star,
    Div,
    Rem,
    /// **
    Pow,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    /// ~
    BitwiseNot,
    LShift,
    RShift,

    /// =
    Assign,
    /// :=
    TypeAssign,
    PlusAssign,
    MinusAssign,
    MultAssign,
    DivAssign,
    RemAssign,
    PowAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    BitNotAssign,
    LShiftAssign,
    RShiftAssign,

    /// ==
    Eq,
    /// !=
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl TokenKind {
    /// The name of this kind, as used in messages
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// The exact text a fixed token is matched against, including any required trailing
    /// space. `None` for literal and identifier kinds.
    pub const fn lexeme(&self) -> Option<&'static str> {
        use TokenKind::*;
        let lexeme = match self {
            From => "from ",
            Import => "import ",
            As => "as ",
            Struct => "struct ",
            Union => "union ",
            Enum => "enum ",
            Typedef => "typedef ",
            Let => "let ",
            Set => "set ",
            Const => "const ",
            Constexpr => "constexpr ",
            Array => "array ",
            Reference => "reference ",
            Shared => "shared ",
            Unique => "unique ",
            Pointer => "pointer ",
            Extern => "extern ",
            Unsafe => "unsafe ",
            Func => "func ",
            Class => "class ",
            Public => "public",
            Protected => "protected",
            Private => "private",
            Friend => "friend",
            Virtual => "virtual ",
            Override => "override ",
            Static => "static ",
            Super => "super",
            If => "if ",
            Elif => "elif ",
            Else => "else ",
            For => "for ",
            Foreach => "foreach ",
            While => "while ",
            Continue => "continue",
            Break => "break",
            Match => "match ",
            Return => "return ",
            Lambda => "lambda ",
            And => "and ",
            Or => "or ",
            Not => "not ",

            Comma => ",",
            Dot => ".",
            LCurly => "{",
            RCurly => "}",
            LBracket => "[",
            RBracket => "]",
            LParen => "(",
            RParen => ")",
            SemiColon => ";",
            Colon => ":",
            Arrow => "->",

            Plus => "+",
            Minus => "-",
            Star => "*",
            Div => "/",
            Rem => "%",
            Pow => "**",
            BitwiseAnd => "&",
            BitwiseOr => "|",
            BitwiseXor => "^",
            BitwiseNot => "~",
            LShift => "<<",
            RShift => ">>",

            Assign => "=",
            TypeAssign => ":=",
            PlusAssign => "+=",
            MinusAssign => "-=",
            MultAssign => "*=",
            DivAssign => "/=",
            RemAssign => "%=",
            PowAssign => "**=",
            BitAndAssign => "&=",
            BitOrAssign => "|=",
            BitXorAssign => "^=",
            BitNotAssign => "~=",
            LShiftAssign => "<<=",
            RShiftAssign => ">>=",

            Eq => "==",
            Neq => "!=",
            Lt => "<",
            Gt => ">",
            Lte => "<=",
            Gte => ">=",

            Ignore | Integer | UInteger | FloatSingle | FloatDouble | Boolean | String
            | String8 | String16 | String32 | String16l | String32l | String16b | String32b
            | Identifier => return None,
        };
        Some(lexeme)
    }

    /// The byte layout of a string kind
    pub const fn encoding(&self) -> Option<Encoding> {
        use TokenKind::*;
        match self {
            String | String8 => Some(Encoding::Utf8),
            String16 => Some(Encoding::Utf16(Endian::Native)),
            String16l => Some(Encoding::Utf16(Endian::Little)),
            String16b => Some(Encoding::Utf16(Endian::Big)),
            String32 => Some(Encoding::Utf32(Endian::Native)),
            String32l => Some(Encoding::Utf32(Endian::Little)),
            String32b => Some(Encoding::Utf32(Endian::Big)),
            _ => None,
        }
    }

    /// The prefix written before the opening quote of a string kind
    pub const fn string_marker(&self) -> Option<&'static str> {
        use TokenKind::*;
        match self {
            String => Some(""),
            String8 => Some("8"),
            String16 => Some("16"),
            String32 => Some("32"),
            String16l => Some("16l"),
            String32l => Some("32l"),
            String16b => Some("16b"),
            String32b => Some("32b"),
            _ => None,
        }
    }

    /// Checks if this is a string kind
    #[inline]
    pub const fn is_string(&self) -> bool {
        self.encoding().is_some()
    }

    /// Checks if this is any literal kind, identifiers excluded
    pub const fn is_literal(&self) -> bool {
        use TokenKind::*;
        matches!(self, Integer | UInteger | FloatSingle | FloatDouble | Boolean) || self.is_string()
    }

    /// Checks if a token of this kind can stand as an operand on its own
    pub const fn is_value(&self) -> bool {
        self.is_literal() || matches!(self, TokenKind::Identifier | TokenKind::Super)
    }

    /// Checks if a token of this kind can take part in arithmetic
    pub const fn is_math_capable(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Integer | UInteger | FloatSingle | FloatDouble | Identifier
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_log::test;

    #[test]
    fn test_every_non_literal_has_lexeme() {
        for kind in TokenKind::iter() {
            let literal_like = kind.is_literal() || kind == TokenKind::Identifier || kind == TokenKind::Ignore;
            assert_eq!(kind.lexeme().is_none(), literal_like, "{kind:?}");
        }
    }

    #[test]
    fn test_math_capable_is_narrower_than_literal() {
        assert!(TokenKind::Integer.is_math_capable());
        assert!(!TokenKind::Boolean.is_math_capable());
        assert!(!TokenKind::String16l.is_math_capable());
        assert!(TokenKind::Boolean.is_literal());
    }

    #[test]
    fn test_token_equality_ignores_line() {
        let a = Token::with_literal(TokenKind::Integer, Literal::Signed(3), 1);
        let b = Token::with_literal(TokenKind::Integer, Literal::Signed(3), 12);
        assert_eq!(a, b);
        assert_ne!(a, Token::with_literal(TokenKind::Integer, Literal::Signed(4), 1));
    }

    #[test]
    fn test_display_names() {
        let id = Token::with_literal(TokenKind::Identifier, Literal::Text("foo".into()), 1);
        assert_eq!(id.to_string(), "Identifier foo");
        assert_eq!(Token::new(TokenKind::Let, 1).to_string(), "let");
    }

    #[test]
    fn test_overflowed_float_source() {
        let double = Token::with_literal(TokenKind::FloatDouble, Literal::Double(f64::INFINITY), 1);
        let source = double.to_source();
        assert!(!source.contains("inf"));
        assert_eq!(source.parse::<f64>(), Ok(f64::INFINITY));

        let single = Token::with_literal(TokenKind::FloatSingle, Literal::Single(f32::INFINITY), 1);
        let source = single.to_source();
        let digits = source.strip_suffix('f').unwrap();
        assert_eq!(digits.parse::<f32>(), Ok(f32::INFINITY));
        assert!(digits.parse::<f64>().is_ok_and(f64::is_finite));
    }

    #[test]
    fn test_float_source_keeps_fraction() {
        let single = Token::with_literal(TokenKind::FloatSingle, Literal::Single(2.0), 1);
        assert_eq!(single.to_source(), "2.0f");
        let double = Token::with_literal(TokenKind::FloatDouble, Literal::Double(0.25), 1);
        assert_eq!(double.to_source(), "0.25");
    }
}
