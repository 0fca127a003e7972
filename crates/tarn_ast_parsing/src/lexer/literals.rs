//! nom scanners for everything that is not a fixed lexeme

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_till, take_until, take_while_m_n};
use nom::character::complete::{char, digit1, none_of, one_of, satisfy};
use nom::combinator::{map, map_opt, map_res, opt, peek, recognize, value};
use nom::error::{context, VerboseError, VerboseErrorKind};
use nom::multi::fold_many0;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;
use tarn_common::nom_helpers::{fold_radix_digits, recognize_identifier, recognize_radix_digits};
use tarn_tokens::literal::{Encoding, Literal};
use tarn_tokens::token::TokenKind;

pub type Result<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// What a scanner produced: the kind of token and its payload, if any
pub type Lexeme = (TokenKind, Option<Literal>);

pub fn whitespace(src: &str) -> Result<Lexeme> {
    context("whitespace", value((TokenKind::Ignore, None), one_of(" \t\r")))(src)
}

pub fn newline(src: &str) -> Result<Lexeme> {
    context("newline", value((TokenKind::Ignore, None), char('\n')))(src)
}

pub fn line_comment(src: &str) -> Result<Lexeme> {
    context(
        "line comment",
        value(
            (TokenKind::Ignore, None),
            pair(tag("//"), take_till(|c: char| c == '\n')),
        ),
    )(src)
}

/// `/* ... */`. The closing `*/` may not share the `*` of the opener.
pub fn block_comment(src: &str) -> Result<Lexeme> {
    context(
        "block comment",
        value(
            (TokenKind::Ignore, None),
            tuple((tag("/*"), take_until("*/"), tag("*/"))),
        ),
    )(src)
}

fn radix_prefix(src: &str) -> Result<u32> {
    let (rest, radix) = alt((
        value(16, tag_no_case("0x")),
        value(8, tag_no_case("0o")),
        value(2, tag_no_case("0b")),
    ))(src)?;
    let (rest, _) = peek(satisfy(move |c: char| c.is_digit(radix)))(rest)?;
    Ok((rest, radix))
}

/// Digits with an optional base prefix, folded into a wrapping value. Stops at the first
/// character that is not valid for the base.
fn magnitude(src: &str) -> Result<u64> {
    let (rest, radix) = opt(radix_prefix)(src)?;
    let radix = radix.unwrap_or(10);
    map(recognize_radix_digits(radix), move |digits| {
        fold_radix_digits(digits, radix)
    })(rest)
}

pub fn unsigned_integer(src: &str) -> Result<Lexeme> {
    context(
        "unsigned integer",
        map(
            alt((
                preceded(pair(char('u'), peek(satisfy(|c| c.is_ascii_digit()))), magnitude),
                preceded(peek(radix_prefix), magnitude),
            )),
            |value| (TokenKind::UInteger, Some(Literal::Unsigned(value))),
        ),
    )(src)
}

pub fn signed_integer(src: &str) -> Result<Lexeme> {
    context(
        "signed integer",
        map(
            pair(
                opt(char('-')),
                preceded(peek(satisfy(|c| c.is_ascii_digit())), magnitude),
            ),
            |(negative, value)| {
                let value = value as i64;
                let value = match negative {
                    Some(_) => value.wrapping_neg(),
                    None => value,
                };
                (TokenKind::Integer, Some(Literal::Signed(value)))
            },
        ),
    )(src)
}

fn decimal_point_number(src: &str) -> Result<&str> {
    recognize(tuple((digit1, char('.'), digit1)))(src)
}

pub fn single_float(src: &str) -> Result<Lexeme> {
    context(
        "single float",
        map_res(terminated(decimal_point_number, char('f')), |digits: &str| {
            digits
                .parse::<f32>()
                .map(|value| (TokenKind::FloatSingle, Some(Literal::Single(value))))
        }),
    )(src)
}

pub fn double_float(src: &str) -> Result<Lexeme> {
    context(
        "double float",
        map_res(decimal_point_number, |digits: &str| {
            digits
                .parse::<f64>()
                .map(|value| (TokenKind::FloatDouble, Some(Literal::Double(value))))
        }),
    )(src)
}

/// `true` or `false`, matched as a prefix
pub fn boolean(src: &str) -> Result<Lexeme> {
    context(
        "boolean",
        map(
            alt((value(true, tag("true")), value(false, tag("false")))),
            |value| (TokenKind::Boolean, Some(Literal::Boolean(value))),
        ),
    )(src)
}

pub fn identifier(src: &str) -> Result<Lexeme> {
    context(
        "identifier",
        map(recognize_identifier, |text: &str| {
            (TokenKind::Identifier, Some(Literal::Text(text.to_string())))
        }),
    )(src)
}

/// The exact lexeme of a keyword or symbol kind
pub fn fixed(kind: TokenKind, src: &str) -> Result<Lexeme> {
    match kind.lexeme() {
        Some(lexeme) => value((kind, None), tag(lexeme))(src),
        None => Err(nom::Err::Error(VerboseError {
            errors: vec![(src, VerboseErrorKind::Context("fixed lexeme"))],
        })),
    }
}

/// A string literal of one of the string kinds: its marker, then quoted contents encoded
/// in the kind's layout.
pub fn string(kind: TokenKind, src: &str) -> Result<Lexeme> {
    let marker = kind.string_marker().unwrap_or_default();
    let encoding = kind.encoding().unwrap_or(Encoding::Utf8);
    context(
        "string",
        map(preceded(tag(marker), quoted), move |text| {
            (kind, Some(Literal::Bytes(encoding.encode(&text))))
        }),
    )(src)
}

fn quoted(src: &str) -> Result<String> {
    delimited(
        char('"'),
        fold_many0(
            alt((none_of("\"\\"), preceded(char('\\'), escape))),
            String::new,
            |mut text, c| {
                text.push(c);
                text
            },
        ),
        char('"'),
    )(src)
}

fn escape(src: &str) -> Result<char> {
    context(
        "escape",
        alt((
            value('\n', char('n')),
            value('\r', char('r')),
            value('\t', char('t')),
            value('\0', char('0')),
            value('\\', char('\\')),
            value('"', char('"')),
            value('\'', char('\'')),
            unicode_escape,
        )),
    )(src)
}

/// `u{XXXX}` with one to six hex digits
fn unicode_escape(src: &str) -> Result<char> {
    map_opt(
        delimited(
            tag("u{"),
            take_while_m_n(1, 6, |c: char| c.is_ascii_hexdigit()),
            char('}'),
        ),
        |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
    )(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::combinator::all_consuming;
    use nom::Finish;
    use tarn_tokens::literal::Endian;
    use test_log::test;

    fn literal_of(result: Result<Lexeme>) -> Literal {
        let (_, (_, literal)) = result.finish().expect("should scan");
        literal.expect("should carry a literal")
    }

    #[test]
    fn test_base_prefixes() {
        assert_eq!(literal_of(unsigned_integer("0xFF")), Literal::Unsigned(255));
        assert_eq!(literal_of(unsigned_integer("0b1010")), Literal::Unsigned(10));
        assert_eq!(literal_of(unsigned_integer("0o17")), Literal::Unsigned(15));
        assert_eq!(literal_of(unsigned_integer("u0XfF")), Literal::Unsigned(255));
        assert_eq!(literal_of(unsigned_integer("u42")), Literal::Unsigned(42));
    }

    #[test]
    fn test_signed_folds_sign() {
        assert_eq!(literal_of(signed_integer("-42")), Literal::Signed(-42));
        assert_eq!(literal_of(signed_integer("1_000")), Literal::Signed(1000));
        assert_eq!(literal_of(signed_integer("-0x10")), Literal::Signed(-16));
    }

    #[test]
    fn test_scanning_stops_at_invalid_digit() {
        let (rest, (_, literal)) = unsigned_integer("0b10201").finish().unwrap();
        assert_eq!(literal, Some(Literal::Unsigned(2)));
        assert_eq!(rest, "201");
    }

    #[test]
    fn test_prefix_without_digit_is_not_a_base() {
        assert!(unsigned_integer("0xg").is_err());
        assert!(unsigned_integer("uabc").is_err());
        let (rest, (_, literal)) = signed_integer("0xg").finish().unwrap();
        assert_eq!(literal, Some(Literal::Signed(0)));
        assert_eq!(rest, "xg");
    }

    #[test]
    fn test_overflow_wraps() {
        assert_eq!(
            literal_of(unsigned_integer("0x1_0000_0000_0000_0001")),
            Literal::Unsigned(1)
        );
    }

    #[test]
    fn test_floats_need_digits_on_both_sides() {
        assert_eq!(literal_of(single_float("1.5f")), Literal::Single(1.5));
        assert_eq!(literal_of(double_float("0.25")), Literal::Double(0.25));
        assert!(double_float("1.").is_err());
        assert!(double_float(".5").is_err());
        assert!(single_float("1.5").is_err());
    }

    #[test]
    fn test_string_escapes() {
        let (rest, (kind, literal)) = string(TokenKind::String, r#""a\tb\u{41}\"" tail"#)
            .finish()
            .unwrap();
        assert_eq!(kind, TokenKind::String);
        assert_eq!(literal, Some(Literal::Bytes(b"a\tbA\"".to_vec())));
        assert_eq!(rest, " tail");
    }

    #[test]
    fn test_string_widths() {
        let (_, (_, literal)) = all_consuming(|src| string(TokenKind::String16b, src))(r#"16b"hi""#)
            .finish()
            .unwrap();
        assert_eq!(
            literal,
            Some(Literal::Bytes(Encoding::Utf16(Endian::Big).encode("hi")))
        );
        assert!(string(TokenKind::String32l, r#"32"hi""#).is_err());
    }

    #[test]
    fn test_unterminated_string_does_not_scan() {
        assert!(string(TokenKind::String, "\"never closed").is_err());
        assert!(string(TokenKind::String, "\"bad \\q escape\"").is_err());
    }

    #[test]
    fn test_block_comment_needs_separate_closer() {
        assert!(block_comment("/*/").is_err());
        let (rest, _) = block_comment("/* a\n b */x").finish().unwrap();
        assert_eq!(rest, "x");
    }

    #[test]
    fn test_keyword_needs_trailing_space() {
        assert!(fixed(TokenKind::For, "forever").is_err());
        assert!(fixed(TokenKind::For, "for (").is_ok());
        assert!(fixed(TokenKind::Identifier, "anything").is_err());
    }
}
