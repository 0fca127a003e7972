//! nom helpers

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{alpha1, alphanumeric1};
use nom::combinator::recognize;
use nom::error::ParseError;
use nom::multi::many0_count;
use nom::sequence::pair;
use nom::IResult;

/// Recognizes `[A-Za-z_][A-Za-z0-9_]*`
pub fn recognize_identifier<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Recognizes a (possibly empty) run of digits valid in `radix`, with `_` group separators
/// allowed anywhere in the run.
pub fn recognize_radix_digits<'a, E: ParseError<&'a str>>(
    radix: u32,
) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str, E> {
    take_while(move |c: char| c == '_' || c.is_digit(radix))
}

/// Folds digits recognized by [recognize_radix_digits] into a value, ignoring separators.
///
/// Overflow wraps.
pub fn fold_radix_digits(digits: &str, radix: u32) -> u64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0_u64, |value, digit| {
            value
                .wrapping_mul(radix as u64)
                .wrapping_add(digit as u64)
        })
}
