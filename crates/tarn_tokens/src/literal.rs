//! Literal payloads carried by tokens

use std::fmt::{Display, Formatter};

/// The payload of a literal or identifier token
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Signed(i64),
    Unsigned(u64),
    Single(f32),
    Double(f64),
    Boolean(bool),
    /// encoded string contents, see [Encoding]
    Bytes(Vec<u8>),
    /// raw identifier text
    Text(String),
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Signed(v) => write!(f, "{v}"),
            Literal::Unsigned(v) => write!(f, "{v}"),
            Literal::Single(v) => write!(f, "{v}"),
            Literal::Double(v) => write!(f, "{v}"),
            Literal::Boolean(v) => write!(f, "{v}"),
            Literal::Bytes(v) => write!(f, "{} bytes", v.len()),
            Literal::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Byte order used for multi-byte string code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// whatever the host uses
    Native,
    Little,
    Big,
}

/// How the contents of a string literal are laid out in its byte buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Utf8,
    Utf16(Endian),
    Utf32(Endian),
}

impl Encoding {
    /// Encodes `text` into a byte buffer. No terminator is appended.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match *self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Utf16(endian) => text
                .encode_utf16()
                .flat_map(|unit| match endian {
                    Endian::Native => unit.to_ne_bytes(),
                    Endian::Little => unit.to_le_bytes(),
                    Endian::Big => unit.to_be_bytes(),
                })
                .collect(),
            Encoding::Utf32(endian) => text
                .chars()
                .flat_map(|c| {
                    let unit = c as u32;
                    match endian {
                        Endian::Native => unit.to_ne_bytes(),
                        Endian::Little => unit.to_le_bytes(),
                        Endian::Big => unit.to_be_bytes(),
                    }
                })
                .collect(),
        }
    }

    /// Decodes a byte buffer produced by [Encoding::encode], replacing anything malformed
    /// with `U+FFFD`.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match *self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Utf16(endian) => {
                let units = bytes.chunks_exact(2).map(|chunk| {
                    let chunk = [chunk[0], chunk[1]];
                    match endian {
                        Endian::Native => u16::from_ne_bytes(chunk),
                        Endian::Little => u16::from_le_bytes(chunk),
                        Endian::Big => u16::from_be_bytes(chunk),
                    }
                });
                char::decode_utf16(units)
                    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect()
            }
            Encoding::Utf32(endian) => bytes
                .chunks_exact(4)
                .map(|chunk| {
                    let chunk = [chunk[0], chunk[1], chunk[2], chunk[3]];
                    let unit = match endian {
                        Endian::Native => u32::from_ne_bytes(chunk),
                        Endian::Little => u32::from_le_bytes(chunk),
                        Endian::Big => u32::from_be_bytes(chunk),
                    };
                    char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)
                })
                .collect(),
        }
    }
}

/// Writes `text` back as quoted source, escaping what the string scanner would otherwise
/// interpret.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\0' => quoted.push_str("\\0"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_utf16_byte_order() {
        assert_eq!(Encoding::Utf16(Endian::Little).encode("A"), vec![0x41, 0x00]);
        assert_eq!(Encoding::Utf16(Endian::Big).encode("A"), vec![0x00, 0x41]);
    }

    #[test]
    fn test_utf32_surrogate_free() {
        let bytes = Encoding::Utf32(Endian::Big).encode("\u{1F600}");
        assert_eq!(bytes, vec![0x00, 0x01, 0xF6, 0x00]);
        assert_eq!(Encoding::Utf32(Endian::Big).decode(&bytes), "\u{1F600}");
    }

    #[test]
    fn test_decode_utf16_pair() {
        let encoding = Encoding::Utf16(Endian::Little);
        let bytes = encoding.encode("a\u{1F600}");
        assert_eq!(bytes.len(), 6);
        assert_eq!(encoding.decode(&bytes), "a\u{1F600}");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("say \"hi\"\n"), r#""say \"hi\"\n""#);
    }
}
