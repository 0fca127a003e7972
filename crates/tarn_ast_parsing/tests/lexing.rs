use proptest::prelude::*;
use tarn_ast_parsing::lexer::tokenize;
use tarn_tokens::literal::Literal;
use tarn_tokens::token::{Token, TokenKind};

fn single(src: &str) -> Token {
    let mut tokens = tokenize(src).expect("should tokenize");
    assert_eq!(tokens.len(), 1, "{src:?} gave {tokens:?}");
    tokens.remove(0)
}

proptest! {
    #[test]
    fn signed_integers(value: i64) {
        let token = single(&value.to_string());
        prop_assert_eq!(token.kind(), TokenKind::Integer);
        prop_assert_eq!(token.literal(), Some(&Literal::Signed(value)));
    }

    #[test]
    fn unsigned_integers(value: u64) {
        let token = single(&format!("u{value}"));
        prop_assert_eq!(token.literal(), Some(&Literal::Unsigned(value)));
        let token = single(&format!("{value:#x}"));
        prop_assert_eq!(token.literal(), Some(&Literal::Unsigned(value)));
        let token = single(&format!("{value:#b}"));
        prop_assert_eq!(token.literal(), Some(&Literal::Unsigned(value)));
    }

    #[test]
    fn identifiers(name in "x[a-z0-9_]{0,12}") {
        let token = single(&name);
        prop_assert_eq!(token.identifier(), Some(name.as_str()));
    }

    #[test]
    fn lines_count_newlines(blank in 0usize..8) {
        let src = format!("{}x", "\n".repeat(blank));
        prop_assert_eq!(single(&src).line(), blank as u32 + 1);
    }
}
