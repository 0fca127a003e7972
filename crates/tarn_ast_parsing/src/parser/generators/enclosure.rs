use crate::parser::error::{ParseError, ParseResult};
use crate::parser::generator::{Direction, Generator, Reduced};
use crate::parser::node::{Node, NodeKind};
use crate::parser::pipeline::Pipeline;
use crate::parser::tree::{Slot, Tree, MAX_DEPTH};
use tarn_tokens::token::TokenKind;
use tracing::trace;

/// Collapses `( .. )`, `{ .. }` and `[ .. ]` into one node each, reducing their contents with
/// the whole pipeline first.
#[derive(Debug, Default)]
pub struct Enclosures;

fn opened_by(kind: TokenKind) -> Option<(NodeKind, TokenKind)> {
    match kind {
        TokenKind::LParen => Some((NodeKind::Parentheses, TokenKind::RParen)),
        TokenKind::LCurly => Some((NodeKind::Curly, TokenKind::RCurly)),
        TokenKind::LBracket => Some((NodeKind::Bracket, TokenKind::RBracket)),
        _ => None,
    }
}

fn is_close(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RParen | TokenKind::RCurly | TokenKind::RBracket
    )
}

impl Enclosures {
    /// Finds the index of the delimiter closing the one at `open`. Enclosures nested deeper than
    /// [MAX_DEPTH] are an error, found before any of them is reduced.
    fn find_close(tree: &Tree, open: usize) -> ParseResult<usize> {
        let mut expected = vec![];
        for index in open..tree.len() {
            let Some(token) = tree.get(index).and_then(Slot::as_token) else {
                continue;
            };
            if let Some((_, close)) = opened_by(token.kind()) {
                if expected.len() == MAX_DEPTH {
                    return Err(ParseError::NestingTooDeep {
                        limit: MAX_DEPTH,
                        line: token.line(),
                    });
                }
                expected.push((close, token.line()));
            } else if is_close(token.kind()) {
                match expected.pop() {
                    Some((close, _)) if close == token.kind() => {
                        if expected.is_empty() {
                            return Ok(index);
                        }
                    }
                    Some((close, _)) => {
                        return Err(ParseError::MismatchedEnclosure {
                            expected: close,
                            found: token.kind(),
                            line: token.line(),
                        })
                    }
                    None => {
                        return Err(ParseError::UnmatchedClose {
                            close: token.kind(),
                            line: token.line(),
                        })
                    }
                }
            }
        }
        let (open, line) = tree
            .get(open)
            .and_then(Slot::as_token)
            .map(|token| (token.kind(), token.line()))
            .unwrap_or((TokenKind::LParen, 0));
        Err(ParseError::UnclosedEnclosure { open, line })
    }
}

impl Generator for Enclosures {
    fn name(&self) -> &str {
        "enclosures"
    }

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn try_reduce(
        &self,
        tree: &mut Tree,
        index: usize,
        pipeline: &Pipeline,
    ) -> ParseResult<Option<Reduced>> {
        let Some(token) = tree.get(index).and_then(Slot::as_token) else {
            return Ok(None);
        };
        let line = token.line();
        if is_close(token.kind()) {
            return Err(ParseError::UnmatchedClose {
                close: token.kind(),
                line,
            });
        }
        let Some((kind, _)) = opened_by(token.kind()) else {
            return Ok(None);
        };
        let close = Self::find_close(tree, index)?;
        let consumed = close - index + 1;
        trace!("reducing {kind} from line {line}, {} inner slots", consumed - 2);
        tree.splice(index, consumed, |mut slots| {
            slots.pop();
            slots.remove(0);
            let mut inner = Tree::from_slots(slots);
            pipeline.reduce(&mut inner)?;
            Ok(Slot::Interior(Node::new(kind, inner.into_slots(), line)))
        })?;
        Ok(Some(Reduced {
            start: index,
            consumed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use test_log::test;

    fn enclose(src: &str) -> ParseResult<Tree> {
        let mut tree = Tree::from_tokens(tokenize(src)?);
        let pipeline = Pipeline::new(vec![Box::new(Enclosures)]);
        pipeline.reduce(&mut tree)?;
        Ok(tree)
    }

    #[test]
    fn test_nested_enclosures() {
        let tree = enclose("a ( b [ c ] { } ) d").unwrap();
        assert_eq!(tree.len(), 3);
        let parens = tree.get(1).and_then(Slot::as_node).unwrap();
        assert_eq!(parens.kind(), NodeKind::Parentheses);
        assert_eq!(parens.children().len(), 3);
        assert!(parens.children()[1].is_node(NodeKind::Bracket));
        assert!(parens.children()[2].is_node(NodeKind::Curly));
    }

    #[test]
    fn test_unclosed() {
        let error = enclose("f(\n{ x }").unwrap_err();
        assert!(matches!(
            error,
            ParseError::UnclosedEnclosure {
                open: TokenKind::LParen,
                line: 1
            }
        ));
    }

    #[test]
    fn test_mismatched() {
        let error = enclose("( ]").unwrap_err();
        assert!(matches!(
            error,
            ParseError::MismatchedEnclosure {
                expected: TokenKind::RParen,
                found: TokenKind::RBracket,
                ..
            }
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        let tree = enclose(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(tree.get(0).and_then(Slot::as_node).map(Node::depth), Some(MAX_DEPTH));

        let error = enclose(&format!("\n{}", nested(1000))).unwrap_err();
        assert!(matches!(
            error,
            ParseError::NestingTooDeep {
                limit: MAX_DEPTH,
                line: 2
            }
        ));
    }

    #[test]
    fn test_stray_close() {
        let error = enclose("x }\n").unwrap_err();
        assert!(matches!(
            error,
            ParseError::UnmatchedClose {
                close: TokenKind::RCurly,
                line: 1
            }
        ));
    }
}
