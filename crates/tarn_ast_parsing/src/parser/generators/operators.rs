use crate::parser::error::{ParseError, ParseResult, Side};
use crate::parser::generator::{Direction, Generator, Part, Reduced};
use crate::parser::node::{Node, NodeKind};
use crate::parser::pipeline::Pipeline;
use crate::parser::tree::{Slot, Tree};
use tarn_tokens::token::TokenKind;

/// `left <operator> right` for every operator of one precedence tier
#[derive(Debug)]
pub struct Infix {
    name: &'static str,
    direction: Direction,
    operators: &'static [(TokenKind, NodeKind)],
    left: Part,
    right: Part,
    math_operands: bool,
}

impl Infix {
    /// Creates a forward scanning tier taking any operands
    pub fn new(name: &'static str, operators: &'static [(TokenKind, NodeKind)]) -> Self {
        Self {
            name,
            direction: Direction::Forward,
            operators,
            left: Part::Operand,
            right: Part::Operand,
            math_operands: false,
        }
    }

    pub fn backward(mut self) -> Self {
        self.direction = Direction::Backward;
        self
    }

    pub fn left(mut self, part: Part) -> Self {
        self.left = part;
        self
    }

    pub fn right(mut self, part: Part) -> Self {
        self.right = part;
        self
    }

    /// Literal leaf operands that cannot take part in arithmetic become a
    /// [ParseError::InvalidOperand] instead of being left alone
    pub fn math_operands(mut self) -> Self {
        self.math_operands = true;
        self
    }

    fn node_kind(&self, operator: TokenKind) -> Option<NodeKind> {
        self.operators
            .iter()
            .find(|(token, _)| *token == operator)
            .map(|(_, node)| *node)
    }

    /// Rejects literal operands that can't take part in math, reporting the operand's line
    fn check_math(operator: TokenKind, slot: &Slot, side: Side) -> ParseResult<()> {
        match slot.as_token() {
            Some(token) if token.kind().is_literal() && !token.kind().is_math_capable() => {
                Err(ParseError::InvalidOperand {
                    operator,
                    side,
                    line: token.line(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl Generator for Infix {
    fn name(&self) -> &str {
        self.name
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn try_reduce(
        &self,
        tree: &mut Tree,
        index: usize,
        _pipeline: &Pipeline,
    ) -> ParseResult<Option<Reduced>> {
        let Some(operator) = tree.get(index).and_then(Slot::as_token) else {
            return Ok(None);
        };
        let Some(kind) = self.node_kind(operator.kind()) else {
            return Ok(None);
        };
        let (operator, line) = (operator.kind(), operator.line());
        let (Some(left), Some(right)) = (
            index.checked_sub(1).and_then(|left| tree.get(left)),
            tree.get(index + 1),
        ) else {
            return Ok(None);
        };
        if self.math_operands {
            Self::check_math(operator, left, Side::Left)?;
            Self::check_math(operator, right, Side::Right)?;
        }
        if !self.left.matches(left) || !self.right.matches(right) {
            return Ok(None);
        }
        let start = index - 1;
        tree.splice(start, 3, |mut slots| {
            slots.remove(1);
            Ok(Slot::Interior(Node::new(kind, slots, line)))
        })?;
        Ok(Some(Reduced { start, consumed: 3 }))
    }
}

/// `a, b, c` as one flat [Comma](NodeKind::Comma) node
#[derive(Debug, Default)]
pub struct CommaList;

impl Generator for CommaList {
    fn name(&self) -> &str {
        "comma list"
    }

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn try_reduce(
        &self,
        tree: &mut Tree,
        index: usize,
        _pipeline: &Pipeline,
    ) -> ParseResult<Option<Reduced>> {
        let Some(comma) = tree.get(index).filter(|slot| slot.is_token(TokenKind::Comma)) else {
            return Ok(None);
        };
        let line = comma.line();
        let operands = index
            .checked_sub(1)
            .and_then(|left| tree.get(left))
            .zip(tree.get(index + 1));
        match operands {
            Some((left, right)) if left.is_operand() && right.is_operand() => {}
            _ => return Ok(None),
        }
        let start = index - 1;
        tree.splice(start, 3, |mut slots| {
            let right = slots.remove(2);
            let left = slots.remove(0);
            let node = match left {
                Slot::Interior(list) if list.is(NodeKind::Comma) => {
                    let line = list.line();
                    let mut elements = list.into_children();
                    elements.push(right);
                    Node::new(NodeKind::Comma, elements, line)
                }
                left => Node::new(NodeKind::Comma, vec![left, right], line),
            };
            Ok(Slot::Interior(node))
        })?;
        Ok(Some(Reduced { start, consumed: 3 }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use test_log::test;

    const ADDITIVE: &[(TokenKind, NodeKind)] = &[
        (TokenKind::Plus, NodeKind::Add),
        (TokenKind::Minus, NodeKind::Sub),
    ];

    fn run(generator: Box<dyn Generator>, src: &str) -> ParseResult<Tree> {
        let mut tree = Tree::from_tokens(tokenize(src)?);
        Pipeline::new(vec![generator]).reduce(&mut tree)?;
        Ok(tree)
    }

    #[test]
    fn test_forward_is_left_associative() {
        let tree = run(Box::new(Infix::new("additive", ADDITIVE)), "a - b + c").unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(
            tree.get(0).unwrap().to_string(),
            "Add(Sub(Identifier a, Identifier b), Identifier c)"
        );
    }

    #[test]
    fn test_backward_is_right_associative() {
        let assign = Infix::new("assign", &[(TokenKind::Assign, NodeKind::Assign)]).backward();
        let tree = run(Box::new(assign), "a = b = c").unwrap();
        assert_eq!(
            tree.get(0).unwrap().to_string(),
            "Assign(Identifier a, Assign(Identifier b, Identifier c))"
        );
    }

    #[test]
    fn test_symbols_are_not_operands() {
        let tree = run(Box::new(Infix::new("additive", ADDITIVE)), "a + ;").unwrap();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_math_operands() {
        let mul = Infix::new("mul", &[(TokenKind::Star, NodeKind::Mul)]).math_operands();
        let error = run(Box::new(mul), "2 * \"text\"").unwrap_err();
        assert!(matches!(
            error,
            ParseError::InvalidOperand {
                operator: TokenKind::Star,
                side: Side::Right,
                line: 1
            }
        ));
        let mul = Infix::new("mul", &[(TokenKind::Star, NodeKind::Mul)]).math_operands();
        let error = run(Box::new(mul), "true\n* 2").unwrap_err();
        assert!(matches!(
            error,
            ParseError::InvalidOperand {
                side: Side::Left,
                line: 1,
                ..
            }
        ));
        let mul = Infix::new("mul", &[(TokenKind::Star, NodeKind::Mul)]).math_operands();
        let error = run(Box::new(mul), "2 *\n\n\"text\"").unwrap_err();
        assert!(matches!(
            error,
            ParseError::InvalidOperand {
                side: Side::Right,
                line: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_comma_flattens() {
        let tree = run(Box::new(CommaList), "a, b, c").unwrap();
        assert_eq!(tree.len(), 1);
        let list = tree.get(0).and_then(Slot::as_node).unwrap();
        assert_eq!(list.kind(), NodeKind::Comma);
        assert_eq!(list.children().len(), 3);
    }
}
