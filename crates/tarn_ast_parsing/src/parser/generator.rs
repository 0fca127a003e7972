//! The generator contract, the unit of grammar

use crate::parser::error::ParseResult;
use crate::parser::node::NodeKind;
use crate::parser::pipeline::Pipeline;
use crate::parser::tree::{Slot, Tree};
use tarn_tokens::token::TokenKind;
use tracing::trace;

/// Which way a generator scans its level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// left to right, resuming after each new node
    Forward,
    /// right to left, so stacked prefixes nest innermost first
    Backward,
}

/// What a successful reduction replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduced {
    /// where the new slot now sits
    pub start: usize,
    /// how many slots were replaced by it
    pub consumed: usize,
}

/// One grammar rule at one precedence tier.
pub trait Generator {
    /// A name for this generator, used in traces
    fn name(&self) -> &str;

    fn direction(&self) -> Direction;

    /// Tries to reduce the run of slots anchored at `index`, splicing the new node into `tree`.
    ///
    /// Returns `Ok(None)` when no rule applies here. `pipeline` is the pipeline running this
    /// generator, for generators that reduce nested levels.
    fn try_reduce(
        &self,
        tree: &mut Tree,
        index: usize,
        pipeline: &Pipeline,
    ) -> ParseResult<Option<Reduced>>;
}

/// Runs a single sweep of `generator` over `tree`, returning how many reductions happened.
pub fn sweep(generator: &dyn Generator, tree: &mut Tree, pipeline: &Pipeline) -> ParseResult<usize> {
    let mut reductions = 0;
    match generator.direction() {
        Direction::Forward => {
            let mut index = 0;
            while index < tree.len() {
                match generator.try_reduce(tree, index, pipeline)? {
                    Some(Reduced { start, .. }) => {
                        reductions += 1;
                        index = start + 1;
                    }
                    None => index += 1,
                }
            }
        }
        Direction::Backward => {
            let mut index = tree.len();
            while index > 0 {
                index -= 1;
                if let Some(Reduced { start, .. }) = generator.try_reduce(tree, index, pipeline)? {
                    reductions += 1;
                    index = start;
                }
            }
        }
    }
    if reductions > 0 {
        trace!("{} made {reductions} reductions", generator.name());
    }
    Ok(reductions)
}

/// One part of a run of slots a generator looks for
#[derive(Debug, Clone, Copy)]
pub enum Part {
    /// anything that can stand as an operand, see [Slot::is_operand]
    Operand,
    /// a leaf of the kind
    Token(TokenKind),
    /// an interior node of the kind
    Node(NodeKind),
    /// the part, if it is there
    Optional(&'static Part),
}

impl Part {
    /// Checks whether `slot` fulfills this part
    pub fn matches(&self, slot: &Slot) -> bool {
        match self {
            Part::Operand => slot.is_operand(),
            Part::Token(kind) => slot.is_token(*kind),
            Part::Node(kind) => slot.is_node(*kind),
            Part::Optional(part) => part.matches(slot),
        }
    }

    /// Counts how many slots starting at `start` fulfill `parts` in order, or `None` if a
    /// required part is missing.
    pub fn match_run(parts: &[Part], tree: &Tree, start: usize) -> Option<usize> {
        let mut consumed = 0;
        for part in parts {
            let slot = tree.get(start + consumed);
            match (part, slot) {
                (_, Some(slot)) if part.matches(slot) => consumed += 1,
                (Part::Optional(_), _) => {}
                _ => return None,
            }
        }
        Some(consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::node::Node;
    use tarn_tokens::token::Token;
    use test_log::test;

    /// Wraps every `~` and the slot after it
    struct Wrap(Direction);

    impl Generator for Wrap {
        fn name(&self) -> &str {
            "wrap"
        }

        fn direction(&self) -> Direction {
            self.0
        }

        fn try_reduce(
            &self,
            tree: &mut Tree,
            index: usize,
            _pipeline: &Pipeline,
        ) -> ParseResult<Option<Reduced>> {
            let applies = tree.get(index).is_some_and(|s| s.is_token(TokenKind::BitwiseNot))
                && tree.get(index + 1).is_some_and(Slot::is_operand);
            if !applies {
                return Ok(None);
            }
            tree.splice(index, 2, |mut slots| {
                slots.remove(0);
                Ok(Slot::Interior(Node::new(NodeKind::BitNot, slots, 1)))
            })?;
            Ok(Some(Reduced {
                start: index,
                consumed: 2,
            }))
        }
    }

    fn nots(count: usize) -> Tree {
        let mut tokens = vec![Token::new(TokenKind::BitwiseNot, 1); count];
        tokens.push(Token::new(TokenKind::Super, 1));
        Tree::from_tokens(tokens)
    }

    #[test]
    fn test_backward_nests_stacked_prefixes() {
        let mut tree = nots(3);
        let reductions = sweep(&Wrap(Direction::Backward), &mut tree, &Pipeline::empty()).unwrap();
        assert_eq!(reductions, 3);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.to_source(), "~ ~ ~ super");
    }

    #[test]
    fn test_forward_only_reduces_innermost_once() {
        let mut tree = nots(3);
        let reductions = sweep(&Wrap(Direction::Forward), &mut tree, &Pipeline::empty()).unwrap();
        assert_eq!(reductions, 1);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_optional_parts() {
        let tree = Tree::from_tokens([Token::new(TokenKind::Super, 1)]);
        let parts = [Part::Operand, Part::Optional(&Part::Node(NodeKind::Curly))];
        assert_eq!(Part::match_run(&parts, &tree, 0), Some(1));
        assert_eq!(Part::match_run(&[Part::Operand, Part::Operand], &tree, 0), None);
    }
}
