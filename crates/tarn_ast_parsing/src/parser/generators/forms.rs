use crate::parser::contract::is_declarator;
use crate::parser::error::ParseResult;
use crate::parser::generator::{Direction, Generator, Part, Reduced};
use crate::parser::node::{Node, NodeKind};
use crate::parser::pipeline::Pipeline;
use crate::parser::tree::{Slot, Tree};
use tarn_tokens::token::TokenKind;

/// A keyword and the parts that must follow it
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keyword: TokenKind,
    pub node: NodeKind,
    pub parts: &'static [Part],
}

impl Rule {
    pub const fn new(keyword: TokenKind, node: NodeKind, parts: &'static [Part]) -> Self {
        Self {
            keyword,
            node,
            parts,
        }
    }
}

/// `<keyword> parts...` for every keyword of one tier. The keyword is dropped and the parts
/// become the children of the new node.
#[derive(Debug)]
pub struct Prefix {
    name: &'static str,
    direction: Direction,
    rules: &'static [Rule],
}

impl Prefix {
    pub fn new(name: &'static str, direction: Direction, rules: &'static [Rule]) -> Self {
        Self {
            name,
            direction,
            rules,
        }
    }
}

impl Generator for Prefix {
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
        let Some(keyword) = tree.get(index).and_then(Slot::as_token) else {
            return Ok(None);
        };
        let line = keyword.line();
        let Some(rule) = self.rules.iter().find(|rule| keyword.is(rule.keyword)) else {
            return Ok(None);
        };
        let Some(parts) = Part::match_run(rule.parts, tree, index + 1) else {
            return Ok(None);
        };
        let consumed = parts + 1;
        tree.splice(index, consumed, |mut slots| {
            slots.remove(0);
            Ok(Slot::Interior(Node::new(rule.node, slots, line)))
        })?;
        Ok(Some(Reduced {
            start: index,
            consumed,
        }))
    }
}

/// `<keyword> declarator, declarator...` for the definition keywords, where every declarator is
/// a name or a [Typedef](NodeKind::Typedef).
///
/// A single declarator becomes the only child of the definition. Several are gathered into one
/// [Comma](NodeKind::Comma) child, so `let a, b: int` is `Let(Comma(a, Typedef(b, int)))`. Any
/// other operand is accepted alone.
#[derive(Debug)]
pub struct Definitions {
    keywords: &'static [(TokenKind, NodeKind)],
}

impl Definitions {
    pub fn new(keywords: &'static [(TokenKind, NodeKind)]) -> Self {
        Self { keywords }
    }

    /// Counts the declarators in the list starting at `first`
    fn declarators(tree: &Tree, first: usize) -> usize {
        let mut count = 1;
        while tree
            .get(first + 2 * count - 1)
            .is_some_and(|slot| slot.is_token(TokenKind::Comma))
            && tree.get(first + 2 * count).is_some_and(is_declarator)
        {
            count += 1;
        }
        count
    }
}

impl Generator for Definitions {
    fn name(&self) -> &str {
        "definitions"
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
        let Some(keyword) = tree.get(index).and_then(Slot::as_token) else {
            return Ok(None);
        };
        let line = keyword.line();
        let Some(&(_, kind)) = self
            .keywords
            .iter()
            .find(|(keyword_kind, _)| keyword.is(*keyword_kind))
        else {
            return Ok(None);
        };
        let Some(first) = tree.get(index + 1).filter(|slot| slot.is_operand()) else {
            return Ok(None);
        };
        let declarators = if is_declarator(first) {
            Self::declarators(tree, index + 1)
        } else {
            1
        };
        let consumed = 2 * declarators;
        tree.splice(index, consumed, |mut slots| {
            slots.remove(0);
            if declarators == 1 {
                return Ok(Slot::Interior(Node::new(kind, slots, line)));
            }
            let list_line = slots.first().map_or(line, Slot::line);
            let names = slots.into_iter().step_by(2).collect();
            let list = Node::new(NodeKind::Comma, names, list_line);
            Ok(Slot::Interior(Node::new(kind, vec![Slot::Interior(list)], line)))
        })?;
        Ok(Some(Reduced {
            start: index,
            consumed,
        }))
    }
}

/// `callee(arguments)`, where the callee is an identifier or a member access
#[derive(Debug, Default)]
pub struct Call;

impl Generator for Call {
    fn name(&self) -> &str {
        "call"
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
        let Some(callee) = tree.get(index) else {
            return Ok(None);
        };
        let line = callee.line();
        let is_callee = callee.is_token(TokenKind::Identifier) || callee.is_node(NodeKind::Dot);
        let has_arguments = tree
            .get(index + 1)
            .is_some_and(|slot| slot.is_node(NodeKind::Parentheses));
        if !(is_callee && has_arguments) {
            return Ok(None);
        }
        tree.splice(index, 2, |slots| {
            Ok(Slot::Interior(Node::new(NodeKind::Call, slots, line)))
        })?;
        Ok(Some(Reduced {
            start: index,
            consumed: 2,
        }))
    }
}

/// `x ;` as a [Statement](NodeKind::Statement)
#[derive(Debug, Default)]
pub struct Statements;

impl Generator for Statements {
    fn name(&self) -> &str {
        "statements"
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
        if !tree
            .get(index)
            .is_some_and(|slot| slot.is_token(TokenKind::SemiColon))
        {
            return Ok(None);
        }
        let Some(statement) = index
            .checked_sub(1)
            .and_then(|start| tree.get(start))
            .filter(|slot| slot.is_operand())
        else {
            return Ok(None);
        };
        let line = statement.line();
        let start = index - 1;
        tree.splice(start, 2, |mut slots| {
            slots.pop();
            Ok(Slot::Interior(Node::new(NodeKind::Statement, slots, line)))
        })?;
        Ok(Some(Reduced { start, consumed: 2 }))
    }
}
