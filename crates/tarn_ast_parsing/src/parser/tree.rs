//! The mutable sequence of slots that generators rewrite

use crate::parser::contract::{validate, ValidityError};
use crate::parser::error::{ParseError, ParseResult};
use crate::parser::node::{Node, NodeKind};
use itertools::Itertools;
use std::fmt::{Debug, Display, Formatter};
use std::slice;
use tarn_tokens::token::{Token, TokenKind};

/// How deeply nodes may nest, enclosures included
pub const MAX_DEPTH: usize = 256;

/// A tree element, either a token that has not been reduced or an interior node.
#[derive(Clone, PartialEq)]
pub enum Slot {
    Leaf(Token),
    Interior(Node),
}

impl Slot {
    /// The line of the token or node in this slot
    pub fn line(&self) -> u32 {
        match self {
            Slot::Leaf(token) => token.line(),
            Slot::Interior(node) => node.line(),
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Slot::Leaf(token) => Some(token),
            Slot::Interior(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Slot::Leaf(_) => None,
            Slot::Interior(node) => Some(node),
        }
    }

    pub fn token_kind(&self) -> Option<TokenKind> {
        self.as_token().map(Token::kind)
    }

    pub fn node_kind(&self) -> Option<NodeKind> {
        self.as_node().map(Node::kind)
    }

    /// Checks if this is a leaf of the given kind
    #[inline]
    pub fn is_token(&self, kind: TokenKind) -> bool {
        self.token_kind() == Some(kind)
    }

    /// Checks if this is an interior node of the given kind
    #[inline]
    pub fn is_node(&self, kind: NodeKind) -> bool {
        self.node_kind() == Some(kind)
    }

    /// Checks whether this slot can stand as the operand of an operator or keyword: any
    /// interior node, or a literal, identifier or `super` leaf.
    pub fn is_operand(&self) -> bool {
        match self {
            Slot::Leaf(token) => token.kind().is_value(),
            Slot::Interior(_) => true,
        }
    }

    /// Writes this slot back as source text
    pub fn to_source(&self) -> String {
        match self {
            Slot::Leaf(token) => token.to_source(),
            Slot::Interior(node) => node.to_source(),
        }
    }
}

impl From<Token> for Slot {
    fn from(value: Token) -> Self {
        Slot::Leaf(value)
    }
}

impl From<Node> for Slot {
    fn from(value: Node) -> Self {
        Slot::Interior(value)
    }
}

impl Debug for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Leaf(token) => Debug::fmt(token, f),
            Slot::Interior(node) => Debug::fmt(node, f),
        }
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Leaf(token) => Display::fmt(token, f),
            Slot::Interior(node) => Display::fmt(node, f),
        }
    }
}

/// An ordered sequence of slots.
///
/// The only mutation is [Tree::splice], which replaces a run of slots with exactly one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    slots: Vec<Slot>,
}

impl Tree {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tree of leaves. Ignored tokens never enter a tree.
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            slots: tokens
                .into_iter()
                .filter(|token| !token.is(TokenKind::Ignore))
                .map(Slot::Leaf)
                .collect(),
        }
    }

    pub fn from_slots(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    pub fn into_slots(self) -> Vec<Slot> {
        self.slots
    }

    /// Replaces the slots in `start..start + len` with the one slot `build` makes out of them.
    ///
    /// The removed slots are moved into `build`. If `build` fails, or makes a node nested deeper
    /// than [MAX_DEPTH], the range stays removed.
    ///
    /// # Panics
    /// Panics if the range is empty or out of bounds.
    pub fn splice<F>(&mut self, start: usize, len: usize, build: F) -> ParseResult<()>
    where
        F: FnOnce(Vec<Slot>) -> ParseResult<Slot>,
    {
        assert!(len > 0, "splice must consume at least one slot");
        let removed = self.slots.drain(start..start + len).collect::<Vec<_>>();
        let slot = build(removed)?;
        if let Slot::Interior(node) = &slot {
            if node.depth() > MAX_DEPTH {
                return Err(ParseError::NestingTooDeep {
                    limit: MAX_DEPTH,
                    line: node.line(),
                });
            }
        }
        self.slots.insert(start, slot);
        Ok(())
    }

    /// Collects every node of the given kind, depth first through each top level slot
    pub fn collect(&self, kind: NodeKind) -> Vec<&Node> {
        let mut found = vec![];
        for node in self.slots.iter().filter_map(Slot::as_node) {
            if node.is(kind) {
                found.push(node);
            }
            node.collect_into(kind, &mut found);
        }
        found
    }

    /// Leaves left at the top level, a sign that something did not reduce
    pub fn leftover_tokens(&self) -> impl Iterator<Item = &Token> {
        self.slots.iter().filter_map(Slot::as_token)
    }

    /// Validates every top level node, stopping at the first violation
    pub fn validate(&self) -> Result<(), ValidityError> {
        self.slots
            .iter()
            .filter_map(Slot::as_node)
            .try_for_each(validate)
    }

    /// Writes this tree back as source text
    pub fn to_source(&self) -> String {
        self.slots.iter().map(Slot::to_source).join(" ")
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Slot;
    type IntoIter = slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
