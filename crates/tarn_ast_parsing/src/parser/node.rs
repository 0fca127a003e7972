//! Interior nodes of the syntax tree

use crate::parser::tree::Slot;
use itertools::Itertools;
use std::fmt::{Debug, Display, Formatter};
use strum::{AsRefStr, EnumIter, IntoStaticStr};
use tarn_tokens::token::TokenKind;

/// The kind of an interior node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr, EnumIter)]
pub enum NodeKind {
    // enclosures
    Parentheses,
    Curly,
    Bracket,

    Comma,
    Statement,

    Dot,
    Call,

    // type modifiers
    Array,
    Reference,
    Shared,
    Unique,
    Pointer,

    // arithmetic
    Pow,
    Mul,
    Div,
    Mod,
    Add,
    Sub,

    // bitwise
    BitNot,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,

    // comparison and logic
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Not,
    And,
    Or,

    /// `name: type`
    Typedef,
    /// `params -> returns`
    Arrow,
    Func,
    Lambda,

    // definitions
    Let,
    Set,
    Const,
    Constexpr,

    // declarations
    Class,
    Struct,
    Union,
    Enum,

    // assignments
    Assign,
    TypeAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    BitNotAssign,
    ShiftLeftAssign,
    ShiftRightAssign,

    // visibility
    Public,
    Protected,
    Private,
    Friend,

    // flow
    Return,
    If,
    Elif,
    Else,
    While,
    For,
    Foreach,
    Match,
    Break,
    Continue,
}

/// How the children of a node are laid out in source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// children between two delimiters
    Enclosed { open: TokenKind, close: TokenKind },
    /// `left <token> right`
    Infix(TokenKind),
    /// `<token> children...`
    Prefix(TokenKind),
    /// children side by side
    Juxtaposed,
    /// children separated by the token
    Separated(TokenKind),
    /// a single child followed by the token
    Terminated(TokenKind),
}

impl NodeKind {
    /// The display name of this kind
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub const fn shape(&self) -> Shape {
        use NodeKind::*;
        use Shape::{Enclosed, Infix, Prefix};
        match self {
            Parentheses => Enclosed {
                open: TokenKind::LParen,
                close: TokenKind::RParen,
            },
            Curly => Enclosed {
                open: TokenKind::LCurly,
                close: TokenKind::RCurly,
            },
            Bracket => Enclosed {
                open: TokenKind::LBracket,
                close: TokenKind::RBracket,
            },
            Comma => Shape::Separated(TokenKind::Comma),
            Statement => Shape::Terminated(TokenKind::SemiColon),
            Dot => Infix(TokenKind::Dot),
            Call => Shape::Juxtaposed,

            Array => Prefix(TokenKind::Array),
            Reference => Prefix(TokenKind::Reference),
            Shared => Prefix(TokenKind::Shared),
            Unique => Prefix(TokenKind::Unique),
            Pointer => Prefix(TokenKind::Pointer),

            Pow => Infix(TokenKind::Pow),
            Mul => Infix(TokenKind::Star),
            Div => Infix(TokenKind::Div),
            Mod => Infix(TokenKind::Rem),
            Add => Infix(TokenKind::Plus),
            Sub => Infix(TokenKind::Minus),

            BitNot => Prefix(TokenKind::BitwiseNot),
            BitAnd => Infix(TokenKind::BitwiseAnd),
            BitOr => Infix(TokenKind::BitwiseOr),
            BitXor => Infix(TokenKind::BitwiseXor),
            ShiftLeft => Infix(TokenKind::LShift),
            ShiftRight => Infix(TokenKind::RShift),

            Eq => Infix(TokenKind::Eq),
            Ne => Infix(TokenKind::Neq),
            Lt => Infix(TokenKind::Lt),
            Gt => Infix(TokenKind::Gt),
            Le => Infix(TokenKind::Lte),
            Ge => Infix(TokenKind::Gte),
            Not => Prefix(TokenKind::Not),
            And => Infix(TokenKind::And),
            Or => Infix(TokenKind::Or),

            Typedef => Infix(TokenKind::Colon),
            Arrow => Infix(TokenKind::Arrow),
            Func => Prefix(TokenKind::Func),
            Lambda => Prefix(TokenKind::Lambda),

            Let => Prefix(TokenKind::Let),
            Set => Prefix(TokenKind::Set),
            Const => Prefix(TokenKind::Const),
            Constexpr => Prefix(TokenKind::Constexpr),

            Class => Prefix(TokenKind::Class),
            Struct => Prefix(TokenKind::Struct),
            Union => Prefix(TokenKind::Union),
            Enum => Prefix(TokenKind::Enum),

            Assign => Infix(TokenKind::Assign),
            TypeAssign => Infix(TokenKind::TypeAssign),
            AddAssign => Infix(TokenKind::PlusAssign),
            SubAssign => Infix(TokenKind::MinusAssign),
            MulAssign => Infix(TokenKind::MultAssign),
            DivAssign => Infix(TokenKind::DivAssign),
            ModAssign => Infix(TokenKind::RemAssign),
            PowAssign => Infix(TokenKind::PowAssign),
            BitAndAssign => Infix(TokenKind::BitAndAssign),
            BitOrAssign => Infix(TokenKind::BitOrAssign),
            BitXorAssign => Infix(TokenKind::BitXorAssign),
            BitNotAssign => Infix(TokenKind::BitNotAssign),
            ShiftLeftAssign => Infix(TokenKind::LShiftAssign),
            ShiftRightAssign => Infix(TokenKind::RShiftAssign),

            Public => Prefix(TokenKind::Public),
            Protected => Prefix(TokenKind::Protected),
            Private => Prefix(TokenKind::Private),
            Friend => Prefix(TokenKind::Friend),

            Return => Prefix(TokenKind::Return),
            If => Prefix(TokenKind::If),
            Elif => Prefix(TokenKind::Elif),
            Else => Prefix(TokenKind::Else),
            While => Prefix(TokenKind::While),
            For => Prefix(TokenKind::For),
            Foreach => Prefix(TokenKind::Foreach),
            Match => Prefix(TokenKind::Match),
            Break => Prefix(TokenKind::Break),
            Continue => Prefix(TokenKind::Continue),
        }
    }

    /// Checks if this is one of the let/set/const/constexpr definitions
    pub const fn is_definition(&self) -> bool {
        matches!(
            self,
            NodeKind::Let | NodeKind::Set | NodeKind::Const | NodeKind::Constexpr
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A composite syntax element that owns its children.
///
/// Nodes are built once when a generator reduces a run of slots and are never edited after.
#[derive(Clone)]
pub struct Node {
    kind: NodeKind,
    children: Vec<Slot>,
    line: u32,
    depth: usize,
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Slot>, line: u32) -> Self {
        let depth = 1 + children
            .iter()
            .filter_map(Slot::as_node)
            .map(Node::depth)
            .max()
            .unwrap_or(0);
        Self {
            kind,
            children,
            line,
            depth,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    pub fn children(&self) -> &[Slot] {
        &self.children
    }

    /// Gives up the children of this node
    pub fn into_children(self) -> Vec<Slot> {
        self.children
    }

    /// The line this node started on
    pub fn line(&self) -> u32 {
        self.line
    }

    /// How many nodes deep this subtree goes, counting this one
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The left operand of an infix node, or the callee of a call
    pub fn left(&self) -> Option<&Slot> {
        self.children.first()
    }

    /// The right operand of an infix node, or the arguments of a call
    pub fn right(&self) -> Option<&Slot> {
        match self.children.len() {
            2 => self.children.last(),
            _ => None,
        }
    }

    /// The slot a prefix node applies to, which is its last child
    pub fn operand(&self) -> Option<&Slot> {
        self.children.last()
    }

    /// The curly block body of a declaration, flow form or function
    pub fn body(&self) -> Option<&Slot> {
        self.children
            .last()
            .filter(|slot| slot.is_node(NodeKind::Curly))
    }

    /// The bracketed sizes of an array type
    pub fn sizes(&self) -> Option<&Node> {
        self.children
            .first()
            .and_then(Slot::as_node)
            .filter(|node| self.kind == NodeKind::Array && node.kind == NodeKind::Bracket)
    }

    /// The signature of a function or lambda
    pub fn arrow(&self) -> Option<&Node> {
        self.children
            .first()
            .and_then(Slot::as_node)
            .filter(|node| node.kind == NodeKind::Arrow)
    }

    /// Collects every descendant of the given kind, depth first with each child before its
    /// own descendants. This node itself is never included.
    pub fn collect(&self, kind: NodeKind) -> Vec<&Node> {
        let mut found = vec![];
        self.collect_into(kind, &mut found);
        found
    }

    pub(crate) fn collect_into<'a>(&'a self, kind: NodeKind, found: &mut Vec<&'a Node>) {
        for child in &self.children {
            if let Slot::Interior(node) = child {
                if node.kind == kind {
                    found.push(node);
                }
                node.collect_into(kind, found);
            }
        }
    }

    /// Writes this node back as source text
    pub fn to_source(&self) -> String {
        let children = self.children.iter().map(Slot::to_source);
        match self.kind.shape() {
            Shape::Enclosed { open, close } => format!(
                "{}{}{}",
                open.lexeme().unwrap_or_default(),
                children.format(" "),
                close.lexeme().unwrap_or_default()
            ),
            Shape::Infix(token) => {
                let separator = format!(" {} ", token.lexeme().unwrap_or_default());
                children.format(&separator).to_string()
            }
            Shape::Prefix(token) => {
                let mut source = token.lexeme().unwrap_or_default().to_string();
                for child in children {
                    if !source.ends_with(' ') {
                        source.push(' ');
                    }
                    source.push_str(&child);
                }
                source
            }
            Shape::Juxtaposed => children.collect(),
            Shape::Separated(token) => {
                let separator = format!(" {} ", token.lexeme().unwrap_or_default());
                children.format(&separator).to_string()
            }
            Shape::Terminated(token) => {
                format!("{}{}", children.format(" "), token.lexeme().unwrap_or_default())
            }
        }
    }
}

/// Nodes are structurally equal when their kinds and children match, lines are ignored.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.children == other.children
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

/// Renders as `Name(child, child)`
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.children.iter().format(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use tarn_tokens::literal::Literal;
    use tarn_tokens::token::Token;
    use test_log::test;

    fn ident(name: &str) -> Slot {
        Slot::Leaf(Token::with_literal(
            TokenKind::Identifier,
            Literal::Text(name.to_string()),
            1,
        ))
    }

    fn int(value: i64) -> Slot {
        Slot::Leaf(Token::with_literal(
            TokenKind::Integer,
            Literal::Signed(value),
            1,
        ))
    }

    #[test]
    fn test_every_shape_token_has_a_lexeme() {
        for kind in NodeKind::iter() {
            let tokens = match kind.shape() {
                Shape::Enclosed { open, close } => vec![open, close],
                Shape::Infix(token)
                | Shape::Prefix(token)
                | Shape::Separated(token)
                | Shape::Terminated(token) => vec![token],
                Shape::Juxtaposed => vec![],
            };
            for token in tokens {
                assert!(token.lexeme().is_some(), "{kind} uses {token:?}");
            }
        }
    }

    #[test]
    fn test_debug_rendering() {
        let add = Node::new(NodeKind::Add, vec![ident("a"), int(1)], 3);
        assert_eq!(add.to_string(), "Add(Identifier a, Integer 1)");
        let statement = Node::new(NodeKind::Statement, vec![Slot::Interior(add)], 3);
        assert_eq!(
            statement.to_string(),
            "Statement(Add(Identifier a, Integer 1))"
        );
    }

    #[test]
    fn test_source_rendering() {
        let sub = Node::new(NodeKind::Sub, vec![ident("a"), int(-5)], 1);
        assert_eq!(sub.to_source(), "a - -5");
        let pointer = Node::new(NodeKind::Pointer, vec![ident("int")], 1);
        assert_eq!(pointer.to_source(), "pointer int");
        let public = Node::new(NodeKind::Public, vec![ident("x")], 1);
        assert_eq!(public.to_source(), "public x");
        let parens = Node::new(NodeKind::Parentheses, vec![], 1);
        let call = Node::new(
            NodeKind::Call,
            vec![ident("foo"), Slot::Interior(parens)],
            1,
        );
        assert_eq!(call.to_source(), "foo()");
    }

    #[test]
    fn test_collect_excludes_self_and_orders_children_first() {
        let inner = Node::new(NodeKind::Add, vec![ident("b"), int(2)], 1);
        let middle = Node::new(NodeKind::Add, vec![Slot::Interior(inner), int(3)], 1);
        let other = Node::new(NodeKind::Add, vec![ident("c"), int(4)], 1);
        let outer = Node::new(
            NodeKind::Add,
            vec![Slot::Interior(middle), Slot::Interior(other)],
            1,
        );
        let found = outer.collect(NodeKind::Add);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].to_source(), "b + 2 + 3");
        assert_eq!(found[1].to_source(), "b + 2");
        assert_eq!(found[2].to_source(), "c + 4");
        assert!(outer.collect(NodeKind::Mul).is_empty());
    }

    #[test]
    fn test_named_children() {
        let sizes = Node::new(NodeKind::Bracket, vec![int(4)], 1);
        let array = Node::new(NodeKind::Array, vec![Slot::Interior(sizes), ident("int")], 1);
        assert_eq!(array.sizes().map(Node::kind), Some(NodeKind::Bracket));
        assert_eq!(array.operand().map(Slot::to_source).as_deref(), Some("int"));
        assert!(array.arrow().is_none());

        let arrow = Node::new(
            NodeKind::Arrow,
            vec![Slot::Interior(Node::new(NodeKind::Parentheses, vec![], 1)), ident("int")],
            1,
        );
        let func = Node::new(NodeKind::Func, vec![Slot::Interior(arrow)], 1);
        assert_eq!(func.arrow().map(Node::kind), Some(NodeKind::Arrow));
        assert!(func.body().is_none());
        assert!(func.sizes().is_none());
    }

    #[test]
    fn test_depth() {
        let leaves = Node::new(NodeKind::Add, vec![ident("a"), int(1)], 1);
        assert_eq!(leaves.depth(), 1);
        let pointer = Node::new(NodeKind::Pointer, vec![ident("int")], 1);
        let array = Node::new(
            NodeKind::Array,
            vec![
                Slot::Interior(Node::new(NodeKind::Bracket, vec![], 1)),
                Slot::Interior(Node::new(NodeKind::Reference, vec![Slot::Interior(pointer)], 1)),
            ],
            1,
        );
        assert_eq!(array.depth(), 3);
    }

    #[test]
    fn test_equality_ignores_line() {
        let a = Node::new(NodeKind::Pointer, vec![ident("int")], 1);
        let b = Node::new(NodeKind::Pointer, vec![ident("int")], 9);
        assert_eq!(a, b);
    }
}
