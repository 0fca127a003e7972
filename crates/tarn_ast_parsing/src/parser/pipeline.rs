//! The ordered list of generators making up a grammar

use crate::parser::error::ParseResult;
use crate::parser::generator::{sweep, Direction, Generator, Part};
use crate::parser::generators::{
    Call, CommaList, Definitions, Enclosures, Infix, Prefix, Rule, Statements,
};
use crate::parser::node::NodeKind;
use crate::parser::tree::Tree;
use std::fmt::{Debug, Formatter};
use tarn_tokens::token::{Token, TokenKind};
use tracing::{debug, instrument};

const MODIFIERS: &[Rule] = &[
    Rule::new(
        TokenKind::Array,
        NodeKind::Array,
        &[Part::Node(NodeKind::Bracket), Part::Operand],
    ),
    Rule::new(TokenKind::Reference, NodeKind::Reference, &[Part::Operand]),
    Rule::new(TokenKind::Shared, NodeKind::Shared, &[Part::Operand]),
    Rule::new(TokenKind::Unique, NodeKind::Unique, &[Part::Operand]),
    Rule::new(TokenKind::Pointer, NodeKind::Pointer, &[Part::Operand]),
];

const BIT_NOT: &[Rule] = &[Rule::new(
    TokenKind::BitwiseNot,
    NodeKind::BitNot,
    &[Part::Operand],
)];

const NOT: &[Rule] = &[Rule::new(TokenKind::Not, NodeKind::Not, &[Part::Operand])];

const FUNCTIONS: &[Rule] = &[
    Rule::new(
        TokenKind::Func,
        NodeKind::Func,
        &[Part::Operand, Part::Optional(&Part::Node(NodeKind::Curly))],
    ),
    Rule::new(
        TokenKind::Lambda,
        NodeKind::Lambda,
        &[Part::Operand, Part::Operand],
    ),
];

const DEFINITIONS: &[(TokenKind, NodeKind)] = &[
    (TokenKind::Let, NodeKind::Let),
    (TokenKind::Set, NodeKind::Set),
    (TokenKind::Const, NodeKind::Const),
    (TokenKind::Constexpr, NodeKind::Constexpr),
];

const TYPES: &[Rule] = &[
    Rule::new(
        TokenKind::Class,
        NodeKind::Class,
        &[Part::Token(TokenKind::Identifier), Part::Node(NodeKind::Curly)],
    ),
    Rule::new(
        TokenKind::Struct,
        NodeKind::Struct,
        &[Part::Token(TokenKind::Identifier), Part::Node(NodeKind::Curly)],
    ),
    Rule::new(
        TokenKind::Union,
        NodeKind::Union,
        &[Part::Token(TokenKind::Identifier), Part::Node(NodeKind::Curly)],
    ),
    Rule::new(
        TokenKind::Enum,
        NodeKind::Enum,
        &[Part::Token(TokenKind::Identifier), Part::Node(NodeKind::Curly)],
    ),
];

const VISIBILITY: &[Rule] = &[
    Rule::new(TokenKind::Public, NodeKind::Public, &[Part::Operand]),
    Rule::new(TokenKind::Protected, NodeKind::Protected, &[Part::Operand]),
    Rule::new(TokenKind::Private, NodeKind::Private, &[Part::Operand]),
    Rule::new(TokenKind::Friend, NodeKind::Friend, &[Part::Operand]),
];

const CONDITIONED: &[Part] = &[Part::Node(NodeKind::Parentheses), Part::Node(NodeKind::Curly)];

const FLOW: &[Rule] = &[
    Rule::new(
        TokenKind::Return,
        NodeKind::Return,
        &[Part::Optional(&Part::Operand)],
    ),
    Rule::new(TokenKind::If, NodeKind::If, CONDITIONED),
    Rule::new(TokenKind::Elif, NodeKind::Elif, CONDITIONED),
    Rule::new(TokenKind::Else, NodeKind::Else, &[Part::Node(NodeKind::Curly)]),
    Rule::new(TokenKind::While, NodeKind::While, CONDITIONED),
    Rule::new(TokenKind::For, NodeKind::For, CONDITIONED),
    Rule::new(TokenKind::Foreach, NodeKind::Foreach, CONDITIONED),
    Rule::new(TokenKind::Match, NodeKind::Match, CONDITIONED),
    Rule::new(TokenKind::Break, NodeKind::Break, &[]),
    Rule::new(TokenKind::Continue, NodeKind::Continue, &[]),
];

const ASSIGNMENTS: &[(TokenKind, NodeKind)] = &[
    (TokenKind::Assign, NodeKind::Assign),
    (TokenKind::TypeAssign, NodeKind::TypeAssign),
    (TokenKind::PlusAssign, NodeKind::AddAssign),
    (TokenKind::MinusAssign, NodeKind::SubAssign),
    (TokenKind::MultAssign, NodeKind::MulAssign),
    (TokenKind::DivAssign, NodeKind::DivAssign),
    (TokenKind::RemAssign, NodeKind::ModAssign),
    (TokenKind::PowAssign, NodeKind::PowAssign),
    (TokenKind::BitAndAssign, NodeKind::BitAndAssign),
    (TokenKind::BitOrAssign, NodeKind::BitOrAssign),
    (TokenKind::BitXorAssign, NodeKind::BitXorAssign),
    (TokenKind::BitNotAssign, NodeKind::BitNotAssign),
    (TokenKind::LShiftAssign, NodeKind::ShiftLeftAssign),
    (TokenKind::RShiftAssign, NodeKind::ShiftRightAssign),
];

/// An ordered list of generators. Each generator sweeps the tree once, in order, so earlier
/// generators bind tighter.
pub struct Pipeline {
    generators: Vec<Box<dyn Generator>>,
}

impl Pipeline {
    pub fn new(generators: Vec<Box<dyn Generator>>) -> Self {
        Self { generators }
    }

    /// A pipeline that leaves every tree as it is
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// The full tarn grammar, tightest binding first
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(Enclosures),
            Box::new(
                Infix::new("member access", &[(TokenKind::Dot, NodeKind::Dot)])
                    .right(Part::Token(TokenKind::Identifier)),
            ),
            Box::new(Call),
            Box::new(Prefix::new("modifiers", Direction::Backward, MODIFIERS)),
            Box::new(Infix::new("power", &[(TokenKind::Pow, NodeKind::Pow)])),
            Box::new(
                Infix::new(
                    "multiplicative",
                    &[
                        (TokenKind::Star, NodeKind::Mul),
                        (TokenKind::Div, NodeKind::Div),
                        (TokenKind::Rem, NodeKind::Mod),
                    ],
                )
                .math_operands(),
            ),
            Box::new(Infix::new(
                "additive",
                &[
                    (TokenKind::Plus, NodeKind::Add),
                    (TokenKind::Minus, NodeKind::Sub),
                ],
            )),
            Box::new(Prefix::new("bitwise not", Direction::Backward, BIT_NOT)),
            Box::new(Infix::new(
                "bitwise",
                &[
                    (TokenKind::BitwiseAnd, NodeKind::BitAnd),
                    (TokenKind::BitwiseOr, NodeKind::BitOr),
                    (TokenKind::BitwiseXor, NodeKind::BitXor),
                    (TokenKind::LShift, NodeKind::ShiftLeft),
                    (TokenKind::RShift, NodeKind::ShiftRight),
                ],
            )),
            Box::new(Infix::new(
                "comparison",
                &[
                    (TokenKind::Eq, NodeKind::Eq),
                    (TokenKind::Neq, NodeKind::Ne),
                    (TokenKind::Lt, NodeKind::Lt),
                    (TokenKind::Gt, NodeKind::Gt),
                    (TokenKind::Lte, NodeKind::Le),
                    (TokenKind::Gte, NodeKind::Ge),
                ],
            )),
            Box::new(Prefix::new("not", Direction::Backward, NOT)),
            Box::new(Infix::new("and", &[(TokenKind::And, NodeKind::And)])),
            Box::new(Infix::new("or", &[(TokenKind::Or, NodeKind::Or)])),
            Box::new(
                Infix::new("typedef", &[(TokenKind::Colon, NodeKind::Typedef)])
                    .left(Part::Token(TokenKind::Identifier)),
            ),
            Box::new(Infix::new("arrow", &[(TokenKind::Arrow, NodeKind::Arrow)])),
            Box::new(Prefix::new("functions", Direction::Forward, FUNCTIONS)),
            Box::new(Definitions::new(DEFINITIONS)),
            Box::new(Prefix::new("types", Direction::Forward, TYPES)),
            Box::new(Infix::new("assignment", ASSIGNMENTS).backward()),
            Box::new(Prefix::new("visibility", Direction::Backward, VISIBILITY)),
            Box::new(CommaList),
            Box::new(Prefix::new("flow", Direction::Forward, FLOW)),
            Box::new(Statements),
        ])
    }

    pub fn generators(&self) -> &[Box<dyn Generator>] {
        &self.generators
    }

    /// Runs every generator over one level of `tree`, in order.
    ///
    /// Levels nested inside enclosures are reduced by the enclosure generator as it builds them.
    #[instrument(level = "trace", skip_all, fields(slots = tree.len()))]
    pub fn reduce(&self, tree: &mut Tree) -> ParseResult<()> {
        for generator in &self.generators {
            sweep(generator.as_ref(), tree, self)?;
        }
        Ok(())
    }

    /// Builds a tree from `tokens` and reduces it
    pub fn parse(&self, tokens: Vec<Token>) -> ParseResult<Tree> {
        let mut tree = Tree::from_tokens(tokens);
        self.reduce(&mut tree)?;
        debug!("parsed into {} top level slots", tree.len());
        Ok(tree)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl Debug for Pipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.generators.iter().map(|generator| generator.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::node::Node;
    use crate::parser::tree::Slot;
    use test_log::test;

    fn parse(src: &str) -> Tree {
        Pipeline::standard().parse(tokenize(src).unwrap()).unwrap()
    }

    fn single(src: &str) -> String {
        let tree = parse(src);
        assert_eq!(tree.len(), 1, "{src:?} reduced to {tree:?}");
        tree.get(0).unwrap().to_string()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            single("a + b * c"),
            "Add(Identifier a, Mul(Identifier b, Identifier c))"
        );
        assert_eq!(
            single("(a + b) * c"),
            "Mul(Parentheses(Add(Identifier a, Identifier b)), Identifier c)"
        );
        assert_eq!(
            single("a < b and not c"),
            "And(Lt(Identifier a, Identifier b), Not(Identifier c))"
        );
    }

    #[test]
    fn test_statement() {
        assert_eq!(
            single("let x: int = 3 + 4;"),
            "Statement(Assign(Let(Typedef(Identifier x, Identifier int)), Add(Integer 3, Integer 4)))"
        );
    }

    #[test]
    fn test_member_call() {
        assert_eq!(
            single("a.b.c(1, 2)"),
            "Call(Dot(Dot(Identifier a, Identifier b), Identifier c), Parentheses(Comma(Integer 1, Integer 2)))"
        );
    }

    #[test]
    fn test_modifiers_nest() {
        assert_eq!(
            single("pointer pointer int"),
            "Pointer(Pointer(Identifier int))"
        );
        assert_eq!(
            single("reference pointer int"),
            "Reference(Pointer(Identifier int))"
        );
    }

    #[test]
    fn test_flow() {
        let tree = parse("if (x == 1) { return x; } else { break; }");
        assert_eq!(tree.len(), 2);
        assert!(tree.get(0).unwrap().is_node(NodeKind::If));
        assert!(tree.get(1).unwrap().is_node(NodeKind::Else));
        let tree = parse("while (true) { continue; }");
        assert!(matches!(tree.get(0), Some(Slot::Interior(node)) if node.is(NodeKind::While)));
    }

    #[test]
    fn test_definitions() {
        let tree = parse("public struct Point { let x: int; let y: int; }");
        assert_eq!(tree.len(), 1);
        let public = tree.get(0).and_then(Slot::as_node).unwrap();
        assert_eq!(public.kind(), NodeKind::Public);
        assert_eq!(tree.collect(NodeKind::Let).len(), 2);
        assert!(tree.leftover_tokens().next().is_none());
    }

    #[test]
    fn test_function() {
        let tree = parse("func add: (a: int, b: int) -> int { return a + b; }");
        assert_eq!(tree.len(), 1, "{tree:?}");
        let func = tree.get(0).and_then(Slot::as_node).unwrap();
        assert_eq!(func.kind(), NodeKind::Func);
        assert_eq!(func.children().len(), 2);
        assert_eq!(tree.collect(NodeKind::Return).len(), 1);
    }

    #[test]
    fn test_definition_lists() {
        assert_eq!(
            single("let a, b: int;"),
            "Statement(Let(Comma(Identifier a, Typedef(Identifier b, Identifier int))))"
        );
        let statement = parse("const a, b := 1;");
        let assign = statement
            .get(0)
            .and_then(Slot::as_node)
            .and_then(Node::operand)
            .and_then(Slot::as_node)
            .unwrap();
        assert_eq!(assign.kind(), NodeKind::TypeAssign);
        assert_eq!(
            assign.left().map(ToString::to_string).as_deref(),
            Some("Const(Comma(Identifier a, Identifier b))")
        );
        assert_eq!(
            assign.right().map(ToString::to_string).as_deref(),
            Some("Integer 1")
        );
    }

    #[test]
    fn test_generator_order() {
        let pipeline = Pipeline::standard();
        let names = pipeline
            .generators()
            .iter()
            .map(|generator| generator.name())
            .collect::<Vec<_>>();
        assert_eq!(names.first(), Some(&"enclosures"));
        assert_eq!(names.last(), Some(&"statements"));
        let position = |name| names.iter().position(|n| *n == name).unwrap();
        assert!(position("typedef") < position("definitions"));
        assert!(position("definitions") < position("comma list"));
        assert!(Pipeline::empty().generators().is_empty());
    }

    #[test]
    fn test_nothing_applies() {
        let tree = parse("; ;");
        assert_eq!(tree.len(), 2);
        assert!(tree.get(0).unwrap().is_token(TokenKind::SemiColon));
    }
}
