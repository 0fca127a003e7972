//! Per kind validity contracts.
//!
//! Every [NodeKind] has a static [Contract] describing what each of its child slots may hold.
//! [validate] checks a node against its contract and then validates every interior child, so
//! a node is only valid when its whole subtree is.

use crate::parser::node::{Node, NodeKind};
use crate::parser::tree::Slot;
use tarn_tokens::token::TokenKind;
use thiserror::Error;
use tracing::trace;

/// A node that does not fit its contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Node {kind} is invalid on line {line}")]
pub struct ValidityError {
    pub kind: NodeKind,
    pub line: u32,
}

/// What a single child slot may hold
#[derive(Debug, Clone, Copy)]
pub enum Accepts {
    /// anything at all
    Any,
    /// a leaf of one of the token kinds, or a node of one of the node kinds
    OneOf(&'static [TokenKind], &'static [NodeKind]),
    /// a definition node declaring exactly one identifier with no type
    UntypedDefinition,
    /// an identifier, a [Typedef](NodeKind::Typedef), or a comma list of those
    Declarators,
    /// an identifier, or a curly block of identifiers either listed directly or as a single
    /// comma list
    ReturnTypes,
}

impl Accepts {
    /// Checks whether `slot` is acceptable
    pub fn accepts(&self, slot: &Slot) -> bool {
        match *self {
            Accepts::Any => true,
            Accepts::OneOf(tokens, nodes) => match slot {
                Slot::Leaf(token) => tokens.contains(&token.kind()),
                Slot::Interior(node) => nodes.contains(&node.kind()),
            },
            Accepts::UntypedDefinition => match slot.as_node() {
                Some(node) if node.kind().is_definition() => {
                    matches!(node.children(), [only] if only.is_token(TokenKind::Identifier))
                }
                _ => false,
            },
            Accepts::Declarators => match slot {
                Slot::Interior(node) if node.is(NodeKind::Comma) => {
                    node.children().iter().all(is_declarator)
                }
                slot => is_declarator(slot),
            },
            Accepts::ReturnTypes => match slot {
                Slot::Leaf(token) => token.is(TokenKind::Identifier),
                Slot::Interior(node) if node.is(NodeKind::Curly) => match node.children() {
                    [Slot::Interior(list)] if list.is(NodeKind::Comma) => list
                        .children()
                        .iter()
                        .all(|slot| slot.is_token(TokenKind::Identifier)),
                    [first, ..] if first.is_token(TokenKind::Identifier) => node
                        .children()
                        .iter()
                        .all(|slot| slot.is_token(TokenKind::Identifier)),
                    _ => false,
                },
                Slot::Interior(_) => false,
            },
        }
    }
}

/// A single declared name, with or without a type
pub(crate) fn is_declarator(slot: &Slot) -> bool {
    slot.is_token(TokenKind::Identifier) || slot.is_node(NodeKind::Typedef)
}

/// The static shape of one node kind
#[derive(Debug, Clone, Copy)]
pub struct Contract {
    /// children that must be present, in order
    pub required: &'static [Accepts],
    /// children that may follow the required ones, in order
    pub optional: &'static [Accepts],
    /// what every child past those may hold, if any more are allowed
    pub rest: Option<Accepts>,
}

impl Contract {
    const fn exactly(required: &'static [Accepts]) -> Self {
        Self {
            required,
            optional: &[],
            rest: None,
        }
    }

    /// Checks the children of a node against this contract, without descending into them
    pub fn admits(&self, children: &[Slot]) -> bool {
        if children.len() < self.required.len() {
            return false;
        }
        children.iter().enumerate().all(|(index, child)| {
            let accepts = self.required.get(index).or_else(|| {
                self.optional
                    .get(index - self.required.len())
                    .or(self.rest.as_ref())
            });
            match accepts {
                Some(accepts) => accepts.accepts(child),
                None => false,
            }
        })
    }
}

const VALUES: &[TokenKind] = {
    use TokenKind::*;
    &[
        Integer, UInteger, FloatSingle, FloatDouble, Boolean, String, String8, String16,
        String32, String16l, String32l, String16b, String32b, Identifier, Super,
    ]
};

const ASSIGNABLE_VALUES: &[TokenKind] = {
    use TokenKind::*;
    &[
        Integer, UInteger, FloatSingle, FloatDouble, Boolean, String, String8, String16,
        String32, String16l, String32l, String16b, String32b, Identifier,
    ]
};

const MATH_VALUES: &[TokenKind] = {
    use TokenKind::*;
    &[Integer, UInteger, FloatSingle, FloatDouble, Identifier]
};

const INTEGRAL_VALUES: &[TokenKind] = {
    use TokenKind::*;
    &[Integer, UInteger, Identifier]
};

const ARITHMETIC: &[NodeKind] = {
    use NodeKind::*;
    &[Parentheses, Dot, Call, Pow, Mul, Div, Mod, Add, Sub]
};

const ASSIGNABLE: &[NodeKind] = {
    use NodeKind::*;
    &[Call, Lambda, Add, Sub, Mul, Div, Mod, Pow, Dot, Parentheses]
};

const COMPOUND_ASSIGNABLE: &[NodeKind] = {
    use NodeKind::*;
    &[Call, Add, Sub, Mul, Div, Mod, Pow, Dot, Parentheses]
};

const BITWISE: &[NodeKind] = {
    use NodeKind::*;
    &[
        Parentheses, Dot, Call, Pow, Mul, Div, Mod, Add, Sub, BitNot, BitAnd, BitOr, BitXor,
        ShiftLeft, ShiftRight,
    ]
};

const COMPARABLE: &[NodeKind] = BITWISE;

const CONDITIONS: &[NodeKind] = {
    use NodeKind::*;
    &[Parentheses, Dot, Call, Eq, Ne, Lt, Gt, Le, Ge, Not, And, Or]
};

const EXPRESSIONS: &[NodeKind] = {
    use NodeKind::*;
    &[
        Parentheses, Bracket, Dot, Call, Pow, Mul, Div, Mod, Add, Sub, BitNot, BitAnd, BitOr,
        BitXor, ShiftLeft, ShiftRight, Eq, Ne, Lt, Gt, Le, Ge, Not, And, Or, Lambda,
    ]
};

const TYPES: &[NodeKind] = {
    use NodeKind::*;
    &[Array, Reference, Shared, Unique, Pointer, Dot, Parentheses]
};

const DEFINITIONS: &[NodeKind] = {
    use NodeKind::*;
    &[Let, Set, Const, Constexpr]
};

const LIST_ELEMENTS: &[NodeKind] = {
    use NodeKind::*;
    &[
        Parentheses, Curly, Bracket, Dot, Call, Array, Reference, Shared, Unique, Pointer, Pow,
        Mul, Div, Mod, Add, Sub, BitNot, BitAnd, BitOr, BitXor, ShiftLeft, ShiftRight, Eq, Ne,
        Lt, Gt, Le, Ge, Not, And, Or, Typedef, Lambda, Let, Set, Const, Constexpr, Assign,
        TypeAssign,
    ]
};

const IDENTIFIER: &[TokenKind] = &[TokenKind::Identifier];

const NO_TOKENS: &[TokenKind] = &[];

const ANY: Accepts = Accepts::Any;
const VALUE: Accepts = Accepts::OneOf(VALUES, EXPRESSIONS);
const MATH: Accepts = Accepts::OneOf(MATH_VALUES, ARITHMETIC);
const BITS: Accepts = Accepts::OneOf(INTEGRAL_VALUES, BITWISE);
const COMPARED: Accepts = Accepts::OneOf(VALUES, COMPARABLE);
const CONDITION: Accepts = Accepts::OneOf(
    &[TokenKind::Boolean, TokenKind::Identifier],
    CONDITIONS,
);
const TYPE: Accepts = Accepts::OneOf(IDENTIFIER, TYPES);
const NAME: Accepts = Accepts::OneOf(IDENTIFIER, &[]);
const PARENTHESES: Accepts = Accepts::OneOf(NO_TOKENS, &[NodeKind::Parentheses]);
const CURLY: Accepts = Accepts::OneOf(NO_TOKENS, &[NodeKind::Curly]);
const BRACKET: Accepts = Accepts::OneOf(NO_TOKENS, &[NodeKind::Bracket]);
const ELEMENT: Accepts = Accepts::OneOf(VALUES, LIST_ELEMENTS);

const ASSIGN_TARGET: Accepts = Accepts::OneOf(IDENTIFIER, DEFINITIONS);
const ASSIGN_VALUE: Accepts = Accepts::OneOf(ASSIGNABLE_VALUES, ASSIGNABLE);
const COMPOUND_VALUE: Accepts = Accepts::OneOf(MATH_VALUES, COMPOUND_ASSIGNABLE);

const BLOCK: Contract = Contract {
    required: &[],
    optional: &[],
    rest: Some(ANY),
};
const COMMA: Contract = Contract {
    required: &[ELEMENT, ELEMENT],
    optional: &[],
    rest: Some(ELEMENT),
};
const ARITHMETIC_OPERATOR: Contract = Contract::exactly(&[MATH, MATH]);
const BITWISE_OPERATOR: Contract = Contract::exactly(&[BITS, BITS]);
const COMPARISON: Contract = Contract::exactly(&[COMPARED, COMPARED]);
const LOGIC: Contract = Contract::exactly(&[CONDITION, CONDITION]);
const MODIFIER: Contract = Contract::exactly(&[TYPE]);
const DEFINITION: Contract = Contract::exactly(&[Accepts::Declarators]);
const DECLARATION: Contract = Contract::exactly(&[NAME, CURLY]);
const COMPOUND_ASSIGNMENT: Contract = Contract::exactly(&[NAME, COMPOUND_VALUE]);
const VISIBILITY: Contract = Contract::exactly(&[Accepts::OneOf(IDENTIFIER, &[NodeKind::Curly])]);
const CONDITIONAL: Contract = Contract::exactly(&[PARENTHESES, CURLY]);
const JUMP: Contract = Contract::exactly(&[]);

impl NodeKind {
    /// The static contract for this kind
    pub fn contract(&self) -> Contract {
        use NodeKind::*;
        match self {
            Parentheses | Curly | Bracket => BLOCK,
            Comma => COMMA,
            Statement => Contract::exactly(&[ANY]),
            Dot => Contract::exactly(&[
                Accepts::OneOf(
                    &[TokenKind::Identifier, TokenKind::Super],
                    &[NodeKind::Dot, NodeKind::Parentheses, NodeKind::Bracket],
                ),
                NAME,
            ]),
            Call => Contract::exactly(&[
                Accepts::OneOf(IDENTIFIER, &[NodeKind::Dot]),
                PARENTHESES,
            ]),
            Array => Contract::exactly(&[BRACKET, TYPE]),
            Reference | Shared | Unique | Pointer => MODIFIER,
            Pow | Mul | Div | Mod | Add | Sub => ARITHMETIC_OPERATOR,
            BitNot => Contract::exactly(&[BITS]),
            BitAnd | BitOr | BitXor | ShiftLeft | ShiftRight => BITWISE_OPERATOR,
            Eq | Ne | Lt | Gt | Le | Ge => COMPARISON,
            Not => Contract::exactly(&[CONDITION]),
            And | Or => LOGIC,
            Typedef => Contract::exactly(&[NAME, TYPE]),
            Arrow => Contract::exactly(&[
                Accepts::OneOf(NO_TOKENS, &[NodeKind::Parentheses, NodeKind::Typedef]),
                Accepts::ReturnTypes,
            ]),
            Func => Contract {
                required: &[Accepts::OneOf(NO_TOKENS, &[NodeKind::Arrow])],
                optional: &[CURLY],
                rest: None,
            },
            Lambda => Contract::exactly(&[Accepts::OneOf(NO_TOKENS, &[NodeKind::Arrow]), CURLY]),
            Let | Set | Const | Constexpr => DEFINITION,
            Class | Struct | Union | Enum => DECLARATION,
            Assign => Contract::exactly(&[ASSIGN_TARGET, ASSIGN_VALUE]),
            TypeAssign => Contract::exactly(&[Accepts::UntypedDefinition, ASSIGN_VALUE]),
            AddAssign | SubAssign | MulAssign | DivAssign | ModAssign | PowAssign
            | BitAndAssign | BitOrAssign | BitXorAssign | BitNotAssign | ShiftLeftAssign
            | ShiftRightAssign => COMPOUND_ASSIGNMENT,
            Public | Protected | Private | Friend => VISIBILITY,
            Return => Contract {
                required: &[],
                optional: &[VALUE],
                rest: None,
            },
            If | Elif | While | For | Foreach | Match => CONDITIONAL,
            Else => Contract::exactly(&[CURLY]),
            Break | Continue => JUMP,
        }
    }
}

/// Checks `node` against its contract, then every interior child recursively.
///
/// Validity is a pure function of the subtree and may be called any number of times.
pub fn validate(node: &Node) -> Result<(), ValidityError> {
    if !node.kind().contract().admits(node.children()) {
        trace!("{node} does not fit its contract");
        return Err(ValidityError {
            kind: node.kind(),
            line: node.line(),
        });
    }
    node.children()
        .iter()
        .filter_map(Slot::as_node)
        .try_for_each(validate)
}
