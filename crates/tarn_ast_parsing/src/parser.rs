//! Turns a token stream into a syntax tree.
//!
//! A [Tree] starts out as one leaf per token. The [Pipeline] then runs its generators in
//! precedence order, each replacing runs of slots it recognizes with a single [Node], until
//! the tree holds as few slots as the grammar allows.

pub mod contract;
pub mod error;
pub mod generator;
pub mod generators;
mod node;
mod pipeline;
mod tree;

pub use contract::ValidityError;
pub use error::{ParseError, ParseResult, Side};
pub use node::{Node, NodeKind, Shape};
pub use pipeline::Pipeline;
pub use tree::{Slot, Tree};
