//! The generators making up the standard grammar

mod enclosure;
mod forms;
mod operators;

pub use enclosure::Enclosures;
pub use forms::{Call, Definitions, Prefix, Rule, Statements};
pub use operators::{CommaList, Infix};
