//! Helpers shared between the tarn crates

pub mod diagnostic;
pub mod nom_helpers;
