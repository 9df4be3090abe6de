//! Value types for Stepwise
//!
//! Literals appear as parameter defaults and constant expressions.

pub mod literal;

pub use literal::Literal;
