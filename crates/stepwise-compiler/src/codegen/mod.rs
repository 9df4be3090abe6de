//! Code generation
//!
//! Serializes a synthesized pipeline into Rust source text.

pub mod expression;
pub mod naming;
pub mod rust_emitter;
pub mod writer;

pub use expression::ExpressionPrinter;
pub use rust_emitter::RustEmitter;
pub use writer::SourceWriter;
