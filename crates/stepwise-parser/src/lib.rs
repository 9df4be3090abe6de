//! Stepwise Parser - YAML procedure documents to procedure IR
//!
//! Procedure documents are already-structured IR written as YAML: a
//! signature plus a body of statements. This crate resolves every variable
//! name to its declaration site and produces `stepwise_core::Procedure`
//! values ready for the compiler.

pub mod error;
pub mod expression_parser;
pub mod procedure_parser;
mod scope;
pub mod source_map;
pub mod yaml_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use expression_parser::ExpressionParser;
pub use procedure_parser::{ProcedureParser, YamlProcedureParser};
pub use source_map::{NodePath, SourcePositions};
pub use yaml_parser::YamlParser;
