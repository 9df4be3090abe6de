//! Stepwise SDK
//!
//! High-level API for generating pipelines from procedure documents: load
//! documents, generate every procedure, collect diagnostics and write the
//! generated files.

pub mod builder;
pub mod config;
pub mod error;
pub mod generator;

// Re-export main types
pub use builder::GeneratorBuilder;
pub use config::GeneratorConfig;
pub use error::{Result, SdkError};
pub use generator::{GenerationReport, Generator, Rejection, SourceProcedure};

// Re-export commonly used types from dependencies
pub use stepwise_compiler::{CompilerOptions, Diagnostic, DiagnosticKind, GeneratedSource};
