//! Stepwise Compiler - procedure to pipeline compiler
//!
//! This crate turns a checkpointed asynchronous procedure into a chain of
//! step modules: it validates and partitions the body, computes what flows
//! between steps, synthesizes the step records and emits Rust source.

pub mod analysis;
pub mod codegen;
pub mod compiler;
pub mod error;
pub mod rewrite;
pub mod semantic;
pub mod synthesis;

// Re-export main types
pub use compiler::{Compiler, CompilerOptions, GeneratedSource};
pub use error::{CompileError, Diagnostic, DiagnosticKind, Result};

pub use analysis::{FlowAnalyzer, LivenessOracle, StructuralLiveness};
pub use codegen::RustEmitter;
pub use rewrite::ReferenceRewriter;
pub use semantic::{Partition, StepPartitioner};
pub use synthesis::InterfaceSynthesizer;
