//! Stepwise Core - IR definitions for the Stepwise pipeline generator
//!
//! This crate provides the fundamental types shared by every Stepwise crate:
//! - Literal values (parameter defaults, constants)
//! - Procedure IR (AST): procedures, operations, expressions, variables
//! - Pipeline IR: steps, flow sets and synthesized interfaces
//! - Error types

pub mod ast;
pub mod error;
pub mod ir;
pub mod types;

// Re-export commonly used types
pub use ast::{
    BinaryOperator, Expression, Operation, OperationKind, Parameter, Procedure, ProcedureBody,
    Receiver, ReturnType, Span, TypeName, UnaryOperator, VarId, Variable,
};
pub use error::CoreError;
pub use ir::{Field, FieldKind, FlowSet, Interface, OperationRange, Pipeline, RegionFlow, Step};
pub use types::Literal;
