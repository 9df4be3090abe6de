//! Parser error types

use stepwise_core::{CoreError, Span};
use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Invalid expression
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// Invalid operator
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    /// Statement mapping without a known statement key
    #[error("Unknown statement at {span}: {keys}")]
    UnknownStatement { keys: String, span: Span },

    /// Name that resolves to no parameter or visible local
    #[error("Unknown variable '{name}' at {span}")]
    UnknownVariable { name: String, span: Span },

    /// Two parameters with the same name
    #[error("Duplicate parameter: {0}")]
    DuplicateParameter(String),

    /// Two top-level checkpoints with the same name
    #[error("Duplicate checkpoint: {0}")]
    DuplicateCheckpoint(String),

    /// The resolved procedure failed validation
    #[error("Invalid procedure: {0}")]
    InvalidProcedure(#[from] CoreError),

    /// Generic parse error
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
