//! SDK error types

use std::path::PathBuf;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parser error
    #[error("Parser error: {0}")]
    ParseError(#[from] stepwise_parser::ParseError),

    /// A source document could not be parsed
    #[error("Invalid source file {origin}: {source}")]
    InvalidSource {
        origin: String,
        #[source]
        source: stepwise_parser::ParseError,
    },

    /// Compiler error
    #[error("Compiler error: {0}")]
    CompileError(#[from] stepwise_compiler::CompileError),

    /// Two procedures share a stable name
    #[error("Duplicate procedure '{name}' in {first} and {second}")]
    DuplicateProcedure {
        name: String,
        first: String,
        second: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to read a source file
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IR serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic SDK error
    #[error("SDK error: {0}")]
    GenericError(String),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let error = SdkError::ConfigError("no sources".to_string());
        assert_eq!(error.to_string(), "Configuration error: no sources");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let sdk_error: SdkError = io_error.into();
        assert!(sdk_error.to_string().contains("I/O error"));
        assert!(sdk_error.to_string().contains("File not found"));
    }

    #[test]
    fn test_duplicate_procedure() {
        let error = SdkError::DuplicateProcedure {
            name: "Example.operation".to_string(),
            first: "a.yaml".to_string(),
            second: "b.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Duplicate procedure 'Example.operation' in a.yaml and b.yaml"
        );
    }

    #[test]
    fn test_compile_error_conversion() {
        let compile_error = stepwise_compiler::CompileError::CompileError("boom".to_string());
        let sdk_error: SdkError = compile_error.into();
        assert!(sdk_error.to_string().contains("Compiler error"));
        assert!(sdk_error.to_string().contains("boom"));
    }
}
