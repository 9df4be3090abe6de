//! Error types for Stepwise Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Unknown variable #{0}")]
    UnknownVariable(usize),

    #[error("Variable '{0}' is declared as a parameter but not listed in the parameter list")]
    OrphanParameter(String),

    #[error("Variable '{0}' is used as a parameter but declared as a local")]
    NotAParameter(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
