//! Runtime error types

use thiserror::Error;

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A step body failed; later steps were not run
    #[error("Step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: anyhow::Error,
    },

    /// Generic runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

impl RuntimeError {
    /// Wrap a failure raised inside the named step
    pub fn step(step: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        RuntimeError::Step {
            step: step.into(),
            source: source.into(),
        }
    }

    /// Name of the failing step, if any
    pub fn step_name(&self) -> Option<&str> {
        match self {
            RuntimeError::Step { step, .. } => Some(step),
            RuntimeError::RuntimeError(_) => None,
        }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_display() {
        let error = RuntimeError::step("Load", anyhow::anyhow!("connection refused"));
        assert_eq!(error.to_string(), "Step 'Load' failed: connection refused");
        assert_eq!(error.step_name(), Some("Load"));
    }

    #[test]
    fn test_step_error_keeps_source() {
        let parse_error = "x".parse::<i32>().unwrap_err();
        let error = RuntimeError::step("Parse", parse_error);

        let source = std::error::Error::source(&error).unwrap();
        assert_eq!(source.to_string(), "invalid digit found in string");
    }
}
