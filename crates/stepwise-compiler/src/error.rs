//! Compiler error types
//!
//! Structural problems with a procedure are reported as diagnostics: plain
//! data carrying a code, a location and the procedure they belong to. A
//! procedure with at least one diagnostic is rejected as a whole.

use serde::{Deserialize, Serialize};
use std::fmt;
use stepwise_core::Span;
use thiserror::Error;

/// The kinds of structural problems that prevent generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// The body is a single expression instead of a statement block
    UnsupportedBodyShape,
    /// A nested function is declared in the body
    UnsupportedDeclaration,
    /// The body does not open with a checkpoint
    MissingLeadingCheckpoint,
    /// The body contains an unconditional jump
    IllegalControlTransfer,
    /// A return statement appears before the final step
    MisplacedReturn,
}

impl DiagnosticKind {
    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UnsupportedBodyShape => "SW0001",
            DiagnosticKind::UnsupportedDeclaration => "SW0002",
            DiagnosticKind::MissingLeadingCheckpoint => "SW0003",
            DiagnosticKind::IllegalControlTransfer => "SW0004",
            DiagnosticKind::MisplacedReturn => "SW0005",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DiagnosticKind::UnsupportedBodyShape => "expression-bodied procedures are not supported",
            DiagnosticKind::UnsupportedDeclaration => "nested functions are not supported",
            DiagnosticKind::MissingLeadingCheckpoint => "procedure body must start with a checkpoint",
            DiagnosticKind::IllegalControlTransfer => "goto statements are not allowed in pipeline procedures",
            DiagnosticKind::MisplacedReturn => "only the last step can contain a return statement",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code(), self.message())
    }
}

/// A fatal, procedure-scoped diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// Offending location
    pub span: Span,

    /// Qualified name of the procedure
    pub procedure: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span, procedure: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            procedure: procedure.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Render as `<file>:<line>:<col>: error[SW000n]: <message> (in <procedure>)`
    pub fn render(&self, file: &str) -> String {
        if self.span.is_unknown() {
            format!("{}: {}", file, self)
        } else {
            format!("{}:{}: {}", file, self.span, self)
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {})", self.kind, self.procedure)
    }
}

/// Compiler error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The procedure violates one or more structural preconditions
    #[error("Procedure '{procedure}' rejected with {} diagnostic(s)", .diagnostics.len())]
    Rejected {
        procedure: String,
        diagnostics: Vec<Diagnostic>,
    },

    /// Generic compilation error
    #[error("Compilation error: {0}")]
    CompileError(String),
}

impl CompileError {
    /// Diagnostics carried by a rejection
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompileError::Rejected { diagnostics, .. } => diagnostics,
            CompileError::CompileError(_) => &[],
        }
    }
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_codes_are_distinct() {
        let kinds = [
            DiagnosticKind::UnsupportedBodyShape,
            DiagnosticKind::UnsupportedDeclaration,
            DiagnosticKind::MissingLeadingCheckpoint,
            DiagnosticKind::IllegalControlTransfer,
            DiagnosticKind::MisplacedReturn,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), 5);
    }

    #[test]
    fn test_diagnostic_render() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::MisplacedReturn,
            Span::new(12, 5),
            "Example.operation",
        );

        assert_eq!(
            diagnostic.render("example.yaml"),
            "example.yaml:12:5: error[SW0005]: only the last step can contain a return statement (in Example.operation)"
        );
    }

    #[test]
    fn test_diagnostic_render_without_location() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::UnsupportedBodyShape,
            Span::default(),
            "Example.ping",
        );

        assert!(diagnostic
            .render("example.yaml")
            .starts_with("example.yaml: error[SW0001]"));
    }
}
