//! Step partitioner
//!
//! Splits a procedure body at its top-level checkpoints. Before splitting,
//! the body is checked against the structural preconditions of a pipeline;
//! every violation is reported once, at the offending operation.

use crate::error::{CompileError, Diagnostic, DiagnosticKind, Result};
use stepwise_core::ir::OperationRange;
use stepwise_core::{Operation, OperationKind, Procedure, ProcedureBody, Span};

/// A contiguous slice of the body opened by a top-level checkpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub index: usize,
    pub name: String,
    /// Location of the opening checkpoint
    pub span: Span,
    /// Covered top-level operations, checkpoint included
    pub range: OperationRange,
    /// Covered operations without the opening checkpoint
    pub operations: Vec<Operation>,
}

/// Step partitioner
pub struct StepPartitioner;

impl StepPartitioner {
    /// Validate and partition the procedure body
    pub fn partition(procedure: &Procedure) -> Result<Vec<Partition>> {
        let diagnostics = Self::validate(procedure);
        if !diagnostics.is_empty() {
            return Err(CompileError::Rejected {
                procedure: procedure.qualified_name(),
                diagnostics,
            });
        }

        let operations = match &procedure.body {
            ProcedureBody::Block(operations) => operations,
            ProcedureBody::Expression(_) => {
                return Err(CompileError::CompileError(
                    "expression body passed validation".to_string(),
                ))
            }
        };

        let mut partitions: Vec<Partition> = Vec::new();
        for (position, operation) in operations.iter().enumerate() {
            if let Some(name) = operation.checkpoint_name() {
                partitions.push(Partition {
                    index: partitions.len(),
                    name: name.to_string(),
                    span: operation.span,
                    range: OperationRange::new(position, position),
                    operations: Vec::new(),
                });
            } else if let Some(current) = partitions.last_mut() {
                current.range.end = position;
                current.operations.push(operation.clone());
            } else {
                return Err(CompileError::CompileError(
                    "operation before the leading checkpoint".to_string(),
                ));
            }
        }

        Ok(partitions)
    }

    /// Collect every structural violation of the procedure, in source order
    pub fn validate(procedure: &Procedure) -> Vec<Diagnostic> {
        let name = procedure.qualified_name();
        let operations = match &procedure.body {
            ProcedureBody::Block(operations) => operations,
            ProcedureBody::Expression(_) => {
                return vec![Diagnostic::new(
                    DiagnosticKind::UnsupportedBodyShape,
                    procedure.span,
                    name,
                )];
            }
        };

        let mut validator = Validator {
            procedure: name,
            diagnostics: Vec::new(),
        };

        match operations.first() {
            Some(first) if first.is_checkpoint() => {}
            Some(first) => validator.report(DiagnosticKind::MissingLeadingCheckpoint, first.span),
            None => validator.report(DiagnosticKind::MissingLeadingCheckpoint, procedure.span),
        }

        // Returns are legal from the final top-level checkpoint on
        let final_step_start = operations.iter().rposition(Operation::is_checkpoint);

        for (position, operation) in operations.iter().enumerate() {
            let returns_allowed = final_step_start.map_or(true, |start| position >= start);
            validator.check(operation, returns_allowed);
        }

        validator.diagnostics
    }
}

struct Validator {
    procedure: String,
    diagnostics: Vec<Diagnostic>,
}

impl Validator {
    fn report(&mut self, kind: DiagnosticKind, span: Span) {
        self.diagnostics
            .push(Diagnostic::new(kind, span, self.procedure.clone()));
    }

    fn check(&mut self, operation: &Operation, returns_allowed: bool) {
        match &operation.kind {
            OperationKind::LocalFunction { .. } => {
                self.report(DiagnosticKind::UnsupportedDeclaration, operation.span)
            }
            OperationKind::Goto { .. } => {
                self.report(DiagnosticKind::IllegalControlTransfer, operation.span)
            }
            OperationKind::Return(_) if !returns_allowed => {
                self.report(DiagnosticKind::MisplacedReturn, operation.span)
            }
            _ => {}
        }

        for nested in operation.nested() {
            for inner in nested {
                self.check(inner, returns_allowed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::Expression;

    fn create_test_procedure(operations: Vec<Operation>) -> Procedure {
        Procedure::builder("operation")
            .containing_type("Example")
            .body(operations)
            .build()
            .unwrap()
    }

    fn kinds(procedure: &Procedure) -> Vec<DiagnosticKind> {
        StepPartitioner::validate(procedure)
            .into_iter()
            .map(|d| d.kind)
            .collect()
    }

    #[test]
    fn test_partition_at_top_level_checkpoints() {
        let procedure = create_test_procedure(vec![
            Operation::checkpoint("One"),
            Operation::expr(Expression::path("a")),
            Operation::expr(Expression::path("b")),
            Operation::checkpoint("Two"),
            Operation::expr(Expression::path("c")),
        ]);

        let partitions = StepPartitioner::partition(&procedure).unwrap();

        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0].name, "One");
        assert_eq!(partitions[0].range, OperationRange::new(0, 2));
        assert_eq!(partitions[0].operations.len(), 2);
        assert_eq!(partitions[1].index, 1);
        assert_eq!(partitions[1].range, OperationRange::new(3, 4));
    }

    #[test]
    fn test_checkpoint_only_step() {
        let procedure = create_test_procedure(vec![
            Operation::checkpoint("One"),
            Operation::checkpoint("Two"),
        ]);

        let partitions = StepPartitioner::partition(&procedure).unwrap();
        assert_eq!(partitions[0].range, OperationRange::new(0, 0));
        assert!(partitions[0].operations.is_empty());
    }

    #[test]
    fn test_nested_checkpoint_stays_in_step() {
        let procedure = create_test_procedure(vec![
            Operation::checkpoint("One"),
            Operation::block(vec![Operation::checkpoint("Inner")]),
        ]);

        let partitions = StepPartitioner::partition(&procedure).unwrap();
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].operations.len(), 1);
    }

    #[test]
    fn test_empty_body_is_missing_checkpoint() {
        let procedure = create_test_procedure(vec![]);
        assert_eq!(kinds(&procedure), vec![DiagnosticKind::MissingLeadingCheckpoint]);
    }

    #[test]
    fn test_each_violation_reported_once_in_order() {
        let procedure = create_test_procedure(vec![
            Operation::expr(Expression::path("early")).at(2, 5),
            Operation::checkpoint("One").at(3, 1),
            Operation::if_then(
                Expression::literal(true),
                vec![Operation::goto("One").at(5, 9), Operation::ret(None).at(6, 9)],
            ),
            Operation::local_function("helper").at(8, 5),
            Operation::checkpoint("Two").at(9, 1),
            Operation::ret(None).at(10, 5),
        ]);

        let diagnostics = StepPartitioner::validate(&procedure);
        let summary: Vec<_> = diagnostics.iter().map(|d| (d.kind, d.span.line)).collect();

        assert_eq!(
            summary,
            vec![
                (DiagnosticKind::MissingLeadingCheckpoint, 2),
                (DiagnosticKind::IllegalControlTransfer, 5),
                (DiagnosticKind::MisplacedReturn, 6),
                (DiagnosticKind::UnsupportedDeclaration, 8),
            ]
        );
        assert!(diagnostics.iter().all(|d| d.procedure == "Example.operation"));
    }

    #[test]
    fn test_rejected_partition_carries_diagnostics() {
        let procedure = Procedure::builder("ping")
            .expression_body(Expression::path("pong"))
            .build()
            .unwrap();

        match StepPartitioner::partition(&procedure) {
            Err(CompileError::Rejected { procedure, diagnostics }) => {
                assert_eq!(procedure, "ping");
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(diagnostics[0].kind, DiagnosticKind::UnsupportedBodyShape);
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
    }
}
