//! Operation (statement) AST nodes
//!
//! A procedure body is an ordered list of operations. Operations nest: `If`,
//! `While` and `Block` own inner operation lists. Only top-level checkpoints
//! delimit pipeline steps.

use super::expression::Expression;
use super::operator::BinaryOperator;
use super::span::Span;
use super::variable::VarId;
use serde::{Deserialize, Serialize};

/// A single operation with its source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OperationKind,
    #[serde(default, skip_serializing_if = "Span::is_unknown")]
    pub span: Span,
}

/// Operation kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Named checkpoint marker
    Checkpoint { name: String },

    /// Local variable declaration with optional initializer
    Declare {
        var: VarId,
        init: Option<Expression>,
    },

    /// Assignment; `op` is set for compound assignments (`+=`)
    Assign {
        target: Expression,
        op: Option<BinaryOperator>,
        value: Expression,
    },

    /// Expression evaluated for its effects
    Expression(Expression),

    /// Conditional
    If {
        condition: Expression,
        then_branch: Vec<Operation>,
        else_branch: Option<Vec<Operation>>,
    },

    /// Loop
    While {
        condition: Expression,
        body: Vec<Operation>,
    },

    /// Nested block
    Block(Vec<Operation>),

    /// Return, optionally with a value
    Return(Option<Expression>),

    /// Unconditional jump to a label
    Goto { label: String },

    /// Nested function declaration
    LocalFunction { name: String },
}

impl Operation {
    /// Create an operation without location
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }

    /// Attach a source location
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.span = Span::new(line, column);
        self
    }

    pub fn checkpoint(name: impl Into<String>) -> Self {
        Self::new(OperationKind::Checkpoint { name: name.into() })
    }

    pub fn declare(var: VarId, init: Option<Expression>) -> Self {
        Self::new(OperationKind::Declare { var, init })
    }

    /// `let var = init;`
    pub fn let_(var: VarId, init: Expression) -> Self {
        Self::declare(var, Some(init))
    }

    pub fn assign(target: Expression, value: Expression) -> Self {
        Self::new(OperationKind::Assign {
            target,
            op: None,
            value,
        })
    }

    pub fn compound_assign(target: Expression, op: BinaryOperator, value: Expression) -> Self {
        Self::new(OperationKind::Assign {
            target,
            op: Some(op),
            value,
        })
    }

    pub fn expr(expr: Expression) -> Self {
        Self::new(OperationKind::Expression(expr))
    }

    pub fn if_then(condition: Expression, then_branch: Vec<Operation>) -> Self {
        Self::new(OperationKind::If {
            condition,
            then_branch,
            else_branch: None,
        })
    }

    pub fn if_else(
        condition: Expression,
        then_branch: Vec<Operation>,
        else_branch: Vec<Operation>,
    ) -> Self {
        Self::new(OperationKind::If {
            condition,
            then_branch,
            else_branch: Some(else_branch),
        })
    }

    pub fn while_loop(condition: Expression, body: Vec<Operation>) -> Self {
        Self::new(OperationKind::While { condition, body })
    }

    pub fn block(operations: Vec<Operation>) -> Self {
        Self::new(OperationKind::Block(operations))
    }

    pub fn ret(value: Option<Expression>) -> Self {
        Self::new(OperationKind::Return(value))
    }

    pub fn goto(label: impl Into<String>) -> Self {
        Self::new(OperationKind::Goto {
            label: label.into(),
        })
    }

    pub fn local_function(name: impl Into<String>) -> Self {
        Self::new(OperationKind::LocalFunction { name: name.into() })
    }

    /// Name of the checkpoint, if this operation is one
    pub fn checkpoint_name(&self) -> Option<&str> {
        match &self.kind {
            OperationKind::Checkpoint { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_checkpoint(&self) -> bool {
        self.checkpoint_name().is_some()
    }

    /// Nested operation lists owned by this operation
    pub fn nested(&self) -> Vec<&[Operation]> {
        match &self.kind {
            OperationKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                let mut lists = vec![then_branch.as_slice()];
                if let Some(else_branch) = else_branch {
                    lists.push(else_branch.as_slice());
                }
                lists
            }
            OperationKind::While { body, .. } => vec![body.as_slice()],
            OperationKind::Block(operations) => vec![operations.as_slice()],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_name() {
        let op = Operation::checkpoint("Validate").at(3, 5);
        assert_eq!(op.checkpoint_name(), Some("Validate"));
        assert_eq!(op.span, Span::new(3, 5));
        assert!(!Operation::goto("Validate").is_checkpoint());
    }

    #[test]
    fn test_nested_lists() {
        let op = Operation::if_else(
            Expression::literal(true),
            vec![Operation::checkpoint("Inner")],
            vec![Operation::ret(None), Operation::ret(None)],
        );

        let nested = op.nested();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].len(), 1);
        assert_eq!(nested[1].len(), 2);

        assert!(Operation::expr(Expression::path("noop")).nested().is_empty());
    }
}
