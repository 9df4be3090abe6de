//! Liveness oracle
//!
//! Answers read/write/declared/flows-in queries over a contiguous range of
//! top-level operations.
//!
//! The structural implementation walks the operation tree with a
//! definite-assignment state. A read is exposed when the variable is not
//! definitely written earlier in the range; an exposed read flows in when the
//! variable holds a value produced before the range (parameters always do).
//! A write on only one arm of a conditional, or inside a loop body, is not
//! definite past it, so such variables are threaded.

use std::collections::BTreeSet;
use stepwise_core::ast::{Expression, Operation, OperationKind, Procedure, VarId};
use stepwise_core::ir::{OperationRange, RegionFlow};

/// Range-scoped liveness queries
pub trait LivenessOracle {
    /// Analyze the top-level operations covered by `range`
    fn analyze_region(&self, procedure: &Procedure, range: OperationRange) -> RegionFlow;
}

/// Liveness computed from the operation tree alone
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralLiveness;

impl LivenessOracle for StructuralLiveness {
    fn analyze_region(&self, procedure: &Procedure, range: OperationRange) -> RegionFlow {
        let Some(operations) = procedure.operations() else {
            return RegionFlow::default();
        };
        let end = range.end.min(operations.len().saturating_sub(1));
        if operations.is_empty() || range.start > end {
            return RegionFlow::default();
        }
        let region = &operations[range.start..=end];

        let mut usage = Usage::default();
        for operation in region {
            usage.operation(operation);
        }

        let mut produced = Usage::default();
        for operation in &operations[..range.start] {
            produced.operation(operation);
        }

        let mut scan = DefiniteScan::default();
        scan.operations(region);

        let flows_in = scan
            .exposed
            .into_iter()
            .filter(|var| procedure.variable(*var).is_parameter() || produced.written.contains(var))
            .collect();

        RegionFlow {
            read_inside: usage.read,
            written_inside: usage.written,
            declared_inside: usage.declared,
            flows_in,
            first_use: usage.first_use,
        }
    }
}

/// Read/write/declare sets of a region, with first-use order
#[derive(Default)]
struct Usage {
    read: BTreeSet<VarId>,
    written: BTreeSet<VarId>,
    declared: BTreeSet<VarId>,
    first_use: Vec<VarId>,
}

impl Usage {
    fn touch(&mut self, var: VarId) {
        if !self.first_use.contains(&var) {
            self.first_use.push(var);
        }
    }

    fn read(&mut self, var: VarId) {
        self.touch(var);
        self.read.insert(var);
    }

    fn write(&mut self, var: VarId) {
        self.touch(var);
        self.written.insert(var);
    }

    fn operation(&mut self, operation: &Operation) {
        match &operation.kind {
            OperationKind::Declare { var, init } => {
                self.touch(*var);
                self.declared.insert(*var);
                if let Some(init) = init {
                    self.written.insert(*var);
                    self.expression(init);
                }
            }
            OperationKind::Assign { target, op, value } => {
                match target {
                    Expression::Variable(var) => {
                        if op.is_some() {
                            self.read(*var);
                        }
                        self.write(*var);
                    }
                    other => {
                        // Writing through a member or index mutates the root
                        self.expression(other);
                        if let Some(root) = root_variable(other) {
                            self.write(root);
                        }
                    }
                }
                self.expression(value);
            }
            OperationKind::Expression(expr) => self.expression(expr),
            OperationKind::If { condition, .. } | OperationKind::While { condition, .. } => {
                self.expression(condition);
            }
            OperationKind::Return(Some(value)) => self.expression(value),
            _ => {}
        }

        for nested in operation.nested() {
            for inner in nested {
                self.operation(inner);
            }
        }
    }

    fn expression(&mut self, expression: &Expression) {
        if let Expression::Variable(var) = expression {
            self.read(*var);
        }
        for child in expression.children() {
            self.expression(child);
        }
    }
}

/// Forward definite-assignment scan collecting exposed reads
#[derive(Default)]
struct DefiniteScan {
    defined: BTreeSet<VarId>,
    exposed: BTreeSet<VarId>,
}

impl DefiniteScan {
    fn operations(&mut self, operations: &[Operation]) {
        for operation in operations {
            self.operation(operation);
        }
    }

    fn operation(&mut self, operation: &Operation) {
        match &operation.kind {
            OperationKind::Declare { var, init } => match init {
                Some(init) => {
                    self.expression(init);
                    self.defined.insert(*var);
                }
                None => {
                    self.defined.remove(var);
                }
            },
            OperationKind::Assign { target, op, value } => {
                self.expression(value);
                match target {
                    Expression::Variable(var) => {
                        if op.is_some() {
                            self.read(*var);
                        }
                        self.defined.insert(*var);
                    }
                    other => self.expression(other),
                }
            }
            OperationKind::Expression(expr) => self.expression(expr),
            OperationKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.expression(condition);
                let before = self.defined.clone();

                self.operations(then_branch);
                let after_then = std::mem::replace(&mut self.defined, before);

                if let Some(else_branch) = else_branch {
                    self.operations(else_branch);
                }
                self.defined = self.defined.intersection(&after_then).copied().collect();
            }
            OperationKind::While { condition, body } => {
                self.expression(condition);
                let before = self.defined.clone();
                self.operations(body);
                self.defined = before;
            }
            OperationKind::Block(operations) => self.operations(operations),
            OperationKind::Return(Some(value)) => self.expression(value),
            OperationKind::Return(None)
            | OperationKind::Checkpoint { .. }
            | OperationKind::Goto { .. }
            | OperationKind::LocalFunction { .. } => {}
        }
    }

    fn read(&mut self, var: VarId) {
        if !self.defined.contains(&var) {
            self.exposed.insert(var);
        }
    }

    fn expression(&mut self, expression: &Expression) {
        if let Expression::Variable(var) = expression {
            self.read(*var);
        }
        for child in expression.children() {
            self.expression(child);
        }
    }
}

/// Variable at the root of a member access chain (`order.items.len`)
fn root_variable(expression: &Expression) -> Option<VarId> {
    match expression {
        Expression::Variable(var) => Some(*var),
        Expression::Member { receiver, .. } => root_variable(receiver),
        _ => None,
    }
}
