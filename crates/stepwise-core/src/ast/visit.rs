//! Read-only traversal over operations and expressions

use super::expression::Expression;
use super::operation::{Operation, OperationKind};

/// Visitor over the procedure IR.
///
/// Default methods walk every child in source order; override a method and
/// call the matching `walk_*` function to keep descending.
pub trait Visitor {
    fn visit_operation(&mut self, operation: &Operation) {
        walk_operation(self, operation);
    }

    fn visit_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }
}

/// Visit every operation of a list
pub fn walk_operations<V: Visitor + ?Sized>(visitor: &mut V, operations: &[Operation]) {
    for operation in operations {
        visitor.visit_operation(operation);
    }
}

/// Visit the children of an operation
pub fn walk_operation<V: Visitor + ?Sized>(visitor: &mut V, operation: &Operation) {
    match &operation.kind {
        OperationKind::Checkpoint { .. }
        | OperationKind::Goto { .. }
        | OperationKind::LocalFunction { .. } => {}
        OperationKind::Declare { init, .. } => {
            if let Some(init) = init {
                visitor.visit_expression(init);
            }
        }
        OperationKind::Assign { target, value, .. } => {
            visitor.visit_expression(target);
            visitor.visit_expression(value);
        }
        OperationKind::Expression(expr) => visitor.visit_expression(expr),
        OperationKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expression(condition);
            walk_operations(visitor, then_branch);
            if let Some(else_branch) = else_branch {
                walk_operations(visitor, else_branch);
            }
        }
        OperationKind::While { condition, body } => {
            visitor.visit_expression(condition);
            walk_operations(visitor, body);
        }
        OperationKind::Block(operations) => walk_operations(visitor, operations),
        OperationKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expression(value);
            }
        }
    }
}

/// Visit the children of an expression
pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expression: &Expression) {
    for child in expression.children() {
        visitor.visit_expression(child);
    }
}
