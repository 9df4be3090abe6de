//! Reference rewriter
//!
//! Makes a step's retained operations self-contained:
//!
//! 1. Context substitution: explicit and implicit instance references become
//!    the step-local instance handle (instance procedures only).
//! 2. Input threading: every reference to a threaded variable, including
//!    assignment targets, becomes the matching input field.
//!
//! The passes touch disjoint node kinds, so their order does not matter.

use std::collections::BTreeSet;
use stepwise_core::ast::{Expression, Operation, OperationKind, VarId};
use stepwise_core::ir::{FlowSet, Interface, RegionFlow};

/// Reference rewriter for one step
pub struct ReferenceRewriter<'a> {
    inflow: &'a BTreeSet<VarId>,
    instance: bool,
}

impl<'a> ReferenceRewriter<'a> {
    pub fn new(inflow: &'a BTreeSet<VarId>, instance: bool) -> Self {
        Self { inflow, instance }
    }

    /// Rewrite a list of operations
    pub fn rewrite_operations(&self, operations: &[Operation]) -> Vec<Operation> {
        operations
            .iter()
            .map(|operation| self.rewrite_operation(operation))
            .collect()
    }

    fn rewrite_operation(&self, operation: &Operation) -> Operation {
        let kind = match &operation.kind {
            OperationKind::Declare { var, init } => OperationKind::Declare {
                var: *var,
                init: init.as_ref().map(|init| self.rewrite_expression(init)),
            },
            OperationKind::Assign { target, op, value } => OperationKind::Assign {
                target: self.rewrite_expression(target),
                op: *op,
                value: self.rewrite_expression(value),
            },
            OperationKind::Expression(expr) => OperationKind::Expression(self.rewrite_expression(expr)),
            OperationKind::If {
                condition,
                then_branch,
                else_branch,
            } => OperationKind::If {
                condition: self.rewrite_expression(condition),
                then_branch: self.rewrite_operations(then_branch),
                else_branch: else_branch
                    .as_ref()
                    .map(|branch| self.rewrite_operations(branch)),
            },
            OperationKind::While { condition, body } => OperationKind::While {
                condition: self.rewrite_expression(condition),
                body: self.rewrite_operations(body),
            },
            OperationKind::Block(operations) => {
                OperationKind::Block(self.rewrite_operations(operations))
            }
            OperationKind::Return(value) => {
                OperationKind::Return(value.as_ref().map(|value| self.rewrite_expression(value)))
            }
            other @ (OperationKind::Checkpoint { .. }
            | OperationKind::Goto { .. }
            | OperationKind::LocalFunction { .. }) => other.clone(),
        };

        Operation {
            kind,
            span: operation.span,
        }
    }

    /// Rewrite an expression tree
    pub fn rewrite_expression(&self, expression: &Expression) -> Expression {
        match expression {
            Expression::This { .. } if self.instance => Expression::ContextHandle,
            Expression::Variable(var) if self.inflow.contains(var) => Expression::InputField(*var),
            Expression::Member { receiver, name } => {
                Expression::member(self.rewrite_expression(receiver), name.clone())
            }
            Expression::Call { callee, args } => Expression::call(
                self.rewrite_expression(callee),
                args.iter().map(|arg| self.rewrite_expression(arg)).collect(),
            ),
            Expression::Binary { left, op, right } => Expression::binary(
                self.rewrite_expression(left),
                *op,
                self.rewrite_expression(right),
            ),
            Expression::Unary { op, operand } => {
                Expression::unary(*op, self.rewrite_expression(operand))
            }
            Expression::Await(inner) => Expression::await_(self.rewrite_expression(inner)),
            Expression::Try(inner) => Expression::try_(self.rewrite_expression(inner)),
            leaf => leaf.clone(),
        }
    }
}

/// Variables that live in the input record for the whole step.
///
/// This is the inflow plus every input variable the step writes that later
/// steps still need: a write that is not definite must keep the incoming
/// value.
pub fn threaded_variables(input: &Interface, flow: &FlowSet) -> BTreeSet<VarId> {
    let mut threaded = flow.inflow().clone();
    if let Some(outflow) = &flow.outflow {
        threaded.extend(input.vars().filter(|var| {
            outflow.contains(var)
                && flow.region.written_inside.contains(var)
                && !flow.region.declared_inside.contains(var)
        }));
    }
    threaded
}

/// Variables a step must declare itself: touched in the step, not threaded
/// and not declared inside it. Declaration order.
pub fn fallback_locals(region: &RegionFlow, threaded: &BTreeSet<VarId>) -> Vec<VarId> {
    region
        .read_inside
        .union(&region.written_inside)
        .copied()
        .filter(|var| !threaded.contains(var) && !region.declared_inside.contains(var))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::ast::{BinaryOperator, VariableArena};

    #[test]
    fn test_inflow_variables_become_input_fields() {
        let mut arena = VariableArena::new();
        let id = arena.declare_local("id", "i32");
        let other = arena.declare_local("other", "i32");
        let inflow = BTreeSet::from([id]);

        let rewriter = ReferenceRewriter::new(&inflow, true);
        let rewritten = rewriter.rewrite_operations(&[Operation::compound_assign(
            Expression::variable(id),
            BinaryOperator::Add,
            Expression::variable(other),
        )]);

        match &rewritten[0].kind {
            OperationKind::Assign { target, value, .. } => {
                assert_eq!(*target, Expression::InputField(id));
                assert_eq!(*value, Expression::Variable(other));
            }
            _ => panic!("Expected Assign operation"),
        }
    }

    #[test]
    fn test_context_substitution_only_for_instances() {
        let inflow = BTreeSet::new();
        let expr = Expression::method_call(Expression::implicit_this(), "next", vec![]);

        let instance = ReferenceRewriter::new(&inflow, true).rewrite_expression(&expr);
        assert_eq!(
            instance,
            Expression::method_call(Expression::ContextHandle, "next", vec![])
        );

        let unchanged = ReferenceRewriter::new(&inflow, false).rewrite_expression(&expr);
        assert_eq!(unchanged, expr);
    }

    #[test]
    fn test_rewrite_descends_into_nested_blocks() {
        let mut arena = VariableArena::new();
        let flag = arena.declare_parameter("flag", "bool");
        let inflow = BTreeSet::from([flag]);

        let rewritten = ReferenceRewriter::new(&inflow, false).rewrite_operations(&[
            Operation::while_loop(
                Expression::variable(flag),
                vec![Operation::block(vec![Operation::assign(
                    Expression::variable(flag),
                    Expression::literal(false),
                )])],
            ),
        ]);

        let OperationKind::While { condition, body } = &rewritten[0].kind else {
            panic!("Expected While operation");
        };
        assert_eq!(*condition, Expression::InputField(flag));
        let OperationKind::Block(inner) = &body[0].kind else {
            panic!("Expected Block operation");
        };
        assert!(matches!(
            &inner[0].kind,
            OperationKind::Assign { target: Expression::InputField(_), .. }
        ));
    }

    #[test]
    fn test_fallback_locals() {
        let mut arena = VariableArena::new();
        let threaded = arena.declare_local("threaded", "i32");
        let declared = arena.declare_local("declared", "i32");
        let fallback = arena.declare_local("fallback", "i32");

        let region = RegionFlow {
            read_inside: BTreeSet::from([threaded, declared]),
            written_inside: BTreeSet::from([declared, fallback]),
            declared_inside: BTreeSet::from([declared]),
            flows_in: BTreeSet::from([threaded]),
            first_use: vec![threaded, declared, fallback],
        };

        assert_eq!(fallback_locals(&region, &region.flows_in), vec![fallback]);
    }

    #[test]
    fn test_conditionally_written_input_stays_threaded() {
        let mut arena = VariableArena::new();
        let flag = arena.declare_parameter("flag", "bool");
        let x = arena.declare_local("x", "i32");
        let input = Interface::new(vec![
            stepwise_core::ir::Field::required("flag", "bool".into(), flag),
            stepwise_core::ir::Field::required("x", "i32".into(), x),
        ]);

        // if flag { x = 2 }, x read by a later step
        let flow = FlowSet {
            region: RegionFlow {
                read_inside: BTreeSet::from([flag]),
                written_inside: BTreeSet::from([x]),
                flows_in: BTreeSet::from([flag]),
                first_use: vec![flag, x],
                ..RegionFlow::default()
            },
            outflow: Some(BTreeSet::from([x])),
        };

        let threaded = threaded_variables(&input, &flow);
        assert_eq!(threaded, BTreeSet::from([flag, x]));
        assert!(fallback_locals(&flow.region, &threaded).is_empty());
    }
}
