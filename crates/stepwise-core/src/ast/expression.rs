//! Expression AST nodes

use super::operator::{BinaryOperator, UnaryOperator};
use super::variable::VarId;
use crate::types::Literal;
use serde::{Deserialize, Serialize};

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Literal value
    Literal(Literal),

    /// Reference to a parameter or local variable
    Variable(VarId),

    /// Reference to the enclosing instance.
    ///
    /// `implicit` is set when the source only names a member (`counter`
    /// instead of `self.counter`).
    This { implicit: bool },

    /// Member access (e.g., `self.client`, `order.id`)
    Member {
        receiver: Box<Expression>,
        name: String,
    },

    /// Free path that is not a variable (e.g., `println!`, `Order::new`)
    Path(String),

    /// Call expression
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },

    /// Binary operation
    Binary {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Await a future
    Await(Box<Expression>),

    /// Propagate an error (`expr?`)
    Try(Box<Expression>),

    /// Field of the step's input argument; produced by the reference rewriter
    InputField(VarId),

    /// The step-local instance handle; produced by the reference rewriter
    ContextHandle,
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: impl Into<Literal>) -> Self {
        Expression::Literal(value.into())
    }

    /// Create a variable reference
    pub fn variable(var: VarId) -> Self {
        Expression::Variable(var)
    }

    /// Create an explicit instance reference
    pub fn this() -> Self {
        Expression::This { implicit: false }
    }

    /// Create an implicit instance reference
    pub fn implicit_this() -> Self {
        Expression::This { implicit: true }
    }

    /// Create a member access expression
    pub fn member(receiver: Expression, name: impl Into<String>) -> Self {
        Expression::Member {
            receiver: Box::new(receiver),
            name: name.into(),
        }
    }

    /// Create a free path expression
    pub fn path(path: impl Into<String>) -> Self {
        Expression::Path(path.into())
    }

    /// Create a call expression
    pub fn call(callee: Expression, args: Vec<Expression>) -> Self {
        Expression::Call {
            callee: Box::new(callee),
            args,
        }
    }

    /// Create a method call expression (`receiver.name(args)`)
    pub fn method_call(receiver: Expression, name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::call(Expression::member(receiver, name), args)
    }

    /// Create a binary expression
    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create a unary expression
    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create an await expression
    pub fn await_(future: Expression) -> Self {
        Expression::Await(Box::new(future))
    }

    /// Create an error propagation expression
    pub fn try_(expr: Expression) -> Self {
        Expression::Try(Box::new(expr))
    }

    /// Direct child expressions, in evaluation order
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Literal(_)
            | Expression::Variable(_)
            | Expression::This { .. }
            | Expression::Path(_)
            | Expression::InputField(_)
            | Expression::ContextHandle => Vec::new(),
            Expression::Member { receiver, .. } => vec![receiver.as_ref()],
            Expression::Call { callee, args } => {
                let mut children = vec![callee.as_ref()];
                children.extend(args.iter());
                children
            }
            Expression::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expression::Unary { operand, .. } => vec![operand.as_ref()],
            Expression::Await(inner) | Expression::Try(inner) => vec![inner.as_ref()],
        }
    }
}
