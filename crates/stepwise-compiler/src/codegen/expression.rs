//! Expression printer
//!
//! Renders rewritten expressions as Rust source, adding parentheses only
//! where operator precedence requires them.

use super::naming::input_argument;
use stepwise_core::ast::{BinaryOperator, Expression, Procedure};
use stepwise_core::ir::Interface;
use stepwise_core::Literal;

const PREC_OR: u8 = 1;
const PREC_AND: u8 = 2;
const PREC_COMPARE: u8 = 3;
const PREC_ADD: u8 = 4;
const PREC_MUL: u8 = 5;
const PREC_UNARY: u8 = 6;
const PREC_POSTFIX: u8 = 7;
const PREC_ATOM: u8 = 8;

/// Prints expressions of one step
pub struct ExpressionPrinter<'a> {
    procedure: &'a Procedure,
    input: &'a Interface,
    argument: String,
}

impl<'a> ExpressionPrinter<'a> {
    pub fn new(procedure: &'a Procedure, input: &'a Interface) -> Self {
        Self {
            procedure,
            input,
            argument: input_argument(procedure),
        }
    }

    pub fn print(&self, expression: &Expression) -> String {
        self.print_prec(expression, 0)
    }

    /// Name of a step-local variable
    pub fn variable_name(&self, var: stepwise_core::VarId) -> &str {
        self.procedure.variable(var).name()
    }

    pub fn variable_type(&self, var: stepwise_core::VarId) -> String {
        self.procedure.variable(var).ty().to_string()
    }

    /// `input.<field>` for a threaded variable
    pub fn input_field(&self, var: stepwise_core::VarId) -> String {
        let name = self
            .input
            .field_for(var)
            .map(|field| field.name.as_str())
            .unwrap_or_else(|| self.variable_name(var));
        format!("{}.{}", self.argument, name)
    }

    fn print_prec(&self, expression: &Expression, min: u8) -> String {
        let text = match expression {
            Expression::Literal(literal) => literal.to_source(),
            Expression::Variable(var) => self.variable_name(*var).to_string(),
            Expression::InputField(var) => self.input_field(*var),
            Expression::ContextHandle => "self.this".to_string(),
            Expression::This { .. } => "self".to_string(),
            Expression::Path(path) => path.clone(),
            Expression::Member { receiver, name } => {
                format!("{}.{}", self.print_prec(receiver, PREC_POSTFIX), name)
            }
            Expression::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.print(arg))
                    .collect::<Vec<_>>()
                    .join(", ");
                match callee.as_ref() {
                    Expression::Path(path) => format!("{}({})", path, args),
                    other => format!("{}({})", self.print_prec(other, PREC_POSTFIX), args),
                }
            }
            Expression::Binary { left, op, right } => {
                let prec = binary_precedence(*op);
                // Comparisons do not chain
                let left_min = if op.is_comparison() { prec + 1 } else { prec };
                format!(
                    "{} {} {}",
                    self.print_prec(left, left_min),
                    op.symbol(),
                    self.print_prec(right, prec + 1)
                )
            }
            Expression::Unary { op, operand } => {
                format!("{}{}", op.symbol(), self.print_prec(operand, PREC_UNARY))
            }
            Expression::Await(inner) => format!("{}.await", self.print_prec(inner, PREC_POSTFIX)),
            Expression::Try(inner) => format!("{}?", self.print_prec(inner, PREC_POSTFIX)),
        };

        if precedence(expression) < min {
            format!("({})", text)
        } else {
            text
        }
    }
}

fn binary_precedence(op: BinaryOperator) -> u8 {
    match op {
        BinaryOperator::Or => PREC_OR,
        BinaryOperator::And => PREC_AND,
        BinaryOperator::Eq
        | BinaryOperator::Ne
        | BinaryOperator::Gt
        | BinaryOperator::Ge
        | BinaryOperator::Lt
        | BinaryOperator::Le => PREC_COMPARE,
        BinaryOperator::Add | BinaryOperator::Sub => PREC_ADD,
        BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Rem => PREC_MUL,
    }
}

fn precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::Binary { op, .. } => binary_precedence(*op),
        Expression::Unary { .. } => PREC_UNARY,
        Expression::Literal(Literal::Int(i)) if *i < 0 => PREC_UNARY,
        Expression::Literal(Literal::Float(f)) if f.is_sign_negative() => PREC_UNARY,
        Expression::Member { .. }
        | Expression::Call { .. }
        | Expression::Await(_)
        | Expression::Try(_) => PREC_POSTFIX,
        _ => PREC_ATOM,
    }
}
