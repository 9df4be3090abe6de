//! Procedure IR
//!
//! The tree a front end hands to the generator: a procedure with its
//! signature, an arena of interned variables and an ordered body of
//! operations. Variables are referenced by `VarId`, so name shadowing never
//! confuses identity.

pub mod expression;
pub mod operation;
pub mod operator;
pub mod procedure;
pub mod span;
pub mod variable;
pub mod visit;

pub use expression::Expression;
pub use operation::{Operation, OperationKind};
pub use operator::{BinaryOperator, UnaryOperator};
pub use procedure::{Parameter, Procedure, ProcedureBody, ProcedureBuilder, Receiver, ReturnType};
pub use span::Span;
pub use variable::{Binding, TypeName, VarId, Variable, VariableArena};
pub use visit::Visitor;
