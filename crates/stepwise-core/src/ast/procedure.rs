//! Procedure AST definitions
//!
//! A procedure is the unit handed to the generator by a front end: its
//! symbol (name and containing-type chain), signature and ordered body.
//! Procedures are immutable once built.

use super::expression::Expression;
use super::operation::{Operation, OperationKind};
use super::span::Span;
use super::variable::{TypeName, VarId, Variable, VariableArena};
use super::visit::{self, Visitor};
use crate::error::{CoreError, Result};
use crate::types::Literal;
use serde::{Deserialize, Serialize};

/// Whether the procedure is bound to an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receiver {
    Static,
    Instance,
}

/// A procedure parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub var: VarId,
    /// Explicit default literal; a parameter with a default is optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,
}

impl Parameter {
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

/// Declared result of the (asynchronous) procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    /// Future without a value
    Void,
    /// Future of a value type
    Wrapped(TypeName),
}

impl ReturnType {
    /// Value type carried by the future, if any
    pub fn value_type(&self) -> Option<&TypeName> {
        match self {
            ReturnType::Void => None,
            ReturnType::Wrapped(ty) => Some(ty),
        }
    }
}

/// Procedure body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureBody {
    /// Statement block
    Block(Vec<Operation>),
    /// Single expression body
    Expression(Expression),
}

/// A procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    /// Procedure name
    pub name: String,

    /// Containing types, outermost first
    pub containing_types: Vec<String>,

    /// Static or instance-bound
    pub receiver: Receiver,

    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,

    /// Declared return type
    pub return_type: ReturnType,

    /// Body
    pub body: ProcedureBody,

    /// Every parameter and local of the procedure
    pub variables: VariableArena,

    /// Location of the procedure declaration
    #[serde(default, skip_serializing_if = "Span::is_unknown")]
    pub span: Span,
}

impl Procedure {
    /// Start building a procedure
    pub fn builder(name: impl Into<String>) -> ProcedureBuilder {
        ProcedureBuilder::new(name)
    }

    /// Stable identity: containing types and name joined with `.`
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<&str> = self.containing_types.iter().map(String::as_str).collect();
        parts.push(&self.name);
        parts.join(".")
    }

    /// Key under which generated text for this procedure is stored
    pub fn source_name(&self) -> String {
        format!("{}.g.rs", self.qualified_name())
    }

    /// Innermost containing type, if any
    pub fn owner(&self) -> Option<&str> {
        self.containing_types.last().map(String::as_str)
    }

    pub fn is_static(&self) -> bool {
        self.receiver == Receiver::Static
    }

    /// Operations of a block body
    pub fn operations(&self) -> Option<&[Operation]> {
        match &self.body {
            ProcedureBody::Block(operations) => Some(operations),
            ProcedureBody::Expression(_) => None,
        }
    }

    /// Look up a variable
    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var]
    }

    /// The parameter bound to a variable
    pub fn parameter(&self, var: VarId) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.var == var)
    }
}

/// Builder for `Procedure`
///
/// # Example
///
/// ```rust
/// use stepwise_core::ast::{Expression, Operation, Procedure};
///
/// let mut builder = Procedure::builder("operation").containing_type("Example");
/// let context = builder.parameter("context", "Context");
/// let procedure = builder
///     .body(vec![
///         Operation::checkpoint("Step"),
///         Operation::expr(Expression::call(
///             Expression::path("println!"),
///             vec![Expression::literal("{:?}"), Expression::variable(context)],
///         )),
///     ])
///     .build()
///     .unwrap();
///
/// assert_eq!(procedure.qualified_name(), "Example.operation");
/// ```
#[derive(Debug, Clone)]
pub struct ProcedureBuilder {
    name: String,
    containing_types: Vec<String>,
    receiver: Receiver,
    parameters: Vec<Parameter>,
    return_type: ReturnType,
    body: ProcedureBody,
    variables: VariableArena,
    span: Span,
}

impl ProcedureBuilder {
    /// Create a builder for an instance procedure returning a void future
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            containing_types: Vec::new(),
            receiver: Receiver::Instance,
            parameters: Vec::new(),
            return_type: ReturnType::Void,
            body: ProcedureBody::Block(Vec::new()),
            variables: VariableArena::new(),
            span: Span::default(),
        }
    }

    /// Append a containing type (call outermost first)
    pub fn containing_type(mut self, name: impl Into<String>) -> Self {
        self.containing_types.push(name.into());
        self
    }

    /// Mark the procedure static
    pub fn static_(mut self) -> Self {
        self.receiver = Receiver::Static;
        self
    }

    /// Set the receiver kind
    pub fn receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = receiver;
        self
    }

    /// Declare a future-of-value return type
    pub fn returns(mut self, ty: impl Into<TypeName>) -> Self {
        self.return_type = ReturnType::Wrapped(ty.into());
        self
    }

    /// Set the declaration location
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.span = Span::new(line, column);
        self
    }

    /// Declare a mandatory parameter
    pub fn parameter(&mut self, name: impl Into<String>, ty: impl Into<TypeName>) -> VarId {
        let var = self.variables.declare_parameter(name, ty);
        self.parameters.push(Parameter { var, default: None });
        var
    }

    /// Declare an optional parameter with an explicit default literal
    pub fn optional_parameter(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<TypeName>,
        default: impl Into<Literal>,
    ) -> VarId {
        let var = self.variables.declare_parameter(name, ty);
        self.parameters.push(Parameter {
            var,
            default: Some(default.into()),
        });
        var
    }

    /// Declare a local variable
    pub fn local(&mut self, name: impl Into<String>, ty: impl Into<TypeName>) -> VarId {
        self.variables.declare_local(name, ty)
    }

    /// Set a statement-block body
    pub fn body(mut self, operations: Vec<Operation>) -> Self {
        self.body = ProcedureBody::Block(operations);
        self
    }

    /// Set a single-expression body
    pub fn expression_body(mut self, expression: Expression) -> Self {
        self.body = ProcedureBody::Expression(expression);
        self
    }

    /// Validate and build the procedure
    pub fn build(self) -> Result<Procedure> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidName(self.name));
        }
        if let Some(name) = self.containing_types.iter().find(|name| name.trim().is_empty()) {
            return Err(CoreError::InvalidName(name.clone()));
        }

        for parameter in &self.parameters {
            let variable = self
                .variables
                .get(parameter.var)
                .ok_or(CoreError::UnknownVariable(parameter.var.index()))?;
            if !variable.is_parameter() {
                return Err(CoreError::NotAParameter(variable.name().to_string()));
            }
        }

        for (var, variable) in self.variables.iter() {
            if variable.is_parameter() && !self.parameters.iter().any(|p| p.var == var) {
                return Err(CoreError::OrphanParameter(variable.name().to_string()));
            }
        }

        let mut references = ReferenceCollector::default();
        match &self.body {
            ProcedureBody::Block(operations) => visit::walk_operations(&mut references, operations),
            ProcedureBody::Expression(expression) => references.visit_expression(expression),
        }
        if let Some(var) = references.0.iter().find(|var| !self.variables.contains(**var)) {
            return Err(CoreError::UnknownVariable(var.index()));
        }

        Ok(Procedure {
            name: self.name,
            containing_types: self.containing_types,
            receiver: self.receiver,
            parameters: self.parameters,
            return_type: self.return_type,
            body: self.body,
            variables: self.variables,
            span: self.span,
        })
    }
}

/// Collects every variable id mentioned in a body
#[derive(Default)]
struct ReferenceCollector(Vec<VarId>);

impl Visitor for ReferenceCollector {
    fn visit_operation(&mut self, operation: &Operation) {
        if let OperationKind::Declare { var, .. } = &operation.kind {
            self.0.push(*var);
        }
        visit::walk_operation(self, operation);
    }

    fn visit_expression(&mut self, expression: &Expression) {
        if let Expression::Variable(var) | Expression::InputField(var) = expression {
            self.0.push(*var);
        }
        visit::walk_expression(self, expression);
    }
}
