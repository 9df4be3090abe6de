//! Synthesized step interfaces
//!
//! An interface is the ordered field list of a step's `Input` or `Output`
//! record. Field order is part of the contract: `Output(i)` and `Input(i+1)`
//! must agree field by field.

use crate::ast::{TypeName, VarId};
use crate::types::Literal;
use serde::{Deserialize, Serialize};

/// How a field is populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Always supplied by the producer
    Required,

    /// Parameter with an explicit default literal
    Optional { default: Literal },

    /// The procedure's result value
    Result,
}

/// A field of an interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name (unique within the interface)
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub ty: TypeName,

    /// Variable carried by the field; `None` for the result field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var: Option<VarId>,

    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Field {
    /// Field carrying a variable
    pub fn required(name: impl Into<String>, ty: TypeName, var: VarId) -> Self {
        Self {
            name: name.into(),
            ty,
            var: Some(var),
            kind: FieldKind::Required,
        }
    }

    /// Field carrying a defaulted parameter
    pub fn optional(name: impl Into<String>, ty: TypeName, var: VarId, default: Literal) -> Self {
        Self {
            name: name.into(),
            ty,
            var: Some(var),
            kind: FieldKind::Optional { default },
        }
    }

    /// The `value` field of a terminal output
    pub fn result(ty: TypeName) -> Self {
        Self {
            name: Interface::RESULT_FIELD.to_string(),
            ty,
            var: None,
            kind: FieldKind::Result,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.kind, FieldKind::Optional { .. })
    }

    pub fn is_result(&self) -> bool {
        matches!(self.kind, FieldKind::Result)
    }

    /// Default literal of an optional field
    pub fn default(&self) -> Option<&Literal> {
        match &self.kind {
            FieldKind::Optional { default } => Some(default),
            _ => None,
        }
    }
}

/// Ordered field list of an `Input` or `Output` record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Interface {
    pub fields: Vec<Field>,
}

impl Interface {
    /// Name of the terminal result field
    pub const RESULT_FIELD: &'static str = "value";

    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Interface without fields
    pub fn empty() -> Self {
        Self::default()
    }

    /// Field carrying a variable
    pub fn field_for(&self, var: VarId) -> Option<&Field> {
        self.fields.iter().find(|field| field.var == Some(var))
    }

    pub fn contains(&self, var: VarId) -> bool {
        self.field_for(var).is_some()
    }

    /// Field by name
    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn result_field(&self) -> Option<&Field> {
        self.fields.iter().find(|field| field.is_result())
    }

    /// Carried variables, in field order
    pub fn vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.fields.iter().filter_map(|field| field.var)
    }

    /// Field names, in order
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Where a step reads an output field's value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// The matching field of the step's input argument
    Input,
    /// The step-local variable
    Local,
}

/// Population rule for one output field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBinding {
    pub field: String,
    pub var: VarId,
    pub source: FieldSource,
}
