//! Variables and the variable arena
//!
//! Every variable of a procedure is interned once at its declaration site.
//! The resulting `VarId` is the variable's identity: two references denote the
//! same variable iff their ids are equal. Ids are handed out in declaration
//! order, so ordering by `VarId` is ordering by declaration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interned variable identifier (index into a `VariableArena`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarId(u32);

impl VarId {
    pub(crate) fn from_index(index: usize) -> Self {
        VarId(index as u32)
    }

    /// Position of the variable in its arena (= declaration order)
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A type as written by the front end (e.g. `i32`, `String`, `Vec<u8>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        TypeName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        TypeName::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        TypeName(value)
    }
}

/// Name, type and declaration order of a variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeName,
    pub order: usize,
}

/// A variable, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variable {
    /// Procedure parameter
    Parameter(Binding),
    /// Local variable declared in the body
    Local(Binding),
}

impl Variable {
    pub fn binding(&self) -> &Binding {
        match self {
            Variable::Parameter(binding) | Variable::Local(binding) => binding,
        }
    }

    pub fn name(&self) -> &str {
        &self.binding().name
    }

    pub fn ty(&self) -> &TypeName {
        &self.binding().ty
    }

    pub fn order(&self) -> usize {
        self.binding().order
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self, Variable::Parameter(_))
    }
}

/// Arena interning every variable of one procedure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableArena {
    variables: Vec<Variable>,
}

impl VariableArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a parameter
    pub fn declare_parameter(&mut self, name: impl Into<String>, ty: impl Into<TypeName>) -> VarId {
        let binding = self.binding(name.into(), ty.into());
        self.push(Variable::Parameter(binding))
    }

    /// Intern a local variable
    pub fn declare_local(&mut self, name: impl Into<String>, ty: impl Into<TypeName>) -> VarId {
        let binding = self.binding(name.into(), ty.into());
        self.push(Variable::Local(binding))
    }

    /// Look up a variable
    pub fn get(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// Check if the id belongs to this arena
    pub fn contains(&self, id: VarId) -> bool {
        id.index() < self.variables.len()
    }

    /// Iterate variables in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(index, variable)| (VarId::from_index(index), variable))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    fn binding(&self, name: String, ty: TypeName) -> Binding {
        Binding {
            name,
            ty,
            order: self.variables.len(),
        }
    }

    fn push(&mut self, variable: Variable) -> VarId {
        let id = VarId::from_index(self.variables.len());
        self.variables.push(variable);
        id
    }
}

impl std::ops::Index<VarId> for VariableArena {
    type Output = Variable;

    fn index(&self, id: VarId) -> &Variable {
        &self.variables[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_interns_in_declaration_order() {
        let mut arena = VariableArena::new();
        let context = arena.declare_parameter("context", "Context");
        let id = arena.declare_local("id", "i32");

        assert!(context < id);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[context].name(), "context");
        assert!(arena[context].is_parameter());
        assert_eq!(arena[id].ty().as_str(), "i32");
        assert_eq!(arena[id].order(), 1);
    }

    #[test]
    fn test_same_name_distinct_identity() {
        let mut arena = VariableArena::new();
        let first = arena.declare_local("x", "i32");
        let second = arena.declare_local("x", "String");

        assert_ne!(first, second);
        assert_eq!(arena[first].name(), arena[second].name());
    }

    #[test]
    fn test_arena_lookup_out_of_range() {
        let arena = VariableArena::new();
        assert!(arena.get(VarId::from_index(3)).is_none());
        assert!(!arena.contains(VarId::from_index(0)));
    }
}
