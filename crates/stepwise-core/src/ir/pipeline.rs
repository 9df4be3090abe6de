//! Pipeline and step definitions

use super::flow::{FlowSet, OperationRange};
use super::interface::{Interface, OutputBinding};
use crate::ast::{Operation, Procedure, Span, VarId};
use serde::{Deserialize, Serialize};

/// One stage of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Position in the pipeline (0-based)
    pub index: usize,

    /// Name of the checkpoint that opens the step
    pub name: String,

    /// Location of that checkpoint
    #[serde(default, skip_serializing_if = "Span::is_unknown")]
    pub span: Span,

    /// Top-level operations covered, checkpoint included
    pub range: OperationRange,

    /// Retained operations after reference rewriting (the leading
    /// checkpoint is dropped)
    pub operations: Vec<Operation>,

    /// Liveness facts
    pub flow: FlowSet,

    pub input: Interface,
    pub output: Interface,

    /// Variables declared at the top of the step body without initializer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locals: Vec<VarId>,

    /// How each variable-carrying output field is populated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<OutputBinding>,
}

impl Step {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_terminal(&self) -> bool {
        self.flow.is_terminal()
    }
}

/// A synthesized pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// The procedure the pipeline was built from
    pub procedure: Procedure,

    /// Steps in execution order
    pub steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(procedure: Procedure, steps: Vec<Step>) -> Self {
        Self { procedure, steps }
    }

    /// Stable identity of the originating procedure
    pub fn name(&self) -> String {
        self.procedure.qualified_name()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Step by checkpoint name
    pub fn step_named(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.name == name)
    }

    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn terminal(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn previous(&self, step: &Step) -> Option<&Step> {
        step.index.checked_sub(1).and_then(|index| self.steps.get(index))
    }

    pub fn next(&self, step: &Step) -> Option<&Step> {
        self.steps.get(step.index + 1)
    }

    /// Check if steps carry the instance handle
    pub fn has_context(&self) -> bool {
        !self.procedure.is_static()
    }

    /// Check that every step's input equals its predecessor's output
    pub fn is_continuous(&self) -> bool {
        self.steps
            .windows(2)
            .all(|pair| pair[0].output == pair[1].input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Field, RegionFlow};
    use crate::ast::TypeName;
    use std::collections::BTreeSet;

    fn create_test_step(index: usize, name: &str, terminal: bool) -> Step {
        Step {
            index,
            name: name.to_string(),
            span: Span::default(),
            range: OperationRange::new(index, index),
            operations: Vec::new(),
            flow: FlowSet {
                region: RegionFlow::default(),
                outflow: if terminal { None } else { Some(BTreeSet::new()) },
            },
            input: Interface::empty(),
            output: Interface::empty(),
            locals: Vec::new(),
            bindings: Vec::new(),
        }
    }

    #[test]
    fn test_navigation() {
        let procedure = Procedure::builder("operation").build().unwrap();
        let pipeline = Pipeline::new(
            procedure,
            vec![create_test_step(0, "One", false), create_test_step(1, "Two", true)],
        );

        let first = pipeline.first().unwrap();
        assert!(first.is_first());
        assert!(pipeline.previous(first).is_none());
        assert_eq!(pipeline.next(first).unwrap().name, "Two");
        assert!(pipeline.terminal().unwrap().is_terminal());
        assert_eq!(pipeline.step_named("Two").unwrap().index, 1);
        assert!(pipeline.has_context());
    }

    #[test]
    fn test_continuity() {
        let mut builder = Procedure::builder("operation");
        let id = builder.local("id", "i32");
        let procedure = builder.build().unwrap();

        let mut one = create_test_step(0, "One", false);
        let mut two = create_test_step(1, "Two", true);
        one.output = Interface::new(vec![Field::required("id", TypeName::new("i32"), id)]);
        let mut pipeline = Pipeline::new(procedure, vec![one, two.clone()]);
        assert!(!pipeline.is_continuous());

        two.input = pipeline.steps[0].output.clone();
        pipeline.steps[1] = two;
        assert!(pipeline.is_continuous());
    }
}
