//! Main compiler
//!
//! Runs the stages over one procedure: partition, flow analysis, interface
//! synthesis, reference rewriting and (for `generate`) emission.

use crate::analysis::{FlowAnalyzer, LivenessOracle, StructuralLiveness};
use crate::codegen::RustEmitter;
use crate::error::{CompileError, Result};
use crate::rewrite::{fallback_locals, threaded_variables, ReferenceRewriter};
use crate::semantic::StepPartitioner;
use crate::synthesis::InterfaceSynthesizer;
use serde::{Deserialize, Serialize};
use stepwise_core::ir::{Pipeline, Step};
use stepwise_core::Procedure;
use tracing::debug;

/// Compiler options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Emit the `@generated` header comment
    pub emit_header: bool,
    /// Emit the `pipeline(..)` function chaining every step
    pub emit_composition_helper: bool,
    /// Path of the runtime crate in generated code
    pub runtime_crate: String,
    /// Spaces per indentation level
    pub indent_width: usize,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            emit_header: true,
            emit_composition_helper: true,
            runtime_crate: "::stepwise_runtime".to_string(),
            indent_width: 4,
        }
    }
}

/// Generated text for one procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSource {
    /// Stable key (`<Outer>.<Inner>.<procedure>.g.rs`)
    pub name: String,
    /// Qualified procedure name
    pub pipeline_for: String,
    /// Rust source
    pub text: String,
}

/// The Stepwise compiler
pub struct Compiler {
    options: CompilerOptions,
    oracle: Box<dyn LivenessOracle + Send + Sync>,
}

impl Compiler {
    /// Create a compiler with default options and structural liveness
    pub fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    /// Create a compiler with custom options
    pub fn with_options(options: CompilerOptions) -> Self {
        Self {
            options,
            oracle: Box::new(StructuralLiveness),
        }
    }

    /// Replace the liveness oracle
    pub fn with_oracle(mut self, oracle: impl LivenessOracle + Send + Sync + 'static) -> Self {
        self.oracle = Box::new(oracle);
        self
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Build the pipeline IR of a procedure
    pub fn synthesize(&self, procedure: &Procedure) -> Result<Pipeline> {
        let partitions = StepPartitioner::partition(procedure)?;

        if !procedure.is_static() && procedure.owner().is_none() {
            return Err(CompileError::CompileError(format!(
                "instance procedure '{}' has no containing type",
                procedure.qualified_name()
            )));
        }

        let flows = FlowAnalyzer::new(self.oracle.as_ref()).analyze(procedure, &partitions);
        let instance = !procedure.is_static();

        let mut steps = Vec::with_capacity(partitions.len());
        let mut input = InterfaceSynthesizer::first_input(procedure);

        for (partition, flow) in partitions.into_iter().zip(flows) {
            let output = InterfaceSynthesizer::output(procedure, &input, &flow);
            let threaded = threaded_variables(&input, &flow);
            let bindings = InterfaceSynthesizer::bindings(&input, &output, &flow, &threaded);
            let operations =
                ReferenceRewriter::new(&threaded, instance).rewrite_operations(&partition.operations);
            let locals = fallback_locals(&flow.region, &threaded);

            debug!(
                step = %partition.name,
                input = ?input.names(),
                output = ?output.names(),
                locals = locals.len(),
                "synthesized step"
            );

            let next_input = output.clone();
            steps.push(Step {
                index: partition.index,
                name: partition.name,
                span: partition.span,
                range: partition.range,
                operations,
                flow,
                input,
                output,
                locals,
                bindings,
            });
            input = next_input;
        }

        Ok(Pipeline::new(procedure.clone(), steps))
    }

    /// Synthesize and emit Rust source for a procedure
    pub fn generate(&self, procedure: &Procedure) -> Result<GeneratedSource> {
        let pipeline = self.synthesize(procedure)?;
        self.emit(&pipeline)
    }

    /// Emit Rust source for an already synthesized pipeline
    pub fn emit(&self, pipeline: &Pipeline) -> Result<GeneratedSource> {
        let text = RustEmitter::new(&self.options).emit(pipeline)?;

        debug!(
            procedure = %pipeline.name(),
            bytes = text.len(),
            "emitted pipeline"
        );

        Ok(GeneratedSource {
            name: pipeline.procedure.source_name(),
            pipeline_for: pipeline.name(),
            text,
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::{Expression, Operation};

    #[test]
    fn test_default_options() {
        let options = CompilerOptions::default();
        assert!(options.emit_header);
        assert!(options.emit_composition_helper);
        assert_eq!(options.runtime_crate, "::stepwise_runtime");
        assert_eq!(options.indent_width, 4);
    }

    #[test]
    fn test_options_deserialize_partial() {
        let options: CompilerOptions =
            serde_json::from_str(r#"{ "emit_header": false }"#).unwrap();
        assert!(!options.emit_header);
        assert_eq!(options.indent_width, 4);
    }

    #[test]
    fn test_instance_procedure_requires_owner() {
        let procedure = Procedure::builder("operation")
            .body(vec![Operation::checkpoint("One")])
            .build()
            .unwrap();

        let result = Compiler::new().synthesize(&procedure);
        assert!(matches!(result, Err(CompileError::CompileError(_))));
    }

    #[test]
    fn test_static_procedure_without_owner() {
        let procedure = Procedure::builder("operation")
            .static_()
            .body(vec![
                Operation::checkpoint("One"),
                Operation::expr(Expression::call(Expression::path("tick"), vec![])),
            ])
            .build()
            .unwrap();

        let generated = Compiler::new().generate(&procedure).unwrap();
        assert_eq!(generated.name, "operation.g.rs");
        assert_eq!(generated.pipeline_for, "operation");
        assert!(generated.text.contains("pub struct Step;"));
    }
}
