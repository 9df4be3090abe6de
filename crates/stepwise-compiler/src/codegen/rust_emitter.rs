//! Rust emitter
//!
//! Produces one Rust module per step inside a `<procedure>_pipeline`
//! container, nested in one module per containing type:
//!
//! ```text
//! pub mod example {
//!     pub mod operation_pipeline {
//!         pub const PIPELINE_FOR: &str = "Example.operation";
//!         pub mod one { Step, Input, Output, impl Step<Input> for Step }
//!         pub mod two { Step, Input = one::Output, Output, ... }
//!         pub fn pipeline(this) -> impl Step<one::Input, Output = two::Output>
//!     }
//! }
//! ```
//!
//! The text is a pure function of the pipeline and the options, so repeated
//! runs produce identical bytes.

use super::expression::ExpressionPrinter;
use super::naming::{input_argument, module_ident};
use super::writer::SourceWriter;
use crate::compiler::CompilerOptions;
use crate::error::{CompileError, Result};
use std::collections::HashSet;
use stepwise_core::ast::{Operation, OperationKind, ReturnType};
use stepwise_core::ir::{FieldSource, Interface, Pipeline, Step};

const ALLOWED_LINTS: &str = "#[allow(dead_code, unused_imports, unused_mut, unused_variables, unreachable_code, clippy::all)]";

/// Rust source emitter
pub struct RustEmitter<'a> {
    options: &'a CompilerOptions,
}

/// Per-step naming resolved before emission
struct StepNames {
    module: String,
}

impl<'a> RustEmitter<'a> {
    pub fn new(options: &'a CompilerOptions) -> Self {
        Self { options }
    }

    /// Emit the whole pipeline
    pub fn emit(&self, pipeline: &Pipeline) -> Result<String> {
        if pipeline.is_empty() {
            return Err(CompileError::CompileError(format!(
                "pipeline '{}' has no steps",
                pipeline.name()
            )));
        }

        let procedure = &pipeline.procedure;
        let names = Self::step_names(pipeline);
        let mut w = SourceWriter::new(self.options.indent_width);

        if self.options.emit_header {
            w.line_fmt(format_args!(
                "// @generated by stepwise from {}. Do not edit.",
                pipeline.name()
            ));
            w.blank();
        }

        // Lints are silenced on the outermost emitted module
        w.line(ALLOWED_LINTS);
        for containing_type in &procedure.containing_types {
            w.open(&format!("pub mod {} {{", module_ident(containing_type)));
            w.line("use super::*;");
            w.blank();
        }

        w.open(&format!(
            "pub mod {}_pipeline {{",
            module_ident(&procedure.name)
        ));
        w.line("use super::*;");
        w.blank();
        w.line("/// Qualified name of the procedure this pipeline was generated from");
        w.line_fmt(format_args!(
            "pub const PIPELINE_FOR: &str = {:?};",
            pipeline.name()
        ));

        for (step, step_names) in pipeline.steps.iter().zip(&names) {
            w.blank();
            self.emit_step(&mut w, pipeline, step, step_names, &names)?;
        }

        if self.options.emit_composition_helper {
            w.blank();
            self.emit_composition(&mut w, pipeline, &names)?;
        }

        w.close("}");
        for _ in &procedure.containing_types {
            w.close("}");
        }

        Ok(w.finish())
    }

    /// Module names, deduplicated by step index
    fn step_names(pipeline: &Pipeline) -> Vec<StepNames> {
        let mut seen = HashSet::new();
        pipeline
            .steps
            .iter()
            .map(|step| {
                let mut module = module_ident(&step.name);
                if !seen.insert(module.clone()) {
                    module = format!("{}_{}", module, step.index);
                    seen.insert(module.clone());
                }
                StepNames { module }
            })
            .collect()
    }

    /// Type of the instance handle, if steps carry one
    fn handle_type(&self, pipeline: &Pipeline) -> Result<Option<String>> {
        if !pipeline.has_context() {
            return Ok(None);
        }
        let owner = pipeline.procedure.owner().ok_or_else(|| {
            CompileError::CompileError(format!(
                "instance procedure '{}' has no containing type",
                pipeline.name()
            ))
        })?;
        Ok(Some(format!("::std::sync::Arc<{}>", owner)))
    }

    fn emit_step(
        &self,
        w: &mut SourceWriter,
        pipeline: &Pipeline,
        step: &Step,
        names: &StepNames,
        all_names: &[StepNames],
    ) -> Result<()> {
        let runtime = &self.options.runtime_crate;
        let handle = self.handle_type(pipeline)?;

        w.line_fmt(format_args!("/// Step `{}`", step.name));
        w.open(&format!("pub mod {} {{", names.module));
        w.line("use super::*;");
        w.blank();

        // Step unit
        match &handle {
            Some(handle) => {
                w.open("pub struct Step {");
                w.line_fmt(format_args!("this: {},", handle));
                w.close("}");
            }
            None => w.line("pub struct Step;"),
        }
        w.blank();

        // Input
        match pipeline.previous(step) {
            None => self.emit_first_input(w, &step.input),
            Some(previous) => {
                w.line_fmt(format_args!(
                    "pub type Input = super::{}::Output;",
                    all_names[previous.index].module
                ));
            }
        }
        w.blank();

        // Output
        Self::emit_record(w, "Output", &step.output);
        if let Some(result) = step.output.result_field() {
            w.blank();
            w.open(&format!("impl From<{}> for Output {{", result.ty));
            w.open(&format!("fn from(value: {}) -> Self {{", result.ty));
            w.line("Self { value }");
            w.close("}");
            w.close("}");
        }
        w.blank();

        // Inherent impl: constructor and body
        w.open("impl Step {");
        if let Some(handle) = &handle {
            w.open(&format!("pub fn new(this: {}) -> Self {{", handle));
            w.line("Self { this }");
            w.close("}");
            w.blank();
        }
        w.open(&format!(
            "async fn run(&self, mut {}: Input) -> {}::anyhow::Result<Output> {{",
            input_argument(&pipeline.procedure),
            runtime
        ));
        self.emit_body(w, pipeline, step);
        w.close("}");
        w.close("}");
        w.blank();

        // Trait impl
        w.line_fmt(format_args!("#[{}::async_trait]", runtime));
        w.open(&format!("impl {}::Step<Input> for Step {{", runtime));
        w.line("type Output = Output;");
        w.blank();
        w.open(&format!(
            "async fn execute(&self, input: Input) -> {}::Result<Output> {{",
            runtime
        ));
        w.line("self.run(input)");
        w.indent();
        w.line(".await");
        w.line_fmt(format_args!(
            ".map_err(|source| {}::RuntimeError::step({:?}, source))",
            runtime, step.name
        ));
        w.dedent();
        w.close("}");
        w.blank();
        w.open("fn describe(&self) -> String {");
        w.line_fmt(format_args!("format!(\"{{}}/{{}}\", PIPELINE_FOR, {:?})", step.name));
        w.close("}");
        w.close("}");

        w.close("}");
        Ok(())
    }

    /// `Input` of the first step with a constructor filling defaults
    fn emit_first_input(&self, w: &mut SourceWriter, input: &Interface) {
        Self::emit_record(w, "Input", input);
        w.blank();

        let required: Vec<String> = input
            .fields
            .iter()
            .filter(|field| !field.is_optional())
            .map(|field| format!("{}: {}", field.name, field.ty))
            .collect();

        w.open("impl Input {");
        w.line("/// Build an input from the required fields; optional fields take their defaults");
        w.open(&format!("pub fn new({}) -> Self {{", required.join(", ")));
        if input.is_empty() {
            w.line("Self {}");
        } else {
            w.open("Self {");
            for field in &input.fields {
                match field.default() {
                    Some(default) => w.line_fmt(format_args!(
                        "{}: {},",
                        field.name,
                        default.to_initializer(field.ty.as_str())
                    )),
                    None => w.line_fmt(format_args!("{},", field.name)),
                }
            }
            w.close("}");
        }
        w.close("}");
        w.close("}");
    }

    fn emit_record(w: &mut SourceWriter, name: &str, interface: &Interface) {
        if interface.is_empty() {
            w.line_fmt(format_args!("pub struct {} {{}}", name));
            return;
        }
        w.open(&format!("pub struct {} {{", name));
        for field in &interface.fields {
            w.line_fmt(format_args!("pub {}: {},", field.name, field.ty));
        }
        w.close("}");
    }

    fn emit_body(&self, w: &mut SourceWriter, pipeline: &Pipeline, step: &Step) {
        let procedure = &pipeline.procedure;
        let printer = ExpressionPrinter::new(procedure, &step.input);

        for var in &step.locals {
            let variable = procedure.variable(*var);
            w.line_fmt(format_args!("let mut {}: {};", variable.name(), variable.ty()));
        }
        if !step.locals.is_empty() && !step.operations.is_empty() {
            w.blank();
        }

        let wrapped = matches!(procedure.return_type, ReturnType::Wrapped(_));
        let body = BodyPrinter {
            printer: &printer,
            wrapped,
        };
        for operation in &step.operations {
            body.operation(w, operation);
        }

        let ends_with_return = step
            .operations
            .last()
            .is_some_and(|operation| matches!(operation.kind, OperationKind::Return(_)));
        if ends_with_return {
            return;
        }

        if !step.operations.is_empty() {
            w.blank();
        }

        if step.is_terminal() && wrapped {
            w.line("unreachable!(\"pipeline finished without producing a result\")");
            return;
        }

        if step.output.is_empty() || step.bindings.is_empty() {
            w.line("Ok(Output {})");
            return;
        }

        let fields: Vec<String> = step
            .bindings
            .iter()
            .map(|binding| {
                let value = match binding.source {
                    FieldSource::Input => printer.input_field(binding.var),
                    FieldSource::Local => printer.variable_name(binding.var).to_string(),
                };
                if value == binding.field {
                    value
                } else {
                    format!("{}: {}", binding.field, value)
                }
            })
            .collect();

        w.open("Ok(Output {");
        for field in fields {
            w.line_fmt(format_args!("{},", field));
        }
        w.close("})");
    }

    fn emit_composition(
        &self,
        w: &mut SourceWriter,
        pipeline: &Pipeline,
        names: &[StepNames],
    ) -> Result<()> {
        let runtime = &self.options.runtime_crate;
        let handle = self.handle_type(pipeline)?;
        let (Some(first), Some(last)) = (names.first(), names.last()) else {
            return Ok(());
        };

        let parameter = match &handle {
            Some(handle) => format!("this: {}", handle),
            None => String::new(),
        };

        w.line("/// Chain every step into one pipeline");
        w.open(&format!(
            "pub fn pipeline({}) -> impl {}::Step<{}::Input, Output = {}::Output> {{",
            parameter, runtime, first.module, last.module
        ));
        if names.len() > 1 {
            w.line_fmt(format_args!("use {}::StepExt;", runtime));
            w.blank();
        }

        let count = names.len();
        let constructors: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(index, step)| match &handle {
                Some(_) if index + 1 < count => format!("{}::Step::new(this.clone())", step.module),
                Some(_) => format!("{}::Step::new(this)", step.module),
                None => format!("{}::Step", step.module),
            })
            .collect();

        w.line(&constructors[0]);
        w.indent();
        for constructor in &constructors[1..] {
            w.line_fmt(format_args!(".then({})", constructor));
        }
        w.dedent();
        w.close("}");
        Ok(())
    }
}

/// Prints retained operations as statements
struct BodyPrinter<'p, 'a> {
    printer: &'p ExpressionPrinter<'a>,
    wrapped: bool,
}

impl BodyPrinter<'_, '_> {
    fn operations(&self, w: &mut SourceWriter, operations: &[Operation]) {
        for operation in operations {
            self.operation(w, operation);
        }
    }

    fn operation(&self, w: &mut SourceWriter, operation: &Operation) {
        let p = self.printer;
        match &operation.kind {
            OperationKind::Checkpoint { name } => w.line_fmt(format_args!("// {}:", name)),
            OperationKind::Declare { var, init } => {
                let variable = p.variable_name(*var);
                let ty = p.variable_type(*var);
                match init {
                    Some(init) => w.line_fmt(format_args!(
                        "let mut {}: {} = {};",
                        variable,
                        ty,
                        p.print(init)
                    )),
                    None => w.line_fmt(format_args!("let mut {}: {};", variable, ty)),
                }
            }
            OperationKind::Assign { target, op, value } => {
                let op = op.map(|op| op.symbol()).unwrap_or("");
                w.line_fmt(format_args!(
                    "{} {}= {};",
                    p.print(target),
                    op,
                    p.print(value)
                ));
            }
            OperationKind::Expression(expr) => w.line_fmt(format_args!("{};", p.print(expr))),
            OperationKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                w.open(&format!("if {} {{", p.print(condition)));
                self.operations(w, then_branch);
                match else_branch {
                    Some(else_branch) => {
                        w.close("} else {");
                        w.indent();
                        self.operations(w, else_branch);
                        w.close("}");
                    }
                    None => w.close("}"),
                }
            }
            OperationKind::While { condition, body } => {
                w.open(&format!("while {} {{", p.print(condition)));
                self.operations(w, body);
                w.close("}");
            }
            OperationKind::Block(operations) => {
                w.open("{");
                self.operations(w, operations);
                w.close("}");
            }
            OperationKind::Return(value) => match value {
                Some(value) if self.wrapped => w.line_fmt(format_args!(
                    "return Ok(Output {{ {}: {} }});",
                    Interface::RESULT_FIELD,
                    p.print(value)
                )),
                Some(value) => {
                    w.line_fmt(format_args!("{};", p.print(value)));
                    w.line("return Ok(Output {});");
                }
                None => w.line("return Ok(Output {});"),
            },
            OperationKind::Goto { label } => w.line_fmt(format_args!("// goto {}", label)),
            OperationKind::LocalFunction { name } => {
                w.line_fmt(format_args!("// fn {}", name))
            }
        }
    }
}
