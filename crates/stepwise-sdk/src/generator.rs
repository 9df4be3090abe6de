//! Generator
//!
//! Runs the compiler over every loaded procedure. A rejected procedure is
//! recorded with its diagnostics and does not stop its siblings unless the
//! generator is configured to fail fast.

use crate::config::GeneratorConfig;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use stepwise_compiler::{CompileError, Compiler, Diagnostic, GeneratedSource};
use stepwise_core::ir::Pipeline;
use stepwise_core::Procedure;
use tracing::{info, warn};

/// A parsed procedure and the document it came from
#[derive(Debug, Clone)]
pub struct SourceProcedure {
    pub origin: String,
    pub procedure: Procedure,
}

/// A procedure that produced no output
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    /// Document the procedure came from
    pub origin: String,
    /// Qualified procedure name
    pub procedure: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Failure that is not a structural diagnostic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Rejection {
    /// One line per diagnostic, `<origin>:<line>:<col>: error[..]: ..`
    pub fn render(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .diagnostics
            .iter()
            .map(|diagnostic| diagnostic.render(&self.origin))
            .collect();
        if let Some(error) = &self.error {
            lines.push(format!("{}: {} (in {})", self.origin, error, self.procedure));
        }
        lines
    }
}

/// Result of a generation run
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Generated text keyed by stable name
    pub generated: BTreeMap<String, GeneratedSource>,
    /// Pipeline IR keyed by qualified procedure name
    pub pipelines: BTreeMap<String, Pipeline>,
    pub rejected: Vec<Rejection>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Every diagnostic line of every rejected procedure
    pub fn diagnostics(&self) -> Vec<String> {
        self.rejected.iter().flat_map(Rejection::render).collect()
    }
}

/// Batch pipeline generator
pub struct Generator {
    config: GeneratorConfig,
    compiler: Compiler,
    procedures: Vec<SourceProcedure>,
}

impl Generator {
    pub(crate) fn new(config: GeneratorConfig, procedures: Vec<SourceProcedure>) -> Self {
        let compiler = Compiler::with_options(config.compiler_options.clone());
        Self {
            config,
            compiler,
            procedures,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Loaded procedures, in document order
    pub fn procedures(&self) -> &[SourceProcedure] {
        &self.procedures
    }

    /// Generate every procedure in memory
    pub fn generate(&self) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();

        for source in &self.procedures {
            let procedure = &source.procedure;
            let name = procedure.qualified_name();

            let outcome = self.compiler.synthesize(procedure).and_then(|pipeline| {
                let generated = self.compiler.emit(&pipeline)?;
                Ok((pipeline, generated))
            });

            match outcome {
                Ok((pipeline, generated)) => {
                    info!(procedure = %name, steps = pipeline.len(), "generated pipeline");
                    report.pipelines.insert(name, pipeline);
                    report.generated.insert(generated.name.clone(), generated);
                }
                Err(error) if self.config.fail_fast => return Err(error.into()),
                Err(error) => {
                    // The rendered diagnostics are left to the caller
                    let rejection = Self::reject(&source.origin, &name, error);
                    warn!(
                        procedure = %name,
                        origin = %source.origin,
                        diagnostics = rejection.diagnostics.len(),
                        "procedure rejected"
                    );
                    report.rejected.push(rejection);
                }
            }
        }

        Ok(report)
    }

    /// Generate and write to the configured output directory
    pub async fn run(&self) -> Result<GenerationReport> {
        let report = self.generate()?;
        if let Some(dir) = &self.config.output_dir {
            self.write(&report, dir).await?;
        }
        Ok(report)
    }

    /// Write generated files (and the IR dump, if enabled) into `dir`
    pub async fn write(&self, report: &GenerationReport, dir: &Path) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(dir).await?;
        let mut written = Vec::new();

        for (name, generated) in &report.generated {
            let path = dir.join(name);
            tokio::fs::write(&path, &generated.text).await?;
            written.push(path);
        }

        if self.config.emit_ir {
            for (name, pipeline) in &report.pipelines {
                let path = dir.join(format!("{}.ir.json", name));
                let json = serde_json::to_string_pretty(pipeline)?;
                tokio::fs::write(&path, json).await?;
                written.push(path);
            }
        }

        info!(dir = %dir.display(), files = written.len(), "wrote generated files");
        Ok(written)
    }

    fn reject(origin: &str, name: &str, error: CompileError) -> Rejection {
        match error {
            CompileError::Rejected { diagnostics, .. } => Rejection {
                origin: origin.to_string(),
                procedure: name.to_string(),
                diagnostics,
                error: None,
            },
            other => Rejection {
                origin: origin.to_string(),
                procedure: name.to_string(),
                diagnostics: Vec::new(),
                error: Some(other.to_string()),
            },
        }
    }
}
