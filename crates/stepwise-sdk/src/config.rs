//! Configuration types for the generator

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stepwise_compiler::CompilerOptions;

/// Generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Procedure document path(s)
    pub sources: Vec<PathBuf>,

    /// Procedure documents (origin, content) - alternative to file paths
    #[serde(skip)]
    pub source_contents: Vec<(String, String)>,

    /// Directory generated files are written to
    pub output_dir: Option<PathBuf>,

    /// Also write the pipeline IR of every procedure as JSON
    pub emit_ir: bool,

    /// Stop at the first rejected procedure
    pub fail_fast: bool,

    /// Compiler options
    pub compiler_options: CompilerOptions,
}

impl GeneratorConfig {
    /// Create a new generator configuration
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            source_contents: Vec::new(),
            output_dir: None,
            emit_ir: false,
            fail_fast: false,
            compiler_options: CompilerOptions::default(),
        }
    }

    /// Add a source file
    pub fn with_source(mut self, path: PathBuf) -> Self {
        self.sources.push(path);
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }

    /// Whether any source was configured
    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty() || !self.source_contents.is_empty()
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}
