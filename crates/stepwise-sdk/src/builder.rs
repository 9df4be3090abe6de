//! Builder pattern for Generator

use crate::config::GeneratorConfig;
use crate::error::{Result, SdkError};
use crate::generator::{Generator, SourceProcedure};
use std::collections::HashMap;
use std::path::PathBuf;
use stepwise_compiler::CompilerOptions;
use stepwise_parser::YamlProcedureParser;
use tracing::debug;

/// Builder for Generator
///
/// # Example
///
/// ```rust,ignore
/// use stepwise_sdk::GeneratorBuilder;
///
/// let generator = GeneratorBuilder::new()
///     .add_source_file("procedures/checkout.yaml")
///     .with_output_dir("src/generated")
///     .emit_ir(true)
///     .build()
///     .await?;
///
/// let report = generator.run().await?;
/// ```
pub struct GeneratorBuilder {
    config: GeneratorConfig,
}

impl GeneratorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::new(),
        }
    }

    /// Start from an existing configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Add a procedure document file
    pub fn add_source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sources.push(path.into());
        self
    }

    /// Add multiple procedure document files
    pub fn add_source_files(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.sources.extend(paths);
        self
    }

    /// Add document content directly (alternative to file path)
    ///
    /// `origin` names the document in diagnostics.
    pub fn add_source_content(mut self, origin: impl Into<String>, content: impl Into<String>) -> Self {
        self.config
            .source_contents
            .push((origin.into(), content.into()));
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(path.into());
        self
    }

    /// Write the pipeline IR as JSON next to the generated files
    pub fn emit_ir(mut self, enable: bool) -> Self {
        self.config.emit_ir = enable;
        self
    }

    /// Stop at the first rejected procedure
    pub fn fail_fast(mut self, enable: bool) -> Self {
        self.config.fail_fast = enable;
        self
    }

    /// Set compiler options
    pub fn with_compiler_options(mut self, options: CompilerOptions) -> Self {
        self.config.compiler_options = options;
        self
    }

    /// Load and parse every source, then build the generator
    pub async fn build(self) -> Result<Generator> {
        if !self.config.has_sources() {
            return Err(SdkError::ConfigError(
                "no procedure sources configured".to_string(),
            ));
        }

        let mut documents = Vec::new();
        for path in &self.config.sources {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SdkError::ReadError {
                    path: path.clone(),
                    source,
                })?;
            documents.push((path.display().to_string(), content));
        }
        documents.extend(self.config.source_contents.iter().cloned());

        let mut procedures: Vec<SourceProcedure> = Vec::new();
        let mut origins: HashMap<String, String> = HashMap::new();

        for (origin, content) in documents {
            let parsed = YamlProcedureParser::parse_all(&content).map_err(|source| {
                SdkError::InvalidSource {
                    origin: origin.clone(),
                    source,
                }
            })?;
            debug!(origin = %origin, procedures = parsed.len(), "loaded procedure document");

            for procedure in parsed {
                let name = procedure.qualified_name();
                if let Some(first) = origins.get(&name) {
                    return Err(SdkError::DuplicateProcedure {
                        name,
                        first: first.clone(),
                        second: origin,
                    });
                }
                origins.insert(name, origin.clone());
                procedures.push(SourceProcedure {
                    origin: origin.clone(),
                    procedure,
                });
            }
        }

        Ok(Generator::new(self.config, procedures))
    }
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
