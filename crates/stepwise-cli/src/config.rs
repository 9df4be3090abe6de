//! Generator configuration loading
//!
//! Settings come from an optional config file and `STEPWISE_*` environment
//! variables (a `.env` file is read first). Command line arguments are
//! applied on top by the binary.

use anyhow::Context;
use std::path::Path;
use stepwise_sdk::GeneratorConfig;

/// Default config file, looked up relative to the working directory
const DEFAULT_CONFIG_FILE: &str = "config/stepwise";

/// Environment variable prefix
const ENV_PREFIX: &str = "STEPWISE";

/// Load configuration.
///
/// An explicit `path` must exist; the default file is optional.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GeneratorConfig> {
    // Load .env file if exists
    dotenvy::dotenv().ok();

    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .context("Failed to load configuration")?;

    let config: GeneratorConfig = settings
        .try_deserialize()
        .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))?;

    tracing::debug!(
        sources = config.sources.len(),
        emit_ir = config.emit_ir,
        "loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stepwise.yaml");
        std::fs::write(
            &path,
            "sources: [procedures/checkout.yaml]\noutput_dir: generated\nemit_ir: true\ncompiler_options:\n  indent_width: 2\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.sources, vec![PathBuf::from("procedures/checkout.yaml")]);
        assert_eq!(config.output_dir, Some(PathBuf::from("generated")));
        assert!(config.emit_ir);
        assert!(!config.fail_fast);
        assert_eq!(config.compiler_options.indent_width, 2);
        assert!(config.compiler_options.emit_header);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.yaml")));
        assert!(result.is_err());
    }
}
