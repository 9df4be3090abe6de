//! Command line arguments

use clap::Parser;
use std::path::PathBuf;
use stepwise_sdk::GeneratorConfig;

/// Generate step pipelines from procedure documents
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "stepwise", version, long_about = None)]
pub struct Args {
    /// Procedure documents (YAML)
    pub sources: Vec<PathBuf>,

    /// Directory to write generated files into; prints to stdout when absent
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Also write the pipeline IR of each procedure as JSON
    #[arg(long)]
    pub emit_ir: bool,

    /// Stop at the first rejected procedure
    #[arg(long)]
    pub fail_fast: bool,

    /// Only report diagnostics, write nothing
    #[arg(long)]
    pub check: bool,

    /// Omit the header comment from generated files
    #[arg(long)]
    pub no_header: bool,

    /// Configuration file (defaults to `config/stepwise` if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Layer the arguments over a loaded configuration
    pub fn apply(&self, mut config: GeneratorConfig) -> GeneratorConfig {
        config.sources.extend(self.sources.iter().cloned());
        if let Some(out) = &self.out {
            config.output_dir = Some(out.clone());
        }
        if self.check {
            config.output_dir = None;
        }
        config.emit_ir |= self.emit_ir;
        config.fail_fast |= self.fail_fast;
        if self.no_header {
            config.compiler_options.emit_header = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let args = Args::parse_from([
            "stepwise",
            "a.yaml",
            "b.yaml",
            "--out",
            "generated",
            "--emit-ir",
        ]);

        assert_eq!(args.sources, vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]);
        assert_eq!(args.out, Some(PathBuf::from("generated")));
        assert!(args.emit_ir);
        assert!(!args.fail_fast);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_apply_overrides_config() {
        let config = GeneratorConfig::new().with_source(PathBuf::from("base.yaml"));
        let args = Args::parse_from(["stepwise", "extra.yaml", "--fail-fast", "--no-header"]);

        let config = args.apply(config);
        assert_eq!(
            config.sources,
            vec![PathBuf::from("base.yaml"), PathBuf::from("extra.yaml")]
        );
        assert!(config.fail_fast);
        assert!(!config.compiler_options.emit_header);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_check_discards_output_dir() {
        let config = GeneratorConfig::new().with_output_dir(PathBuf::from("generated"));
        let args = Args::parse_from(["stepwise", "a.yaml", "--check"]);

        assert!(args.apply(config).output_dir.is_none());
    }
}
