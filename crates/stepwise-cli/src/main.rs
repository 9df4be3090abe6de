//! Stepwise pipeline generator
//!
//! Reads procedure documents, generates one Rust file per procedure and
//! reports diagnostics for rejected procedures.

use anyhow::Result;
use clap::Parser;
use stepwise_cli::{load_config, Args};
use stepwise_sdk::GeneratorBuilder;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let args = Args::parse();
    let config = args.apply(load_config(args.config.as_deref())?);
    let print = config.output_dir.is_none() && !args.check;

    let generator = GeneratorBuilder::with_config(config).build().await?;
    info!("Loaded {} procedure(s)", generator.procedures().len());

    let report = generator.run().await?;

    if print {
        for generated in report.generated.values() {
            println!("// ---- {} ----", generated.name);
            print!("{}", generated.text);
        }
    }

    for line in report.diagnostics() {
        eprintln!("{}", line);
    }

    if !report.is_success() {
        eprintln!(
            "{} procedure(s) rejected, {} generated",
            report.rejected.len(),
            report.generated.len()
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stepwise_cli=info,stepwise_sdk=info,stepwise_compiler=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
