//! Checkout generation example
//!
//! This example demonstrates:
//! - Building a Generator from a procedure document
//! - Inspecting the synthesized step interfaces
//! - Printing the generated pipeline source

use stepwise_sdk::GeneratorBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checkout Pipeline Example ===\n");

    let generator = GeneratorBuilder::new()
        .add_source_file(concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/checkout.yaml"))
        .build()
        .await?;

    let report = generator.generate()?;

    for (name, pipeline) in &report.pipelines {
        println!("{} ({} steps)", name, pipeline.len());
        for step in &pipeline.steps {
            let output: Vec<&str> = step.output.fields.iter().map(|f| f.name.as_str()).collect();
            println!("  {:<14} -> {:?}", step.name, output);
        }
        println!();
    }

    for generated in report.generated.values() {
        println!("// ---- {} ----", generated.name);
        println!("{}", generated.text);
    }

    for line in report.diagnostics() {
        eprintln!("{}", line);
    }

    Ok(())
}
