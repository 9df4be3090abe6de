//! Snapshot tests for the emitted Rust text
//!
//! Every document under `tests/inputs` is compiled and its output compared
//! with `tests/snapshots/<name>.snap`.

use std::path::Path;
use stepwise_compiler::Compiler;
use stepwise_parser::YamlProcedureParser;

fn generate_file(path: &Path) -> String {
    let yaml = std::fs::read_to_string(path).unwrap();
    let procedure = YamlProcedureParser::parse(&yaml)
        .unwrap_or_else(|error| panic!("Failed to parse {}: {}", path.display(), error));
    Compiler::new()
        .generate(&procedure)
        .unwrap_or_else(|error| panic!("Failed to generate {}: {}", path.display(), error))
        .text
}

#[test]
fn run_snapshot_tests() {
    let mut count = 0;
    for entry in glob::glob("tests/inputs/*.yaml").expect("Invalid glob pattern") {
        let path = entry.expect("Failed to read file path");
        let output = generate_file(&path);
        let name = path.file_stem().unwrap().to_string_lossy().to_string();

        insta::with_settings!({
            prepend_module_to_snapshot => false,
            snapshot_path => "snapshots",
        }, {
            insta::assert_snapshot!(name, output);
        });
        count += 1;
    }

    assert_eq!(count, 8);
}

#[test]
fn test_runtime_fixtures_are_emitter_output() {
    let fixtures = [
        (
            include_str!("../../stepwise-runtime/tests/fixtures/Example.operation.yaml"),
            include_str!("../../stepwise-runtime/tests/fixtures/Example.operation.g.rs"),
        ),
        (
            include_str!("../../stepwise-runtime/tests/fixtures/Example.parse.yaml"),
            include_str!("../../stepwise-runtime/tests/fixtures/Example.parse.g.rs"),
        ),
    ];

    for (yaml, expected) in fixtures {
        let procedure = YamlProcedureParser::parse(yaml).unwrap();
        let generated = Compiler::new().generate(&procedure).unwrap();
        assert_eq!(generated.text, expected, "{} drifted", generated.name);
    }
}
