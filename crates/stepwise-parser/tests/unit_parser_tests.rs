//! Unit tests for the YAML procedure parser
//!
//! Tests document layout, signatures, statement kinds and name resolution.

use stepwise_core::ast::{Receiver, ReturnType, TypeName};
use stepwise_core::{Expression, Literal, OperationKind, ProcedureBody};
use stepwise_parser::*;

// =============================================================================
// Signature Tests
// =============================================================================

#[test]
fn test_parse_simple_procedure() {
    let yaml = r#"
procedure:
  name: operation
  containing_types: [Example]
  parameters:
    - { name: context, type: Context }
  body:
    - checkpoint: One
      line: 4
    - let: id
      type: i32
      value: { method: hash_code, on: context }
    - checkpoint: Two
    - expr: { call: "println!", args: [{ literal: "{}" }, id] }
"#;

    let result = YamlProcedureParser::parse(yaml);
    assert!(result.is_ok(), "Failed to parse procedure: {:?}", result.err());

    let procedure = result.unwrap();
    assert_eq!(procedure.qualified_name(), "Example.operation");
    assert_eq!(procedure.receiver, Receiver::Instance);
    assert_eq!(procedure.parameters.len(), 1);

    let operations = procedure.operations().unwrap();
    assert_eq!(operations.len(), 4);
    assert_eq!(operations[0].checkpoint_name(), Some("One"));
    assert_eq!(operations[0].span.line, 4);
    assert_eq!(operations[2].checkpoint_name(), Some("Two"));
}

#[test]
fn test_parse_static_with_return_type() {
    let yaml = r#"
procedure:
  name: parse
  containing_types: Outer.Inner
  static: true
  returns: f64
  parameters:
    - { name: a, type: String }
  body:
    - checkpoint: Parse
    - return: { try: { method: parse, on: a } }
"#;

    let procedure = YamlProcedureParser::parse(yaml).unwrap();
    assert_eq!(procedure.containing_types, vec!["Outer", "Inner"]);
    assert!(procedure.is_static());
    assert_eq!(procedure.return_type, ReturnType::Wrapped(TypeName::new("f64")));
    assert!(matches!(
        procedure.operations().unwrap()[1].kind,
        OperationKind::Return(Some(Expression::Try(_)))
    ));
}

#[test]
fn test_parse_parameter_defaults() {
    let yaml = r#"
procedure:
  name: operation
  parameters:
    - { name: a, type: i32 }
    - { name: b, type: String, default: "Hello" }
    - { name: c, type: f64, default: 451 }
  body:
    - checkpoint: One
"#;

    let procedure = YamlProcedureParser::parse(yaml).unwrap();
    let defaults: Vec<_> = procedure.parameters.iter().map(|p| p.default.clone()).collect();

    assert_eq!(
        defaults,
        vec![
            None,
            Some(Literal::String("Hello".to_string())),
            Some(Literal::Int(451))
        ]
    );
}

#[test]
fn test_parse_expression_body() {
    let yaml = r#"
procedure:
  name: ping
  expression: { await: { call: ping } }
"#;

    let procedure = YamlProcedureParser::parse(yaml).unwrap();
    assert!(matches!(procedure.body, ProcedureBody::Expression(_)));
}

#[test]
fn test_parse_missing_name() {
    let yaml = r#"
procedure:
  body:
    - checkpoint: One
"#;

    let result = YamlProcedureParser::parse(yaml);
    assert!(matches!(result, Err(ParseError::MissingField { ref field }) if field == "name"));
}

#[test]
fn test_parse_duplicate_parameter() {
    let yaml = r#"
procedure:
  name: operation
  parameters:
    - { name: a, type: i32 }
    - { name: a, type: i64 }
"#;

    let result = YamlProcedureParser::parse(yaml);
    assert!(matches!(result, Err(ParseError::DuplicateParameter(ref name)) if name == "a"));
}

// =============================================================================
// Body Tests
// =============================================================================

#[test]
fn test_parse_duplicate_top_level_checkpoint() {
    let yaml = r#"
procedure:
  name: operation
  body:
    - checkpoint: One
    - checkpoint: One
"#;

    let result = YamlProcedureParser::parse(yaml);
    assert!(matches!(result, Err(ParseError::DuplicateCheckpoint(_))));
}

#[test]
fn test_nested_checkpoint_may_reuse_name() {
    let yaml = r#"
procedure:
  name: operation
  body:
    - checkpoint: One
    - block:
        - checkpoint: One
"#;

    assert!(YamlProcedureParser::parse(yaml).is_ok());
}

#[test]
fn test_parse_control_flow_statements() {
    let yaml = r#"
procedure:
  name: operation
  parameters:
    - { name: flag, type: bool }
  body:
    - checkpoint: One
    - let: x
      type: i32
    - if: flag
      then:
        - assign: x
          value: 1
      else:
        - assign: x
          value: 2
    - while: { binary: "<", left: x, right: 10 }
      do:
        - assign: x
          op: "+"
          value: 1
    - goto: One
    - fn: helper
"#;

    let procedure = YamlProcedureParser::parse(yaml).unwrap();
    let operations = procedure.operations().unwrap();

    assert!(matches!(operations[1].kind, OperationKind::Declare { init: None, .. }));
    assert!(matches!(
        operations[2].kind,
        OperationKind::If { else_branch: Some(_), .. }
    ));
    assert!(matches!(operations[3].kind, OperationKind::While { .. }));
    assert!(matches!(operations[4].kind, OperationKind::Goto { .. }));
    assert!(matches!(operations[5].kind, OperationKind::LocalFunction { .. }));
}

#[test]
fn test_parse_unknown_statement() {
    let yaml = r#"
procedure:
  name: operation
  body:
    - checkpoint: One
    - loop: forever
      line: 9
"#;

    let result = YamlProcedureParser::parse(yaml);
    match result {
        Err(ParseError::UnknownStatement { keys, span }) => {
            assert!(keys.contains("loop"));
            assert_eq!(span.line, 9);
        }
        other => panic!("Expected UnknownStatement, got {:?}", other),
    }
}

#[test]
fn test_parse_unknown_variable() {
    let yaml = r#"
procedure:
  name: operation
  body:
    - checkpoint: One
    - expr: missing
      line: 3
"#;

    let result = YamlProcedureParser::parse(yaml);
    assert!(matches!(result, Err(ParseError::UnknownVariable { ref name, .. }) if name == "missing"));
}

// =============================================================================
// Multi-document Tests
// =============================================================================

#[test]
fn test_parse_all_documents() {
    let yaml = r#"
procedure:
  name: first
  body:
    - checkpoint: One
procedure:
  name: second
  static: true
  body:
    - checkpoint: One
"#;

    let procedures = YamlProcedureParser::parse_all(yaml).unwrap();
    assert_eq!(procedures.len(), 2);
    assert_eq!(procedures[0].name, "first");
    assert!(procedures[1].is_static());
}

#[test]
fn test_procedure_parser_trait() {
    let parser: Box<dyn ProcedureParser> = Box::new(YamlProcedureParser);
    let procedures = parser
        .parse_procedures("procedure:\n  name: only\n")
        .unwrap();

    assert_eq!(procedures.len(), 1);
    assert_eq!(procedures[0].operations().map(|ops| ops.len()), Some(0));
}
