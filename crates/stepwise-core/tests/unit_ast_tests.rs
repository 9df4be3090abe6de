//! Unit tests for procedure IR types
//!
//! Tests the procedure, operation and variable structures handed to the compiler

use stepwise_core::ast::*;
use stepwise_core::types::Literal;

// =============================================================================
// Procedure Tests
// =============================================================================

#[test]
fn test_procedure_instance_by_default() {
    let procedure = Procedure::builder("operation")
        .containing_type("Example")
        .build()
        .unwrap();

    assert_eq!(procedure.receiver, Receiver::Instance);
    assert!(!procedure.is_static());
    assert_eq!(procedure.return_type, ReturnType::Void);
    assert_eq!(procedure.operations(), Some(&[][..]));
}

#[test]
fn test_procedure_expression_body() {
    let procedure = Procedure::builder("ping")
        .expression_body(Expression::call(Expression::path("ping"), vec![]))
        .build()
        .unwrap();

    assert!(procedure.operations().is_none());
    assert!(matches!(procedure.body, ProcedureBody::Expression(_)));
}

#[test]
fn test_procedure_variables_are_interned() {
    let mut builder = Procedure::builder("operation");
    let context = builder.parameter("context", "Context");
    let id = builder.local("id", "i32");
    let procedure = builder
        .body(vec![
            Operation::checkpoint("One"),
            Operation::let_(
                id,
                Expression::method_call(Expression::variable(context), "hash_code", vec![]),
            ),
        ])
        .build()
        .unwrap();

    assert_eq!(procedure.variable(context).name(), "context");
    assert!(procedure.variable(context).is_parameter());
    assert!(!procedure.variable(id).is_parameter());
    assert_eq!(procedure.variables.len(), 2);
}

#[test]
fn test_procedure_parameter_defaults() {
    let mut builder = Procedure::builder("operation");
    builder.optional_parameter("b", "String", "Hello");
    builder.optional_parameter("c", "f64", 451i64);
    let procedure = builder.build().unwrap();

    let defaults: Vec<_> = procedure
        .parameters
        .iter()
        .map(|p| p.default.clone())
        .collect();
    assert_eq!(
        defaults,
        vec![
            Some(Literal::String("Hello".to_string())),
            Some(Literal::Int(451))
        ]
    );
}

// =============================================================================
// Operation Tests
// =============================================================================

#[test]
fn test_operation_compound_assign() {
    let mut arena = VariableArena::new();
    let total = arena.declare_local("total", "i64");

    let op = Operation::compound_assign(
        Expression::variable(total),
        BinaryOperator::Add,
        Expression::literal(1i64),
    );

    match op.kind {
        OperationKind::Assign { target, op, value } => {
            assert_eq!(target, Expression::Variable(total));
            assert_eq!(op, Some(BinaryOperator::Add));
            assert_eq!(value, Expression::literal(1i64));
        }
        _ => panic!("Expected Assign operation"),
    }
}

#[test]
fn test_operation_span_is_optional_in_serde() {
    let json = serde_json::to_string(&Operation::checkpoint("One")).unwrap();
    assert!(!json.contains("span"));

    let located = serde_json::to_string(&Operation::checkpoint("One").at(4, 9)).unwrap();
    assert!(located.contains("\"line\":4"));
}

#[test]
fn test_procedure_serde_roundtrip() {
    let mut builder = Procedure::builder("operation")
        .containing_type("Example")
        .returns("f64");
    let a = builder.parameter("a", "String");
    let procedure = builder
        .body(vec![
            Operation::checkpoint("Parse"),
            Operation::ret(Some(Expression::try_(Expression::method_call(
                Expression::variable(a),
                "parse",
                vec![],
            )))),
        ])
        .build()
        .unwrap();

    let json = serde_json::to_string(&procedure).unwrap();
    let restored: Procedure = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, procedure);
}
