//! Procedure parser
//!
//! Parses YAML procedure documents into procedure IR. Names are resolved
//! lexically: parameters live in the outermost scope, `let` binds in the
//! current block, and `if`/`while`/`block` bodies open nested scopes.

use crate::error::{ParseError, Result};
use crate::expression_parser::ExpressionParser;
use crate::scope::Scopes;
use crate::source_map::{NodePath, SourcePositions};
use crate::yaml_parser::YamlParser;
use serde_yaml::Value as YamlValue;
use std::collections::HashSet;
use stepwise_core::ast::{ProcedureBuilder, Receiver};
use stepwise_core::{Expression, Operation, Procedure, Span};

/// A front end producing procedure IR from text
pub trait ProcedureParser {
    /// Parse every procedure found in `source`
    fn parse_procedures(&self, source: &str) -> Result<Vec<Procedure>>;
}

/// Parser for YAML procedure documents
///
/// ```yaml
/// procedure:
///   name: operation
///   containing_types: [Example]
///   static: false
///   returns: f64
///   parameters:
///     - { name: context, type: Context }
///     - { name: c, type: f64, default: 451 }
///   body:
///     - checkpoint: One
///     - let: id
///       type: i32
///       value: { method: hash_code, on: context }
///     - checkpoint: Two
///     - expr: { call: "println!", args: [{ literal: "{}" }, id] }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlProcedureParser;

const PROCEDURE_FIELDS: &[&str] = &[
    "name",
    "containing_types",
    "static",
    "returns",
    "parameters",
    "body",
    "expression",
    "line",
    "column",
];

const PARAMETER_FIELDS: &[&str] = &["name", "type", "default"];

impl YamlProcedureParser {
    /// Parse a single procedure document
    pub fn parse(yaml_str: &str) -> Result<Procedure> {
        let yaml = YamlParser::parse(yaml_str)?;
        Self::parse_located(&yaml, &YamlParser::positions(yaml_str))
    }

    /// Parse every procedure document of a multi-document string
    pub fn parse_all(yaml_str: &str) -> Result<Vec<Procedure>> {
        YamlParser::parse_marked_documents(yaml_str)?
            .iter()
            .map(|(yaml, positions)| Self::parse_located(yaml, positions))
            .collect()
    }

    /// Parse a procedure from a YAML value holding a `procedure` key.
    ///
    /// The value has no source text, so only `line`/`column` keys locate
    /// its statements.
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<Procedure> {
        Self::parse_located(yaml, &SourcePositions::default())
    }

    /// Parse a procedure, locating nodes through `positions` unless they
    /// carry explicit `line`/`column` keys
    pub fn parse_located(yaml: &YamlValue, positions: &SourcePositions) -> Result<Procedure> {
        let root = NodePath::root().key("procedure");
        let obj = yaml.get("procedure").ok_or_else(|| ParseError::MissingField {
            field: "procedure".to_string(),
        })?;

        let name = YamlParser::get_string(obj, "name")?;
        YamlParser::warn_unknown_fields(obj, PROCEDURE_FIELDS, &format!("procedure '{}'", name));

        let mut builder = Procedure::builder(name.clone());
        for containing_type in Self::parse_containing_types(obj)? {
            builder = builder.containing_type(containing_type);
        }
        if YamlParser::get_optional_bool(obj, "static").unwrap_or(false) {
            builder = builder.receiver(Receiver::Static);
        }
        if let Some(returns) = YamlParser::get_optional_string(obj, "returns") {
            builder = builder.returns(returns);
        }
        let span = locate(obj, positions, &root);
        if !span.is_unknown() {
            builder = builder.at(span.line, span.column);
        }

        let mut resolver = BodyResolver::new(builder, positions);
        resolver.parse_parameters(obj)?;

        let builder = if let Some(expression) = obj.get("expression") {
            let expression = ExpressionParser::parse(expression, &resolver.scopes, span)?;
            resolver.builder.expression_body(expression)
        } else {
            let body: &[YamlValue] = match obj.get("body") {
                Some(_) => YamlParser::get_array(obj, "body")?.as_slice(),
                None => &[],
            };
            let operations = resolver.parse_top_level(body, &root.key("body"))?;
            resolver.builder.body(operations)
        };

        let procedure = builder.build()?;
        log::debug!(
            "Parsed procedure '{}' with {} parameter(s) and {} variable(s)",
            procedure.qualified_name(),
            procedure.parameters.len(),
            procedure.variables.len()
        );
        Ok(procedure)
    }

    /// `containing_types` as a list, or as a dotted string (`Outer.Inner`)
    fn parse_containing_types(obj: &YamlValue) -> Result<Vec<String>> {
        match obj.get("containing_types") {
            None => Ok(Vec::new()),
            Some(YamlValue::String(dotted)) => {
                Ok(dotted.split('.').map(|part| part.trim().to_string()).collect())
            }
            Some(YamlValue::Sequence(types)) => types
                .iter()
                .map(|ty| {
                    ty.as_str()
                        .map(|s| s.to_string())
                        .ok_or_else(|| ParseError::InvalidValue {
                            field: "containing_types".to_string(),
                            message: "expected type names".to_string(),
                        })
                })
                .collect(),
            Some(_) => Err(ParseError::InvalidValue {
                field: "containing_types".to_string(),
                message: "expected a list or a dotted name".to_string(),
            }),
        }
    }
}

impl ProcedureParser for YamlProcedureParser {
    fn parse_procedures(&self, source: &str) -> Result<Vec<Procedure>> {
        Self::parse_all(source)
    }
}

/// `self` always names the enclosing instance
fn check_variable_name(name: &str, field: &str) -> Result<()> {
    if name == "self" {
        return Err(ParseError::InvalidValue {
            field: field.to_string(),
            message: "`self` cannot name a variable".to_string(),
        });
    }
    Ok(())
}

/// Explicit `line`/`column` keys win over the document position
fn locate(obj: &YamlValue, positions: &SourcePositions, path: &NodePath) -> Span {
    let span = YamlParser::get_span(obj);
    if span.is_unknown() {
        positions.span(path)
    } else {
        span
    }
}

/// Resolves statement lists against the procedure's scopes
struct BodyResolver<'p> {
    builder: ProcedureBuilder,
    scopes: Scopes,
    positions: &'p SourcePositions,
}

impl<'p> BodyResolver<'p> {
    fn new(builder: ProcedureBuilder, positions: &'p SourcePositions) -> Self {
        Self {
            builder,
            scopes: Scopes::new(),
            positions,
        }
    }

    fn parse_parameters(&mut self, obj: &YamlValue) -> Result<()> {
        let Some(parameters) = YamlParser::get_optional_array(obj, "parameters") else {
            return Ok(());
        };

        let mut seen = HashSet::new();
        for parameter in parameters {
            let name = YamlParser::get_string(parameter, "name")?;
            let ty = YamlParser::get_string(parameter, "type")?;
            YamlParser::warn_unknown_fields(parameter, PARAMETER_FIELDS, &format!("parameter '{}'", name));

            if !seen.insert(name.clone()) {
                return Err(ParseError::DuplicateParameter(name));
            }
            check_variable_name(&name, "name")?;

            let var = match parameter.get("default") {
                Some(default) => {
                    let default = YamlParser::to_literal(default, "default")?;
                    self.builder.optional_parameter(name.clone(), ty, default)
                }
                None => self.builder.parameter(name.clone(), ty),
            };
            self.scopes.declare(&name, var);
        }

        Ok(())
    }

    /// Parse the procedure body; top-level checkpoint names must be unique
    fn parse_top_level(&mut self, statements: &[YamlValue], path: &NodePath) -> Result<Vec<Operation>> {
        let operations = self.parse_statements(statements, path)?;

        let mut seen = HashSet::new();
        for name in operations.iter().filter_map(Operation::checkpoint_name) {
            if !seen.insert(name) {
                return Err(ParseError::DuplicateCheckpoint(name.to_string()));
            }
        }

        Ok(operations)
    }

    fn parse_statements(&mut self, statements: &[YamlValue], path: &NodePath) -> Result<Vec<Operation>> {
        statements
            .iter()
            .enumerate()
            .map(|(index, statement)| self.parse_statement(statement, &path.index(index)))
            .collect()
    }

    /// Parse a nested statement list in its own scope
    fn parse_scoped(&mut self, statements: &[YamlValue], path: &NodePath) -> Result<Vec<Operation>> {
        self.scopes.push();
        let result = self.parse_statements(statements, path);
        self.scopes.pop();
        result
    }

    fn parse_nested(&mut self, obj: &YamlValue, field: &str, path: &NodePath) -> Result<Vec<Operation>> {
        match obj.get(field) {
            Some(YamlValue::Null) | None => Ok(Vec::new()),
            Some(_) => {
                let statements = YamlParser::get_array(obj, field)?;
                self.parse_scoped(statements, &path.key(field))
            }
        }
    }

    fn expression(&self, value: &YamlValue, span: Span) -> Result<Expression> {
        ExpressionParser::parse(value, &self.scopes, span)
    }

    fn required_expression(&self, obj: &YamlValue, field: &str, span: Span) -> Result<Expression> {
        let value = obj.get(field).ok_or_else(|| ParseError::MissingField {
            field: field.to_string(),
        })?;
        self.expression(value, span)
    }

    fn parse_statement(&mut self, obj: &YamlValue, path: &NodePath) -> Result<Operation> {
        let span = locate(obj, self.positions, path);
        let operation = self.parse_statement_kind(obj, span, path)?;
        Ok(Operation { span, ..operation })
    }

    fn parse_statement_kind(&mut self, obj: &YamlValue, span: Span, path: &NodePath) -> Result<Operation> {
        if obj.get("checkpoint").is_some() {
            return Ok(Operation::checkpoint(YamlParser::get_string(obj, "checkpoint")?));
        }

        if obj.get("let").is_some() {
            let name = YamlParser::get_string(obj, "let")?;
            check_variable_name(&name, "let")?;
            let ty = YamlParser::get_string(obj, "type")?;
            // The initializer is resolved before the new binding is visible
            let init = match obj.get("value") {
                Some(value) => Some(self.expression(value, span)?),
                None => None,
            };
            let var = self.builder.local(name.clone(), ty);
            self.scopes.declare(&name, var);
            return Ok(Operation::declare(var, init));
        }

        if let Some(target) = obj.get("assign") {
            let target = self.expression(target, span)?;
            let value = self.required_expression(obj, "value", span)?;
            return match YamlParser::get_optional_string(obj, "op") {
                Some(op) => {
                    let op = ExpressionParser::parse_binary_operator(op.trim_end_matches('='))?;
                    if !op.is_compound_assignable() {
                        return Err(ParseError::InvalidOperator(format!("{}=", op.symbol())));
                    }
                    Ok(Operation::compound_assign(target, op, value))
                }
                None => Ok(Operation::assign(target, value)),
            };
        }

        if let Some(expr) = obj.get("expr") {
            return Ok(Operation::expr(self.expression(expr, span)?));
        }

        if let Some(condition) = obj.get("if") {
            let condition = self.expression(condition, span)?;
            let then_branch = self.parse_nested(obj, "then", path)?;
            return Ok(match obj.get("else") {
                Some(_) => {
                    let else_branch = self.parse_nested(obj, "else", path)?;
                    Operation::if_else(condition, then_branch, else_branch)
                }
                None => Operation::if_then(condition, then_branch),
            });
        }

        if let Some(condition) = obj.get("while") {
            let condition = self.expression(condition, span)?;
            let body = self.parse_nested(obj, "do", path)?;
            return Ok(Operation::while_loop(condition, body));
        }

        if obj.get("block").is_some() {
            return Ok(Operation::block(self.parse_nested(obj, "block", path)?));
        }

        if let Some(value) = obj.get("return") {
            let value = match value {
                YamlValue::Null => None,
                other => Some(self.expression(other, span)?),
            };
            return Ok(Operation::ret(value));
        }

        if obj.get("goto").is_some() {
            return Ok(Operation::goto(YamlParser::get_string(obj, "goto")?));
        }

        if obj.get("fn").is_some() {
            return Ok(Operation::local_function(YamlParser::get_string(obj, "fn")?));
        }

        Err(ParseError::UnknownStatement {
            keys: YamlParser::get_keys(obj).join(", "),
            span,
        })
    }
}
