//! Expression parser
//!
//! Expressions are YAML nodes:
//!
//! - a scalar number, bool or null is a literal
//! - a string is a variable name (`self` names the enclosing instance)
//! - a mapping is keyed by its expression kind:
//!
//! ```yaml
//! literal: "Hello"                       # string literal
//! var: id                                # explicit variable reference
//! path: "tokio::time::sleep"             # free path
//! member: counter                        # implicit instance member
//! member: id
//! of: order                              # member of an expression
//! call: "println!"                       # callee path (or any expression)
//! args: [{ literal: "{}" }, id]
//! method: hash_code                      # receiver.method(args)
//! on: context
//! binary: "+"                            # or add, sub, eq, ...
//! left: a
//! right: 1
//! unary: not
//! operand: done
//! await: { call: fetch }
//! try: { method: parse, on: a }
//! ```

use crate::error::{ParseError, Result};
use crate::scope::Scopes;
use crate::yaml_parser::YamlParser;
use serde_yaml::Value as YamlValue;
use stepwise_core::{BinaryOperator, Expression, Span, UnaryOperator};

/// Expression parser
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parse an expression node, resolving variable names against `scopes`
    pub(crate) fn parse(value: &YamlValue, scopes: &Scopes, span: Span) -> Result<Expression> {
        match value {
            YamlValue::Null | YamlValue::Bool(_) | YamlValue::Number(_) => {
                Ok(Expression::Literal(YamlParser::to_literal(value, "literal")?))
            }
            YamlValue::String(name) => Self::parse_name(name, scopes, span),
            YamlValue::Mapping(_) => Self::parse_mapping(value, scopes, span),
            YamlValue::Sequence(_) => Err(ParseError::InvalidExpression(
                "a list is not an expression".to_string(),
            )),
            YamlValue::Tagged(tagged) => Err(ParseError::InvalidExpression(format!(
                "unsupported tag {}",
                tagged.tag
            ))),
        }
    }

    fn parse_name(name: &str, scopes: &Scopes, span: Span) -> Result<Expression> {
        if name == "self" {
            return Ok(Expression::this());
        }
        scopes
            .resolve(name)
            .map(Expression::Variable)
            .ok_or_else(|| ParseError::UnknownVariable {
                name: name.to_string(),
                span,
            })
    }

    fn parse_mapping(obj: &YamlValue, scopes: &Scopes, span: Span) -> Result<Expression> {
        if let Some(value) = obj.get("literal") {
            return Ok(Expression::Literal(YamlParser::to_literal(value, "literal")?));
        }

        if let Some(name) = obj.get("var") {
            let name = name.as_str().ok_or_else(|| ParseError::InvalidValue {
                field: "var".to_string(),
                message: "expected a variable name".to_string(),
            })?;
            return Self::parse_name(name, scopes, span);
        }

        if obj.get("path").is_some() {
            return Ok(Expression::path(YamlParser::get_string(obj, "path")?));
        }

        if obj.get("member").is_some() {
            let name = YamlParser::get_string(obj, "member")?;
            let receiver = match obj.get("of") {
                Some(receiver) => Self::parse(receiver, scopes, span)?,
                None => Expression::implicit_this(),
            };
            return Ok(Expression::member(receiver, name));
        }

        if let Some(callee) = obj.get("call") {
            let callee = match callee {
                YamlValue::String(path) => Expression::path(path.clone()),
                other => Self::parse(other, scopes, span)?,
            };
            let args = Self::parse_args(obj, scopes, span)?;
            return Ok(Expression::call(callee, args));
        }

        if obj.get("method").is_some() {
            let name = YamlParser::get_string(obj, "method")?;
            let receiver = match obj.get("on") {
                Some(receiver) => Self::parse(receiver, scopes, span)?,
                None => Expression::implicit_this(),
            };
            let args = Self::parse_args(obj, scopes, span)?;
            return Ok(Expression::method_call(receiver, name, args));
        }

        if obj.get("binary").is_some() {
            let op = Self::parse_binary_operator(&YamlParser::get_string(obj, "binary")?)?;
            let left = Self::parse_operand(obj, "left", scopes, span)?;
            let right = Self::parse_operand(obj, "right", scopes, span)?;
            return Ok(Expression::binary(left, op, right));
        }

        if obj.get("unary").is_some() {
            let op = Self::parse_unary_operator(&YamlParser::get_string(obj, "unary")?)?;
            let operand = Self::parse_operand(obj, "operand", scopes, span)?;
            return Ok(Expression::unary(op, operand));
        }

        if let Some(inner) = obj.get("await") {
            return Ok(Expression::await_(Self::parse(inner, scopes, span)?));
        }

        if let Some(inner) = obj.get("try") {
            return Ok(Expression::try_(Self::parse(inner, scopes, span)?));
        }

        Err(ParseError::InvalidExpression(format!(
            "unknown expression kind with keys [{}]",
            YamlParser::get_keys(obj).join(", ")
        )))
    }

    fn parse_operand(obj: &YamlValue, field: &str, scopes: &Scopes, span: Span) -> Result<Expression> {
        let value = obj.get(field).ok_or_else(|| ParseError::MissingField {
            field: field.to_string(),
        })?;
        Self::parse(value, scopes, span)
    }

    fn parse_args(obj: &YamlValue, scopes: &Scopes, span: Span) -> Result<Vec<Expression>> {
        match YamlParser::get_optional_array(obj, "args") {
            Some(args) => args
                .iter()
                .map(|arg| Self::parse(arg, scopes, span))
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    /// Parse a binary operator given by symbol (`+`) or name (`add`)
    pub fn parse_binary_operator(op: &str) -> Result<BinaryOperator> {
        match op {
            "==" | "eq" => Ok(BinaryOperator::Eq),
            "!=" | "ne" => Ok(BinaryOperator::Ne),
            ">" | "gt" => Ok(BinaryOperator::Gt),
            ">=" | "ge" => Ok(BinaryOperator::Ge),
            "<" | "lt" => Ok(BinaryOperator::Lt),
            "<=" | "le" => Ok(BinaryOperator::Le),
            "+" | "add" => Ok(BinaryOperator::Add),
            "-" | "sub" => Ok(BinaryOperator::Sub),
            "*" | "mul" => Ok(BinaryOperator::Mul),
            "/" | "div" => Ok(BinaryOperator::Div),
            "%" | "rem" => Ok(BinaryOperator::Rem),
            "&&" | "and" => Ok(BinaryOperator::And),
            "||" | "or" => Ok(BinaryOperator::Or),
            _ => Err(ParseError::InvalidOperator(op.to_string())),
        }
    }

    /// Parse a unary operator given by symbol (`!`) or name (`not`)
    pub fn parse_unary_operator(op: &str) -> Result<UnaryOperator> {
        match op {
            "!" | "not" => Ok(UnaryOperator::Not),
            "-" | "neg" | "negate" => Ok(UnaryOperator::Negate),
            _ => Err(ParseError::InvalidOperator(op.to_string())),
        }
    }
}
