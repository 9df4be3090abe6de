//! Literal values for Stepwise procedures
//!
//! The `Literal` enum represents constants that appear in procedure IR,
//! most importantly the explicit default values of optional parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Null / absent value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

impl Literal {
    /// Render the literal as Rust source text
    pub fn to_source(&self) -> String {
        match self {
            Literal::Null => "None".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Int(i) => i.to_string(),
            Literal::Float(f) if f.is_nan() => "f64::NAN".to_string(),
            Literal::Float(f) if f.is_infinite() && *f > 0.0 => "f64::INFINITY".to_string(),
            Literal::Float(f) if f.is_infinite() => "f64::NEG_INFINITY".to_string(),
            Literal::Float(f) => format!("{:?}", f),
            Literal::String(s) => format!("{:?}", s),
        }
    }

    /// Render the literal as an initializer for a field of type `ty`.
    ///
    /// String literals are converted with `.into()` so they fit both owned and
    /// borrowed string types; integers assigned to float fields get a
    /// fractional part.
    pub fn to_initializer(&self, ty: &str) -> String {
        match self {
            Literal::String(_) => format!("{}.into()", self.to_source()),
            Literal::Int(i) if matches!(ty, "f32" | "f64") => format!("{}.0", i),
            _ => self.to_source(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_source_rendering() {
        assert_eq!(Literal::Null.to_source(), "None");
        assert_eq!(Literal::Bool(true).to_source(), "true");
        assert_eq!(Literal::Int(451).to_source(), "451");
        assert_eq!(Literal::Float(2.5).to_source(), "2.5");
        assert_eq!(Literal::Float(3.0).to_source(), "3.0");
        assert_eq!(Literal::String("xyz".to_string()).to_source(), "\"xyz\"");
    }

    #[test]
    fn test_literal_string_escaping() {
        let lit = Literal::from("say \"hi\"\n");
        assert_eq!(lit.to_source(), "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn test_literal_special_floats() {
        assert_eq!(Literal::Float(f64::NAN).to_source(), "f64::NAN");
        assert_eq!(Literal::Float(f64::INFINITY).to_source(), "f64::INFINITY");
        assert_eq!(Literal::Float(f64::NEG_INFINITY).to_source(), "f64::NEG_INFINITY");
    }

    #[test]
    fn test_literal_initializer() {
        assert_eq!(Literal::from("xyz").to_initializer("String"), "\"xyz\".into()");
        assert_eq!(Literal::Int(451).to_initializer("i32"), "451");
        assert_eq!(Literal::Int(451).to_initializer("f64"), "451.0");
    }

    #[test]
    fn test_literal_serde_json() {
        let values = vec![
            Literal::Null,
            Literal::Bool(false),
            Literal::Int(7),
            Literal::Float(0.5),
            Literal::from("abc"),
        ];

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,false,7,0.5,"abc"]"#);

        let deserialized: Vec<Literal> = serde_json::from_str(&json).unwrap();
        assert_eq!(values, deserialized);
    }
}
