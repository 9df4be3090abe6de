//! YAML Parser
//!
//! Utilities shared by the procedure and expression parsers.

use crate::error::{ParseError, Result};
use crate::source_map::SourcePositions;
use serde_yaml::Value as YamlValue;
use stepwise_core::{Literal, Span};

/// YAML parser utilities
pub struct YamlParser;

impl YamlParser {
    /// Parse YAML string into a YAML value
    pub fn parse(yaml_str: &str) -> Result<YamlValue> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// Parse YAML string containing multiple documents.
    ///
    /// Documents are separated by `---`; a `procedure:` key at column 0 also
    /// starts a new document, so several procedures may be listed back to
    /// back without separators.
    pub fn parse_multi_document(yaml_str: &str) -> Result<Vec<YamlValue>> {
        let (preprocessed, _) = Self::preprocess_multi_document(yaml_str);
        Self::deserialize_documents(&preprocessed)
    }

    /// Like `parse_multi_document`, pairing every document with the source
    /// positions of its nodes.
    ///
    /// Positions refer to lines of `yaml_str` itself. When they cannot be
    /// collected the documents come back with empty positions.
    pub fn parse_marked_documents(yaml_str: &str) -> Result<Vec<(YamlValue, SourcePositions)>> {
        let (preprocessed, lines) = Self::preprocess_multi_document(yaml_str);
        let documents = Self::deserialize_documents(&preprocessed)?;
        let mut positions = Self::positions_or_empty(SourcePositions::collect_mapped(&preprocessed, &lines))
            .into_iter();

        Ok(documents
            .into_iter()
            .map(|document| (document, positions.next().unwrap_or_default()))
            .collect())
    }

    /// Source positions of a single-document string
    pub fn positions(yaml_str: &str) -> SourcePositions {
        Self::positions_or_empty(SourcePositions::collect(yaml_str))
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    fn positions_or_empty(collected: Result<Vec<SourcePositions>>) -> Vec<SourcePositions> {
        collected.unwrap_or_else(|error| {
            log::warn!("{}; diagnostics will lack source positions", error);
            Vec::new()
        })
    }

    fn deserialize_documents(text: &str) -> Result<Vec<YamlValue>> {
        use serde::Deserialize;

        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = YamlValue::deserialize(document)?;
            if !value.is_null() {
                documents.push(value);
            }
        }

        Ok(documents)
    }

    /// Insert `---` before every `procedure:` key at line start that is not
    /// already preceded by a separator.
    ///
    /// Also returns, for every line of the result, its line number in
    /// `yaml_str`.
    fn preprocess_multi_document(yaml_str: &str) -> (String, Vec<u32>) {
        let mut result = String::with_capacity(yaml_str.len() + 32);
        let mut lines = Vec::new();
        let mut seen_content = false;
        let mut recent_separator = false;

        for (index, line) in yaml_str.lines().enumerate() {
            let original = index as u32 + 1;
            let trimmed = line.trim();
            let is_definition_start =
                !line.starts_with(' ') && !line.starts_with('\t') && trimmed.starts_with("procedure:");

            if is_definition_start && seen_content && !recent_separator {
                result.push_str("---\n");
                lines.push(original);
            }

            result.push_str(line);
            result.push('\n');
            lines.push(original);

            if trimmed == "---" {
                recent_separator = true;
            } else if !trimmed.is_empty() && !trimmed.starts_with('#') {
                recent_separator = false;
                seen_content = true;
            }
        }

        (result, lines)
    }

    /// Get a required string field from YAML object
    pub fn get_string(obj: &YamlValue, field: &str) -> Result<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ParseError::MissingField {
                field: field.to_string(),
            })
    }

    /// Get an optional string field from YAML object
    pub fn get_optional_string(obj: &YamlValue, field: &str) -> Option<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Get an optional boolean field from YAML object
    pub fn get_optional_bool(obj: &YamlValue, field: &str) -> Option<bool> {
        obj.get(field).and_then(|v| v.as_bool())
    }

    /// Get an optional non-negative integer field from YAML object
    pub fn get_optional_u32(obj: &YamlValue, field: &str) -> Option<u32> {
        obj.get(field)
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok())
    }

    /// Get an optional array field from YAML object
    pub fn get_optional_array<'a>(obj: &'a YamlValue, field: &str) -> Option<&'a Vec<YamlValue>> {
        obj.get(field).and_then(|v| v.as_sequence())
    }

    /// Get a required array field; a present non-sequence value is an error
    pub fn get_array<'a>(obj: &'a YamlValue, field: &str) -> Result<&'a Vec<YamlValue>> {
        match obj.get(field) {
            Some(value) => value.as_sequence().ok_or_else(|| ParseError::InvalidValue {
                field: field.to_string(),
                message: "expected a list".to_string(),
            }),
            None => Err(ParseError::MissingField {
                field: field.to_string(),
            }),
        }
    }

    /// Read the optional `line`/`column` keys of a node
    pub fn get_span(obj: &YamlValue) -> Span {
        match Self::get_optional_u32(obj, "line") {
            Some(line) => Span::new(line, Self::get_optional_u32(obj, "column").unwrap_or(0)),
            None => Span::default(),
        }
    }

    /// Convert a YAML scalar into a literal
    pub fn to_literal(value: &YamlValue, field: &str) -> Result<Literal> {
        match value {
            YamlValue::Null => Ok(Literal::Null),
            YamlValue::Bool(b) => Ok(Literal::Bool(*b)),
            YamlValue::Number(n) => match n.as_i64() {
                Some(i) => Ok(Literal::Int(i)),
                None => n.as_f64().map(Literal::Float).ok_or_else(|| ParseError::InvalidValue {
                    field: field.to_string(),
                    message: format!("number out of range: {}", n),
                }),
            },
            YamlValue::String(s) => Ok(Literal::String(s.clone())),
            _ => Err(ParseError::InvalidValue {
                field: field.to_string(),
                message: "expected a scalar literal".to_string(),
            }),
        }
    }

    /// Keys of a YAML mapping, in document order
    pub fn get_keys(obj: &YamlValue) -> Vec<String> {
        if let Some(mapping) = obj.as_mapping() {
            mapping
                .keys()
                .filter_map(|k| k.as_str())
                .map(|s| s.to_string())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Validate fields in a YAML object against a list of known fields.
    /// Returns warnings for unknown fields with suggestions.
    pub fn validate_fields(obj: &YamlValue, known_fields: &[&str], context: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        for field_name in Self::get_keys(obj) {
            if known_fields.contains(&field_name.as_str()) {
                continue;
            }

            let typo_correction = FIELD_CORRECTIONS
                .iter()
                .find(|(typo, _)| *typo == field_name)
                .map(|(_, correct)| *correct);

            let suggestion = if let Some(correct) = typo_correction {
                format!(" Did you mean '{}'?", correct)
            } else if let Some(similar) = Self::find_similar_field(&field_name, known_fields) {
                format!(" Did you mean '{}'?", similar)
            } else {
                String::new()
            };

            warnings.push(format!(
                "Unknown field '{}' in {}.{}",
                field_name, context, suggestion
            ));
        }

        warnings
    }

    /// Validate fields and log each unknown one
    pub fn warn_unknown_fields(obj: &YamlValue, known_fields: &[&str], context: &str) {
        for warning in Self::validate_fields(obj, known_fields, context) {
            log::warn!("{}", warning);
        }
    }

    /// Find similar field names using Levenshtein distance
    fn find_similar_field(field: &str, known_fields: &[&str]) -> Option<String> {
        known_fields
            .iter()
            .filter(|known| levenshtein_distance(field, known) <= 2)
            .min_by_key(|known| levenshtein_distance(field, known))
            .map(|s| s.to_string())
    }
}

/// Common field name typos and their corrections
const FIELD_CORRECTIONS: &[(&str, &str)] = &[
    ("params", "parameters"),
    ("args_list", "args"),
    ("return_type", "returns"),
    ("containing_type", "containing_types"),
    ("types", "containing_types"),
    ("is_static", "static"),
    ("default_value", "default"),
    ("then_branch", "then"),
    ("else_branch", "else"),
    ("statements", "body"),
];

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for (i, &c1) in s1_chars.iter().enumerate() {
        for (j, &c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            matrix[i + 1][j + 1] = std::cmp::min(
                std::cmp::min(matrix[i][j + 1] + 1, matrix[i + 1][j] + 1),
                matrix[i][j] + cost,
            );
        }
    }

    matrix[len1][len2]
}
