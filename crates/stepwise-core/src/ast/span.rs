//! Source locations

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in the procedure's original source.
///
/// Line and column are 1-based; a zero line means the front end did not
/// provide a location.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Span {
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl Span {
    /// Create a new span
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Check if the front end supplied no location
    pub fn is_unknown(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            f.write_str("?")
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(12, 5).to_string(), "12:5");
        assert_eq!(Span::default().to_string(), "?");
    }

    #[test]
    fn test_span_ordering() {
        assert!(Span::new(1, 9) < Span::new(2, 1));
        assert!(Span::new(3, 1) < Span::new(3, 2));
    }
}
