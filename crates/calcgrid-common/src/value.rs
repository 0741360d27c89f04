use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FormulaError;

/// The observable value of a cell
///
/// The empty string doubles as the value of an empty cell. Non-finite
/// numbers never appear here; evaluation maps them to `Div0` first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error(FormulaError),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl CellValue {
    /// Check if this is the empty value
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }

    /// Get the numeric payload, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the error payload, if any
    pub fn as_error(&self) -> Option<FormulaError> {
        match self {
            CellValue::Error(e) => Some(*e),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value() {
        assert!(CellValue::default().is_empty());
        assert!(!CellValue::Text("x".to_string()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Text("hello".to_string()).to_string(), "hello");
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Error(FormulaError::Div0).to_string(), "#DIV/0!");
    }

    #[test]
    fn test_serde_round_trip() {
        let value = CellValue::Number(3.5);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(serde_json::from_str::<CellValue>(&json).unwrap(), value);

        let value = CellValue::Error(FormulaError::Ref);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(serde_json::from_str::<CellValue>(&json).unwrap(), value);
    }
}
