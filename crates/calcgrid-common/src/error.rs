use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::position::Position;

/// Formula evaluation errors, carried inside cell values (Excel-style)
///
/// These are never surfaced as `Err` from a value read; a formula cell whose
/// evaluation trips one of these simply holds the error as its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaError {
    /// #REF! - Reference to a position outside the sheet bounds
    Ref,
    /// #VALUE! - A referenced text cell could not be read as a number
    Value,
    /// #DIV/0! - Division by zero or a non-finite result
    Div0,
    /// #ARITHM! - Overflow or domain error in an arithmetic operator
    Arithmetic,
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaError::Ref => write!(f, "#REF!"),
            FormulaError::Value => write!(f, "#VALUE!"),
            FormulaError::Div0 => write!(f, "#DIV/0!"),
            FormulaError::Arithmetic => write!(f, "#ARITHM!"),
        }
    }
}

impl std::error::Error for FormulaError {}

/// Errors returned by the public `Sheet` API
///
/// A mutation that fails with one of these leaves the sheet untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("invalid position {0}")]
    InvalidPosition(Position),
    #[error("formula syntax error: {0}")]
    FormulaSyntax(String),
    #[error("circular dependency through {0}")]
    CircularDependency(Position),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_tokens() {
        assert_eq!(FormulaError::Ref.to_string(), "#REF!");
        assert_eq!(FormulaError::Value.to_string(), "#VALUE!");
        assert_eq!(FormulaError::Div0.to_string(), "#DIV/0!");
        assert_eq!(FormulaError::Arithmetic.to_string(), "#ARITHM!");
    }

    #[test]
    fn test_sheet_error_display() {
        let err = SheetError::InvalidPosition(Position::new(-1, -1));
        assert_eq!(err.to_string(), "invalid position (-1, -1)");

        let err = SheetError::CircularDependency(Position::new(0, 0));
        assert_eq!(err.to_string(), "circular dependency through A1");
    }
}
