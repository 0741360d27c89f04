//! Formula expression model for the calcgrid engine.
//!
//! A [`Formula`] wraps a parsed arithmetic expression over numeric literals
//! and cell references. It evaluates against a lookup callback supplied by
//! the owning sheet, re-prints itself in canonical form, and reports the
//! cells it references.

use std::collections::HashSet;

pub mod ast;
pub mod parser;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use parser::{parse_expression, ParseError};

use calcgrid_common::{FormulaError, Position};

/// A parsed, evaluatable formula expression
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    ast: Expr,
    references: Vec<Position>,
}

impl Formula {
    /// Parse an expression (without the leading `=`)
    pub fn parse(expression: &str) -> Result<Self, ParseError> {
        let ast = parser::parse_expression(expression)?;

        let mut references = Vec::new();
        ast.collect_references(&mut references);
        // Deduplicate preserving first-occurrence order. References outside
        // the sheet bounds evaluate to #REF! and are unreachable through the
        // grid, so they are not reported.
        let mut seen = HashSet::new();
        references.retain(|pos| pos.is_valid() && seen.insert(*pos));

        Ok(Formula { ast, references })
    }

    /// Evaluate against a lookup callback; a non-finite result becomes Div0
    pub fn evaluate<F>(&self, lookup: F) -> Result<f64, FormulaError>
    where
        F: Fn(Position) -> Result<f64, FormulaError>,
    {
        let result = self.ast.evaluate(&lookup)?;
        if result.is_finite() {
            Ok(result)
        } else {
            Err(FormulaError::Div0)
        }
    }

    /// The canonical printed expression (no leading `=`)
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }

    /// Referenced positions, deduplicated, in first-occurrence order
    pub fn referenced_cells(&self) -> &[Position] {
        &self.references
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_table<'a>(values: &'a [(&'a str, f64)]) -> impl Fn(Position) -> Result<f64, FormulaError> + 'a {
        move |pos| {
            for (a1, value) in values {
                if Position::from_a1(a1) == Some(pos) {
                    return Ok(*value);
                }
            }
            Ok(0.0)
        }
    }

    #[test]
    fn test_parse_and_evaluate() {
        let formula = Formula::parse("A1+B1*2").unwrap();
        let value = formula
            .evaluate(lookup_table(&[("A1", 1.0), ("B1", 3.0)]))
            .unwrap();
        assert_eq!(value, 7.0);
    }

    #[test]
    fn test_canonical_expression() {
        assert_eq!(Formula::parse("((1))").unwrap().expression(), "1");
        assert_eq!(Formula::parse("(1+2)*3").unwrap().expression(), "(1+2)*3");
        assert_eq!(Formula::parse("1+(2*3)").unwrap().expression(), "1+2*3");
        assert_eq!(Formula::parse("( a1 )").unwrap().expression(), "A1");
        assert_eq!(
            Formula::parse("1/(2-3)").unwrap().expression(),
            "1/(2-3)"
        );
    }

    #[test]
    fn test_references_dedup_in_order() {
        let formula = Formula::parse("B2+A1+B2+A1+C3").unwrap();
        let refs: Vec<String> = formula
            .referenced_cells()
            .iter()
            .map(|p| p.to_a1())
            .collect();
        assert_eq!(refs, ["B2", "A1", "C3"]);
    }

    #[test]
    fn test_division_by_zero() {
        let formula = Formula::parse("1/0").unwrap();
        assert_eq!(
            formula.evaluate(|_| Ok(0.0)),
            Err(FormulaError::Div0)
        );
    }

    #[test]
    fn test_out_of_bounds_reference() {
        // ZZZZ is far beyond the column maximum; the parse succeeds but
        // evaluation trips #REF! and the position is not reported
        let formula = Formula::parse("ZZZZ1+1").unwrap();
        assert!(formula.referenced_cells().is_empty());
        assert_eq!(formula.evaluate(|_| Ok(0.0)), Err(FormulaError::Ref));
    }

    #[test]
    fn test_lookup_error_propagates() {
        let formula = Formula::parse("A1+1").unwrap();
        assert_eq!(
            formula.evaluate(|_| Err(FormulaError::Value)),
            Err(FormulaError::Value)
        );
    }
}
