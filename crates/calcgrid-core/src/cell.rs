use std::cell::RefCell;

use calcgrid_common::{CellValue, Position, ESCAPE_SIGN, FORMULA_SIGN};
use calcgrid_formula::{Formula, ParseError};

use crate::sheet::Sheet;

/// A single grid entry: empty, literal text, or a formula
///
/// A cell's content is fixed at construction; replacing content means
/// replacing the cell. The memoized value of a formula is the one mutable
/// part, held behind a `RefCell` so reads stay `&self`.
#[derive(Debug, Clone)]
pub enum Cell {
    Empty,
    Text(String),
    Formula {
        formula: Formula,
        cache: RefCell<Option<CellValue>>,
    },
}

impl Cell {
    /// Build a cell from raw user text
    ///
    /// Empty text gives an empty cell; text starting with `=` (and at least
    /// one more character) is parsed as a formula; anything else is literal
    /// text. `=` on its own is text, matching how a lone sign is typed.
    pub fn from_input(text: &str) -> Result<Self, ParseError> {
        if text.is_empty() {
            return Ok(Cell::Empty);
        }
        if let Some(expression) = text.strip_prefix(FORMULA_SIGN) {
            if !expression.is_empty() {
                let formula = Formula::parse(expression)?;
                return Ok(Cell::Formula {
                    formula,
                    cache: RefCell::new(None),
                });
            }
        }
        Ok(Cell::Text(text.to_string()))
    }

    /// The cell's value; formula results are memoized until invalidated
    pub fn value(&self, sheet: &Sheet) -> CellValue {
        match self {
            Cell::Empty => CellValue::default(),
            Cell::Text(text) => {
                let stripped = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
                CellValue::Text(stripped.to_string())
            }
            Cell::Formula { formula, cache } => {
                if let Some(value) = cache.borrow().as_ref() {
                    return value.clone();
                }
                let value = match formula.evaluate(|pos| sheet.lookup_number(pos)) {
                    Ok(number) => CellValue::Number(number),
                    Err(error) => CellValue::Error(error),
                };
                *cache.borrow_mut() = Some(value.clone());
                value
            }
        }
    }

    /// The cell's text as the user would re-enter it
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Formula { formula, .. } => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    /// Positions this cell's formula references (empty for other variants)
    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            Cell::Formula { formula, .. } => formula.referenced_cells(),
            _ => &[],
        }
    }

    /// Drop the memoized formula value; a no-op for empty and text cells
    pub fn invalidate_cache(&self) {
        if let Cell::Formula { cache, .. } = self {
            *cache.borrow_mut() = None;
        }
    }

    /// Whether a memoized formula value is currently held
    pub fn has_cached_value(&self) -> bool {
        match self {
            Cell::Formula { cache, .. } => cache.borrow().is_some(),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}
