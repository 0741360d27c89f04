pub mod error;
pub mod position;
pub mod value;

pub use error::{FormulaError, SheetError};
pub use position::{col_from_label, col_to_label, Position, Size};
pub use value::CellValue;

/// Marks a cell's text as a formula when it appears first
pub const FORMULA_SIGN: char = '=';
/// Strips the following text of any special meaning in a cell's value
pub const ESCAPE_SIGN: char = '\'';
