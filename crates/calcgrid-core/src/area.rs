use std::collections::BTreeMap;

use calcgrid_common::{Position, Size};

/// Index over the rows and columns that hold printable cells
///
/// Two counted multisets keyed by index; the printable rectangle is read
/// off the largest key on each axis. Materialized empty cells are never
/// added here.
#[derive(Debug, Default)]
pub struct PrintableArea {
    row_counts: BTreeMap<i32, u32>,
    col_counts: BTreeMap<i32, u32>,
}

impl PrintableArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_position(&mut self, pos: Position) {
        *self.row_counts.entry(pos.row).or_insert(0) += 1;
        *self.col_counts.entry(pos.col).or_insert(0) += 1;
    }

    /// Remove one occurrence; the position must have been added before
    pub fn remove_position(&mut self, pos: Position) {
        debug_assert!(
            self.row_counts.contains_key(&pos.row) && self.col_counts.contains_key(&pos.col),
            "removing a position that was never added: {}",
            pos
        );
        if let Some(count) = self.row_counts.get_mut(&pos.row) {
            *count -= 1;
            if *count == 0 {
                self.row_counts.remove(&pos.row);
            }
        }
        if let Some(count) = self.col_counts.get_mut(&pos.col) {
            *count -= 1;
            if *count == 0 {
                self.col_counts.remove(&pos.col);
            }
        }
    }

    /// The smallest (0,0)-anchored rectangle containing every printable cell
    pub fn size(&self) -> Size {
        let rows = self
            .row_counts
            .last_key_value()
            .map_or(0, |(row, _)| row + 1);
        let cols = self
            .col_counts
            .last_key_value()
            .map_or(0, |(col, _)| col + 1);
        Size::new(rows, cols)
    }
}
