//! Cell-level focus engine for table-shaped blocks.
//!
//! # Responsibility
//! - Move a virtual cursor across a rectangular grid of cells.
//! - Auto-grow on right-edge exits and auto-prune empty rows/columns on
//!   boundary deletes, so the common case needs no resize controls.
//!
//! # Invariants
//! - The grid stays rectangular through every operation here.
//! - The cursor stays inside the grid; exits never mutate cursor or grid.
//!
//! # See also
//! - docs/architecture/navigation.md

use crate::editor::nav::{Direction, NavExit, NavFlow, Navigate};
use crate::model::block::Grid;
use crate::model::keys::IndexError;

/// Cursor over the cells of one table-shaped block, scoped per table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCursor {
    row: usize,
    column: usize,
    entered: Option<Direction>,
}

impl TableCursor {
    /// Focuses the top-left cell, no entered side.
    pub fn new() -> Self {
        Self {
            row: 0,
            column: 0,
            entered: None,
        }
    }

    /// Places the cursor according to the edge the table was entered from:
    /// bottom lands on the last row, right on the last column.
    pub fn entered_from(side: Option<Direction>, cells: &Grid) -> Self {
        let mut cursor = Self::new();
        cursor.entered = side;
        match side {
            Some(Direction::Bottom) => cursor.row = cells.len().saturating_sub(1),
            Some(Direction::Right) => cursor.column = width(cells).saturating_sub(1),
            _ => {}
        }
        cursor
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Edge the focused cell was entered from, if any.
    pub fn entered_side(&self) -> Option<Direction> {
        self.entered
    }

    /// Moves focus to an explicitly chosen cell (pointer click).
    pub fn focus_cell(&mut self, row: usize, column: usize) {
        self.row = row;
        self.column = column;
        self.entered = None;
    }
}

impl Default for TableCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigate for TableCursor {
    type Content = Grid;

    fn left_out(&mut self, _cells: &mut Self::Content) -> NavFlow {
        // Column 0 never exits left; boundary no-op by policy.
        if self.column == 0 {
            return NavFlow::Stay;
        }
        self.column -= 1;
        self.entered = Some(Direction::Right);
        NavFlow::Stay
    }

    fn right_out(&mut self, cells: &mut Self::Content) -> NavFlow {
        // The one transition that mutates grid shape as a navigation side
        // effect: walking off the last column grows the grid.
        if self.column + 1 >= width(cells) {
            add_column(cells);
        }
        self.column += 1;
        self.entered = Some(Direction::Left);
        NavFlow::Stay
    }

    fn up_out(&mut self, _cells: &mut Self::Content) -> NavFlow {
        if self.row == 0 {
            return NavFlow::Exit(NavExit::Up);
        }
        self.row -= 1;
        self.entered = Some(Direction::Bottom);
        NavFlow::Stay
    }

    fn down_out(&mut self, cells: &mut Self::Content) -> NavFlow {
        if self.row + 1 >= cells.len() {
            return NavFlow::Exit(NavExit::Down);
        }
        self.row += 1;
        self.entered = Some(Direction::Top);
        NavFlow::Stay
    }

    fn delete_out(&mut self, cells: &mut Self::Content) -> Result<NavFlow, IndexError> {
        let len = cells.len();
        let row_cells = cells.get(self.row).ok_or(IndexError {
            index: self.row,
            len,
        })?;

        if self.column == 0 {
            if !row_cells.iter().all(String::is_empty) {
                // Row still holds content; nothing to prune and no column to
                // the left, so stay put.
                return Ok(NavFlow::Stay);
            }
            if len == 1 {
                // Last remaining row: the block owner decides; a caller that
                // ignores the exit leaves the table untouched.
                return Ok(NavFlow::Exit(NavExit::Delete));
            }
            let columns = row_cells.len();
            cells.remove(self.row)?;
            self.row = self.row.saturating_sub(1);
            self.column = columns - 1;
            self.entered = Some(Direction::Right);
            return Ok(NavFlow::Stay);
        }

        let column = self.column;
        if cells
            .values()
            .all(|row| row.get(column).is_some_and(String::is_empty))
        {
            for row in cells.values_mut() {
                row.remove(column);
            }
        }
        self.column -= 1;
        self.entered = Some(Direction::Right);
        Ok(NavFlow::Stay)
    }

    fn insert_after(&mut self, cells: &mut Self::Content) -> Result<NavFlow, IndexError> {
        let columns = width(cells);
        cells.insert(self.row + 1, vec![String::new(); columns])?;
        self.row += 1;
        self.entered = Some(Direction::Top);
        Ok(NavFlow::Stay)
    }
}

/// Appends an empty column to every row (header control, also the right-out
/// auto-grow).
pub fn add_column(cells: &mut Grid) {
    for row in cells.values_mut() {
        row.push(String::new());
    }
}

/// Truncates the last column from every row (header control).
///
/// Refused when only one column remains; returns whether a column was
/// removed.
pub fn remove_column(cells: &mut Grid) -> bool {
    if width(cells) <= 1 {
        return false;
    }
    for row in cells.values_mut() {
        row.pop();
    }
    true
}

fn width(cells: &Grid) -> usize {
    cells.get(0).map(Vec::len).unwrap_or(0)
}
