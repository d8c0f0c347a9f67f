//! Cursor and viewport control.
//!
//! Keeps the cursor on valid raw positions and the scroll offsets such that
//! the cursor's rendered position stays inside the visible window, with the
//! line-number gutter subtracted from the horizontal space.

use crate::document::Document;

/// Raw cursor position: row index and raw column (characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Row index; may rest one row past the last line.
    pub row: usize,
    /// Raw column within the row.
    pub col: usize,
}

/// A single cursor movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    /// One column left; at column 0, to the end of the previous row.
    Left,
    /// One column right; at the row end, to the start of the next row.
    Right,
    /// One row up.
    Up,
    /// One row down (at most one past the last row).
    Down,
}

/// Scroll state and window geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row.
    pub row_off: usize,
    /// First visible rendered column of the text area.
    pub col_off: usize,
    /// Visible text rows.
    pub height: usize,
    /// Visible columns, gutter included.
    pub width: usize,
    /// Cursor's rendered column, derived on every [`Viewport::scroll`].
    pub rx: usize,
}

impl Viewport {
    /// Creates a viewport for a window of `height` rows by `width` columns.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            row_off: 0,
            col_off: 0,
            height,
            width,
            rx: 0,
        }
    }

    /// Updates the window geometry (terminal resize).
    pub fn resize(&mut self, height: usize, width: usize) {
        self.height = height;
        self.width = width;
    }

    /// Columns available to text once the gutter and its separator column
    /// are reserved.
    pub fn text_width(&self, doc: &Document) -> usize {
        self.width.saturating_sub(doc.gutter_width() + 1)
    }

    /// Forces the next [`Viewport::scroll`] to place the cursor's row at the
    /// top of the window, by pushing the vertical offset past every row.
    pub fn force_row_top(&mut self, doc: &Document) {
        self.row_off = doc.num_rows();
    }

    /// Re-derives the cursor's rendered column and pulls both offsets so the
    /// cursor is visible.
    pub fn scroll(&mut self, cursor: Cursor, doc: &Document) {
        self.rx = match doc.row(cursor.row) {
            Some(row) => row.rendered_x(cursor.col, doc.tab_width()),
            None => 0,
        };

        if cursor.row < self.row_off {
            self.row_off = cursor.row;
        }
        if self.height > 0 && cursor.row >= self.row_off + self.height {
            self.row_off = cursor.row - self.height + 1;
        }

        let text_width = self.text_width(doc);
        if self.rx < self.col_off {
            self.col_off = self.rx;
        }
        if text_width > 0 && self.rx >= self.col_off + text_width {
            self.col_off = self.rx + 1 - text_width;
        }
    }
}

/// Applies one movement step, then clamps the column to the destination
/// row's raw length.
///
/// There is no memory of a desired column: moving onto a shorter row
/// truncates the column irreversibly.
pub fn step(cursor: &mut Cursor, doc: &Document, mv: CursorMove) {
    let row_len = |idx: usize| doc.row(idx).map(|row| row.raw_len()).unwrap_or(0);

    match mv {
        CursorMove::Left => {
            if cursor.col > 0 {
                cursor.col -= 1;
            } else if cursor.row > 0 {
                cursor.row -= 1;
                cursor.col = row_len(cursor.row);
            }
        }
        CursorMove::Right => {
            if cursor.row < doc.num_rows() {
                if cursor.col < row_len(cursor.row) {
                    cursor.col += 1;
                } else {
                    cursor.row += 1;
                    cursor.col = 0;
                }
            }
        }
        CursorMove::Up => {
            cursor.row = cursor.row.saturating_sub(1);
        }
        CursorMove::Down => {
            if cursor.row < doc.num_rows() {
                cursor.row += 1;
            }
        }
    }

    let limit = row_len(cursor.row);
    if cursor.col > limit {
        cursor.col = limit;
    }
}
