//! The document: an ordered sequence of rows and every operation that
//! mutates them.
//!
//! All edits go through this type so that the affected row's derived
//! buffers are recomputed before the call returns, cascading forward while
//! the open-block-comment carry changes.

use crate::layout::DEFAULT_TAB_WIDTH;
use crate::row::Row;
use scribe_lang::Profile;
use tracing::{debug, trace};

/// An in-memory document: rows, dirty flag, active language profile, and
/// the associated filename. Exclusively owns its rows.
#[derive(Debug)]
pub struct Document {
    rows: Vec<Row>,
    dirty: bool,
    filename: Option<String>,
    profile: Option<&'static Profile>,
    tab_width: usize,
}

impl Document {
    /// Creates an empty document.
    pub fn new(tab_width: usize) -> Self {
        Self {
            rows: Vec::new(),
            dirty: false,
            filename: None,
            profile: None,
            tab_width: tab_width.max(1),
        }
    }

    /// Imports a document from text: one row per line, trailing CR/LF
    /// stripped and never restored. The result is not dirty.
    pub fn from_text(text: &str, tab_width: usize) -> Self {
        let mut doc = Self::new(tab_width);
        doc.rows = text
            .lines()
            .enumerate()
            .map(|(idx, line)| Row::new(idx, line.trim_end_matches('\r')))
            .collect();
        doc.refresh_all();
        doc.dirty = false;
        doc
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the document has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `idx`, if in bounds.
    pub fn row(&self, idx: usize) -> Option<&Row> {
        self.rows.get(idx)
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn row_mut(&mut self, idx: usize) -> Option<&mut Row> {
        self.rows.get_mut(idx)
    }

    /// Whether the document has unsaved modifications.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// The associated filename, if any.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The active language profile, if any.
    pub fn profile(&self) -> Option<&'static Profile> {
        self.profile
    }

    /// The tab width used for rendering.
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Changes the tab width and re-derives every row.
    pub fn set_tab_width(&mut self, tab_width: usize) {
        self.tab_width = tab_width.max(1);
        self.refresh_all();
    }

    /// Associates a filename, selects the matching language profile, and
    /// recomputes every row from the top.
    pub fn set_filename(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.profile = scribe_lang::detect(&name);
        debug!(
            filename = %name,
            profile = self.profile.map(|p| p.name).unwrap_or("none"),
            "selected language profile"
        );
        self.filename = Some(name);
        self.refresh_all();
    }

    /// Reserved gutter width: the decimal digit count of the row count.
    pub fn gutter_width(&self) -> usize {
        let mut n = self.num_rows();
        let mut digits = 0;
        loop {
            digits += 1;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        digits
    }

    /// Inserts a new row at `at` (`0..=num_rows`), prefixed with
    /// `leading_spaces` literal spaces. No-op past the end of the sequence.
    pub fn insert_row(&mut self, at: usize, content: &str, leading_spaces: usize) {
        if at > self.rows.len() {
            return;
        }
        let mut raw = String::with_capacity(leading_spaces + content.len());
        for _ in 0..leading_spaces {
            raw.push(' ');
        }
        raw.push_str(content);
        self.rows.insert(at, Row::new(at, raw));
        self.renumber_from(at + 1);
        self.refresh_from(at);
        self.dirty = true;
    }

    /// Removes the row at `at`; no-op out of bounds.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.renumber_from(at);
        self.dirty = true;
    }

    /// Inserts `ch` at raw column `at` of row `row` (clamped to the row
    /// length); no-op if the row is out of bounds.
    pub fn insert_char(&mut self, row: usize, at: usize, ch: char) {
        if row >= self.rows.len() {
            return;
        }
        self.rows[row].insert_char(at, ch);
        self.refresh_from(row);
        self.dirty = true;
    }

    /// Removes the character at raw column `at` of row `row`; no-op when
    /// either index is out of range.
    pub fn delete_char(&mut self, row: usize, at: usize) {
        if row >= self.rows.len() {
            return;
        }
        if !self.rows[row].delete_char(at) {
            return;
        }
        self.refresh_from(row);
        self.dirty = true;
    }

    /// Splits row `row` at raw column `at_col`. The remainder moves to a new
    /// row below, auto-indented with the leading-space count of the original
    /// row's rendered content; splitting at column 0 instead inserts the
    /// indented empty row above. Returns the indent applied to the new row's
    /// content, which is also the natural cursor column after the split.
    pub fn split_row(&mut self, row: usize, at_col: usize) -> usize {
        if row >= self.rows.len() {
            return 0;
        }
        let indent = self.rows[row].leading_spaces();
        if at_col == 0 {
            self.insert_row(row, "", indent);
        } else {
            let tail = self.rows[row].split_off(at_col);
            self.insert_row(row + 1, &tail, indent);
            // insert_row refreshed the new row; the truncated original still
            // needs its own re-derivation (and cascade).
            self.refresh_from(row);
            self.dirty = true;
        }
        indent
    }

    /// Appends row `row`'s raw content to the row above and removes row
    /// `row`. Returns the previous row's raw length before the join (the
    /// natural cursor column), or `None` when `row` is 0 or out of bounds.
    pub fn join_with_previous(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.rows.len() {
            return None;
        }
        let tail = self.rows.remove(row);
        self.renumber_from(row);
        let col = self.rows[row - 1].raw_len();
        self.rows[row - 1].append_raw(tail.raw());
        self.refresh_from(row - 1);
        self.dirty = true;
        Some(col)
    }

    /// Serializes the document: every row's raw content with one newline
    /// appended per row, in order.
    pub fn serialize(&self) -> String {
        let total: usize = self.rows.iter().map(|row| row.raw().len() + 1).sum();
        let mut out = String::with_capacity(total);
        for row in &self.rows {
            out.push_str(row.raw());
            out.push('\n');
        }
        out
    }

    fn renumber_from(&mut self, at: usize) {
        for idx in at..self.rows.len() {
            self.rows[idx].idx = idx;
        }
    }

    /// Recomputes row `at`'s render and highlight, then walks forward while
    /// the carry flag keeps changing. A worklist loop bounded by the row
    /// count, never recursion.
    fn refresh_from(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows[at].rebuild_render(self.tab_width);
        let mut idx = at;
        loop {
            let carry_in = idx > 0 && self.rows[idx - 1].ends_in_open_comment();
            let changed = self.rows[idx].rehighlight(self.profile, carry_in);
            if !changed || idx + 1 >= self.rows.len() {
                break;
            }
            idx += 1;
        }
        if idx > at {
            trace!(from = at, to = idx, "comment carry cascade");
        }
    }

    /// Re-derives and re-classifies every row from the top (import, profile
    /// change, tab-width change).
    fn refresh_all(&mut self) {
        for idx in 0..self.rows.len() {
            let carry_in = idx > 0 && self.rows[idx - 1].ends_in_open_comment();
            self.rows[idx].rebuild_render(self.tab_width);
            self.rows[idx].rehighlight(self.profile, carry_in);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}
