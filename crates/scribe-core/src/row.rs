//! One document line with its derived buffers.

use crate::highlight::{self, Highlight};
use crate::layout;
use scribe_lang::Profile;

/// One line of the document.
///
/// Owns the raw content and the two derived buffers: the rendered content
/// (tabs expanded) and the highlight classification parallel to it. Raw
/// columns count characters; `hl.len()` always equals the rendered
/// character count, and the rendered content is never shorter than the raw
/// content.
#[derive(Debug, Clone)]
pub struct Row {
    /// Position of this row in the document; renumbered on every insertion
    /// or deletion elsewhere in the sequence.
    pub(crate) idx: usize,
    raw: String,
    render: String,
    hl: Vec<Highlight>,
    /// Carry-out: this row ends inside an open block comment.
    open_comment: bool,
}

impl Row {
    /// Creates a row from raw content. The derived buffers are empty until
    /// the owning document updates the row.
    pub(crate) fn new(idx: usize, raw: impl Into<String>) -> Self {
        Self {
            idx,
            raw: raw.into(),
            render: String::new(),
            hl: Vec::new(),
            open_comment: false,
        }
    }

    /// Index of this row in the document.
    pub fn index(&self) -> usize {
        self.idx
    }

    /// Raw content (tabs unexpanded).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Rendered content (tabs expanded).
    pub fn render(&self) -> &str {
        &self.render
    }

    /// Highlight classifications, one per rendered character.
    pub fn hl(&self) -> &[Highlight] {
        &self.hl
    }

    /// Raw length in characters.
    pub fn raw_len(&self) -> usize {
        self.raw.chars().count()
    }

    /// Rendered length in characters.
    pub fn render_len(&self) -> usize {
        self.hl.len()
    }

    /// Whether this row ends inside an open block comment.
    pub fn ends_in_open_comment(&self) -> bool {
        self.open_comment
    }

    /// Number of leading spaces in the rendered content (used for
    /// auto-indent on row splits).
    pub fn leading_spaces(&self) -> usize {
        self.render.chars().take_while(|&ch| ch == ' ').count()
    }

    /// Rendered column of the character at raw column `column`.
    pub fn rendered_x(&self, column: usize, tab_width: usize) -> usize {
        layout::rendered_x_for_column(&self.raw, column, tab_width)
    }

    /// Raw column owning the cell at rendered column `rx`.
    pub fn column_at_rendered_x(&self, rx: usize, tab_width: usize) -> usize {
        layout::column_for_rendered_x(&self.raw, rx, tab_width)
    }

    /// Re-derives the rendered content from the raw content. Whole-row,
    /// never partial.
    pub(crate) fn rebuild_render(&mut self, tab_width: usize) {
        self.render = layout::expand_tabs(&self.raw, tab_width);
    }

    /// Re-classifies the rendered content under `carry_in`; returns whether
    /// the carry-out flag changed (the caller then cascades to the next
    /// row).
    pub(crate) fn rehighlight(&mut self, profile: Option<&Profile>, carry_in: bool) -> bool {
        let (hl, carry_out) = highlight::highlight_line(&self.render, profile, carry_in);
        self.hl = hl;
        let changed = self.open_comment != carry_out;
        self.open_comment = carry_out;
        changed
    }

    /// Replaces the highlight buffer (search overlay restore). Ignored if
    /// the length no longer matches the rendered content.
    pub(crate) fn restore_hl(&mut self, hl: Vec<Highlight>) {
        if hl.len() == self.hl.len() {
            self.hl = hl;
        }
    }

    /// Overlays `class` across `[from, to)` rendered columns, clamped to the
    /// buffer.
    pub(crate) fn overlay(&mut self, from: usize, to: usize, class: Highlight) {
        let to = to.min(self.hl.len());
        if from < to {
            self.hl[from..to].fill(class);
        }
    }

    /// Inserts `ch` at raw column `at`, clamped to the row length.
    pub(crate) fn insert_char(&mut self, at: usize, ch: char) {
        let at = at.min(self.raw_len());
        let byte = byte_of_column(&self.raw, at);
        self.raw.insert(byte, ch);
    }

    /// Removes the character at raw column `at`; no-op out of range.
    pub(crate) fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.raw_len() {
            return false;
        }
        let byte = byte_of_column(&self.raw, at);
        self.raw.remove(byte);
        true
    }

    /// Appends `tail` to the raw content (row join).
    pub(crate) fn append_raw(&mut self, tail: &str) {
        self.raw.push_str(tail);
    }

    /// Truncates the raw content at raw column `at` and returns the removed
    /// remainder (row split).
    pub(crate) fn split_off(&mut self, at: usize) -> String {
        let byte = byte_of_column(&self.raw, at.min(self.raw_len()));
        self.raw.split_off(byte)
    }
}

/// Byte offset of character `column` in `s` (its length when out of range).
fn byte_of_column(s: &str, column: usize) -> usize {
    s.char_indices()
        .nth(column)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}
