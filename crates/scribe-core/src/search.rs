//! Incremental search over rendered row content.
//!
//! A search session lives for the duration of one prompt. Every key first
//! restores the one-row-deep highlight snapshot, then either edits the
//! query or flips the direction, then rescans cyclically from the last
//! match. Cancelling restores the cursor and both scroll offsets to their
//! pre-search values; accepting keeps the final cursor position.

use crate::document::Document;
use crate::highlight::Highlight;
use crate::viewport::{Cursor, Viewport};
use regex::RegexBuilder;
use tracing::trace;

/// One keystroke delivered to an active search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    /// Append a character to the query.
    Char(char),
    /// Remove the last query character.
    Backspace,
    /// Jump to the next match (keeps the query).
    Next,
    /// Jump to the previous match (keeps the query).
    Prev,
    /// Close the session, keeping the cursor on the match.
    Accept,
    /// Close the session, restoring the pre-search view.
    Cancel,
}

/// Session outcome after a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The prompt stays open.
    Active,
    /// The session closed, keeping the cursor position.
    Accepted,
    /// The session closed; cursor and scroll offsets were restored.
    Cancelled,
}

/// The search state machine, driven one event at a time.
#[derive(Debug, Default)]
pub enum SearchState {
    /// No search has run yet.
    #[default]
    Idle,
    /// A prompt is open.
    AwaitingInput(SearchSession),
    /// The last session was accepted or cancelled.
    Closed,
}

impl SearchState {
    /// Returns `true` while a prompt is open.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::AwaitingInput(_))
    }

    /// The active session's query, if a prompt is open.
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::AwaitingInput(session) => Some(session.query()),
            _ => None,
        }
    }

    /// Opens a prompt, capturing the view state to restore on cancel.
    pub fn begin(&mut self, cursor: Cursor, viewport: &Viewport) {
        *self = Self::AwaitingInput(SearchSession::start(cursor, viewport));
    }

    /// Feeds one keystroke to the active session. Returns
    /// [`SearchStatus::Active`] when no prompt is open.
    pub fn handle_key(
        &mut self,
        key: SearchKey,
        doc: &mut Document,
        cursor: &mut Cursor,
        viewport: &mut Viewport,
    ) -> SearchStatus {
        let Self::AwaitingInput(session) = self else {
            return SearchStatus::Active;
        };
        let status = session.handle_key(key, doc, cursor, viewport);
        if status != SearchStatus::Active {
            *self = Self::Closed;
        }
        status
    }
}

/// State of one open search prompt.
#[derive(Debug)]
pub struct SearchSession {
    query: String,
    last_match: Option<usize>,
    forward: bool,
    /// One-row-deep snapshot of the last match row's pre-overlay highlights.
    saved_hl: Option<(usize, Vec<Highlight>)>,
    saved_cursor: Cursor,
    saved_row_off: usize,
    saved_col_off: usize,
}

impl SearchSession {
    /// Opens a session, capturing the cursor and scroll offsets.
    pub fn start(cursor: Cursor, viewport: &Viewport) -> Self {
        Self {
            query: String::new(),
            last_match: None,
            forward: true,
            saved_hl: None,
            saved_cursor: cursor,
            saved_row_off: viewport.row_off,
            saved_col_off: viewport.col_off,
        }
    }

    /// The current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Processes one keystroke.
    pub fn handle_key(
        &mut self,
        key: SearchKey,
        doc: &mut Document,
        cursor: &mut Cursor,
        viewport: &mut Viewport,
    ) -> SearchStatus {
        // Every key, including the terminating ones, first undoes the
        // previous match's transient overlay.
        self.restore_overlay(doc);

        match key {
            SearchKey::Accept => return SearchStatus::Accepted,
            SearchKey::Cancel => {
                *cursor = self.saved_cursor;
                viewport.row_off = self.saved_row_off;
                viewport.col_off = self.saved_col_off;
                return SearchStatus::Cancelled;
            }
            SearchKey::Next => self.forward = true,
            SearchKey::Prev => self.forward = false,
            SearchKey::Char(ch) => {
                self.query.push(ch);
                self.last_match = None;
            }
            SearchKey::Backspace => {
                self.query.pop();
                self.last_match = None;
            }
        }

        // Without a prior match there is nothing to go back from.
        if self.last_match.is_none() {
            self.forward = true;
        }
        self.scan(doc, cursor, viewport);
        SearchStatus::Active
    }

    fn restore_overlay(&mut self, doc: &mut Document) {
        if let Some((idx, hl)) = self.saved_hl.take() {
            if let Some(row) = doc.row_mut(idx) {
                row.restore_hl(hl);
            }
        }
    }

    /// Scans every row at most once, starting after the last match and
    /// wrapping at both ends, for the first rendered content containing the
    /// query.
    fn scan(&mut self, doc: &mut Document, cursor: &mut Cursor, viewport: &mut Viewport) {
        if self.query.is_empty() || doc.is_empty() {
            return;
        }
        let Ok(re) = RegexBuilder::new(&regex::escape(&self.query)).build() else {
            return;
        };

        let num = doc.num_rows() as isize;
        let dir: isize = if self.forward { 1 } else { -1 };
        let mut current = self.last_match.map(|i| i as isize).unwrap_or(-1);

        for _ in 0..num {
            current += dir;
            if current < 0 {
                current = num - 1;
            } else if current >= num {
                current = 0;
            }
            let idx = current as usize;

            let Some(row) = doc.row(idx) else { continue };
            let Some(found) = re.find(row.render()) else {
                continue;
            };
            let rx = row.render()[..found.start()].chars().count();
            let col = row.column_at_rendered_x(rx, doc.tab_width());
            let span = self.query.chars().count();
            trace!(row = idx, rx, "search match");

            self.last_match = Some(idx);
            *cursor = Cursor { row: idx, col };
            viewport.force_row_top(doc);

            if let Some(row) = doc.row_mut(idx) {
                self.saved_hl = Some((idx, row.hl().to_vec()));
                row.overlay(rx, rx + span, Highlight::Match);
            }
            return;
        }
    }
}
