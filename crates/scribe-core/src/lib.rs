#![warn(missing_docs)]
//! `scribe-core` - headless row-buffer editor kernel.
//!
//! # Overview
//!
//! `scribe-core` maintains an in-memory document as a sequence of text rows
//! and keeps two derived buffers per row consistent after every edit: the
//! rendered content (tabs expanded to tab stops) and a parallel highlight
//! classification. It does not touch the terminal; a front end feeds it
//! edit/navigation/search requests and reads back styled runs to draw.
//!
//! # Core pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Frame Composer (styled runs)               │  ← drawing data
//! ├─────────────────────────────────────────────┤
//! │  Viewport / Search Session                  │  ← view state
//! ├─────────────────────────────────────────────┤
//! │  Document (edits + highlight cascade)       │  ← mutations
//! ├─────────────────────────────────────────────┤
//! │  Row (raw / render / highlight buffers)     │  ← storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every mutation recomputes the affected row's render and highlight before
//! returning; when the open-block-comment carry flag changes, recomputation
//! walks forward row by row until the carry stabilizes.
//!
//! # Quick start
//!
//! ```rust
//! use scribe_core::{Document, compose_row};
//!
//! let mut doc = Document::from_text("int main() {\n\treturn 0;\n}", 8);
//! doc.set_filename("main.c");
//!
//! doc.insert_char(1, 9, '1');
//! assert!(doc.is_dirty());
//!
//! let runs = compose_row(doc.row(0).unwrap(), 0, 80);
//! assert!(!runs.is_empty());
//! ```
//!
//! # Module description
//!
//! - [`row`] - one line's raw content and derived buffers
//! - [`layout`] - tab-aware raw/rendered coordinate mapping
//! - [`highlight`] - per-character classification with cross-row carry
//! - [`document`] - the row sequence and every mutating operation
//! - [`viewport`] - cursor movement, clamping, and scroll offsets
//! - [`search`] - the incremental search session state machine
//! - [`compose`] - visible slices resolved into coalesced styled runs

pub mod compose;
pub mod document;
pub mod highlight;
pub mod layout;
pub mod row;
pub mod search;
pub mod viewport;

pub use compose::{Style, StyledRun, compose_row, style_for};
pub use document::Document;
pub use highlight::{Highlight, highlight_line, is_separator};
pub use layout::{DEFAULT_TAB_WIDTH, column_for_rendered_x, expand_tabs, rendered_x_for_column};
pub use row::Row;
pub use search::{SearchKey, SearchSession, SearchState, SearchStatus};
pub use viewport::{Cursor, CursorMove, Viewport, step};
