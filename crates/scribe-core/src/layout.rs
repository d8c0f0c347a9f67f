//! Tab-aware coordinate mapping.
//!
//! Raw columns count characters of a row's raw content; rendered columns
//! count cells after tab expansion. Every tab advances to the next multiple
//! of the tab width; every other character occupies exactly one cell.

/// Default tab width (in cells) used when a caller does not specify one.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Rendered column reached by the character at raw column `column`.
///
/// Expands every tab in `raw[..column]` to the next tab stop; non-tab
/// characters count one cell each. `column` past the end of `raw` yields the
/// full rendered width.
pub fn rendered_x_for_column(raw: &str, column: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut rx = 0usize;
    for ch in raw.chars().take(column) {
        if ch == '\t' {
            rx += (tab_width - 1) - (rx % tab_width);
        }
        rx += 1;
    }
    rx
}

/// Raw column owning the cell at rendered column `rx`.
///
/// Left inverse of [`rendered_x_for_column`]: scans raw characters
/// accumulating the same expansion and returns the first raw index whose
/// rendered position exceeds `rx`. A target inside a tab's span resolves to
/// the raw index of that tab. Targets past the rendered width resolve to the
/// raw length.
pub fn column_for_rendered_x(raw: &str, rx: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut cur_rx = 0usize;
    for (cx, ch) in raw.chars().enumerate() {
        if ch == '\t' {
            cur_rx += (tab_width - 1) - (cur_rx % tab_width);
        }
        cur_rx += 1;
        if cur_rx > rx {
            return cx;
        }
    }
    raw.chars().count()
}

/// Derives a row's rendered content from its raw content.
///
/// Each tab emits spaces up to the next tab stop; every other character is
/// emitted verbatim. Always whole-row; the result only depends on `raw` and
/// `tab_width`.
pub fn expand_tabs(raw: &str, tab_width: usize) -> String {
    let tab_width = tab_width.max(1);
    let tabs = raw.chars().filter(|&ch| ch == '\t').count();
    let mut render = String::with_capacity(raw.len() + tabs * (tab_width - 1));
    let mut x = 0usize;
    for ch in raw.chars() {
        if ch == '\t' {
            render.push(' ');
            x += 1;
            while x % tab_width != 0 {
                render.push(' ');
                x += 1;
            }
        } else {
            render.push(ch);
            x += 1;
        }
    }
    render
}
