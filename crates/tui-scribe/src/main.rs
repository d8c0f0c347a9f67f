//! Terminal front end for the scribe editor kernel.
//!
//! Built with crossterm and ratatui on top of `scribe-core`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tui-scribe -- <file_path>
//! ```
//!
//! # Keys
//!
//! - Arrows: move cursor
//! - Home/End: start/end of line
//! - PageUp/PageDown: page moves
//! - Enter: new line (auto-indented)
//! - Backspace/Ctrl-H: delete left (joins lines at column 0)
//! - Delete: delete right
//! - Ctrl-S: save (prompts for a name on an unnamed buffer)
//! - Ctrl-F: incremental search (Arrows = next/previous, Enter = accept,
//!   Esc = cancel)
//! - Ctrl-Q: quit (a dirty buffer asks for confirmation)
//!
//! # Configuration and logging
//!
//! An optional JSON config (`SCRIBE_CONFIG`, or `scribe.json` in the working
//! directory) sets `tab_width` and `quit_confirm_times`. Setting
//! `SCRIBE_LOG_DIR` enables file logging, filtered by `RUST_LOG`.

mod config;
mod logging;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use scribe_core::{
    Cursor, CursorMove, Document, SearchKey, SearchState, SearchStatus, Viewport, compose_row, step,
};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use std::{env, fs, process};
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);
const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

/// Bars reserved below the text area: status and message.
const RESERVED_ROWS: u16 = 2;

#[derive(Debug, Default)]
enum Prompt {
    #[default]
    None,
    SaveAs(String),
}

struct App {
    doc: Document,
    cursor: Cursor,
    viewport: Viewport,
    search: SearchState,
    prompt: Prompt,
    status_message: String,
    status_time: Instant,
    quit_confirm_times: u32,
    quit_times: u32,
    pending_resize: Option<(u16, u16)>,
    should_quit: bool,
}

impl App {
    fn new(config: &config::Config, path: Option<PathBuf>) -> io::Result<Self> {
        let mut doc = match &path {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                Document::from_text(&text, config.tab_width)
            }
            None => Document::new(config.tab_width),
        };
        if let Some(path) = &path {
            doc.set_filename(path.to_string_lossy());
            info!(path = %path.display(), rows = doc.num_rows(), "opened file");
        }

        let (width, height) = crossterm::terminal::size()?;
        let viewport = Viewport::new(
            height.saturating_sub(RESERVED_ROWS) as usize,
            width as usize,
        );

        Ok(Self {
            doc,
            cursor: Cursor::default(),
            viewport,
            search: SearchState::default(),
            prompt: Prompt::None,
            status_message: HELP_MESSAGE.to_string(),
            status_time: Instant::now(),
            quit_confirm_times: config.quit_confirm_times,
            quit_times: config.quit_confirm_times,
            pending_resize: None,
            should_quit: false,
        })
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_time = Instant::now();
    }

    /// Applies a deferred resize: update the window geometry, nothing more.
    /// The next scroll pulls the cursor back into view.
    fn reflow(&mut self, width: u16, height: u16) {
        self.viewport.resize(
            height.saturating_sub(RESERVED_ROWS) as usize,
            width as usize,
        );
        info!(width, height, "reflowed after resize");
    }

    // --- key dispatch ------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) {
        if self.search.is_active() {
            self.handle_search_key(key);
            return;
        }
        if matches!(self.prompt, Prompt::SaveAs(_)) {
            self.handle_save_as_key(key);
            return;
        }
        self.handle_normal_key(key);
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let mapped = match key.code {
            KeyCode::Enter => Some(SearchKey::Accept),
            KeyCode::Esc => Some(SearchKey::Cancel),
            KeyCode::Backspace => Some(SearchKey::Backspace),
            KeyCode::Char('h') if ctrl => Some(SearchKey::Backspace),
            KeyCode::Right | KeyCode::Down => Some(SearchKey::Next),
            KeyCode::Left | KeyCode::Up => Some(SearchKey::Prev),
            KeyCode::Char(ch) if !ctrl => Some(SearchKey::Char(ch)),
            _ => None,
        };
        let Some(mapped) = mapped else { return };

        match self.search.handle_key(
            mapped,
            &mut self.doc,
            &mut self.cursor,
            &mut self.viewport,
        ) {
            SearchStatus::Active => {}
            SearchStatus::Accepted => self.set_status(""),
            SearchStatus::Cancelled => self.set_status(""),
        }
    }

    fn handle_save_as_key(&mut self, key: KeyEvent) {
        let Prompt::SaveAs(input) = &mut self.prompt else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt = Prompt::None;
                self.set_status("Save aborted");
            }
            KeyCode::Enter => {
                if input.is_empty() {
                    return;
                }
                let name = std::mem::take(input);
                self.prompt = Prompt::None;
                self.doc.set_filename(name);
                self.save_file();
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.push(ch);
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('q') {
            if self.doc.is_dirty() && self.quit_times > 0 {
                let times = self.quit_times;
                self.set_status(format!(
                    "WARNING!!! File has unsaved changes. Press Ctrl-Q {times} more times to quit."
                ));
                self.quit_times -= 1;
                return;
            }
            self.should_quit = true;
            return;
        }

        match (key.code, ctrl) {
            (KeyCode::Char('s'), true) => self.request_save(),
            (KeyCode::Char('f'), true) => {
                self.search.begin(self.cursor, &self.viewport);
            }
            (KeyCode::Char('h'), true) => self.delete_back(),
            // Every frame redraws, so Ctrl-L has nothing to do; a bare Esc
            // is swallowed.
            (KeyCode::Char('l'), true) => {}
            (KeyCode::Esc, _) => {}
            (KeyCode::Enter, _) => self.insert_newline(),
            (KeyCode::Backspace, _) => self.delete_back(),
            (KeyCode::Delete, _) => {
                step(&mut self.cursor, &self.doc, CursorMove::Right);
                self.delete_back();
            }
            (KeyCode::Home, _) => self.cursor.col = 0,
            (KeyCode::End, _) => {
                if let Some(row) = self.doc.row(self.cursor.row) {
                    self.cursor.col = row.raw_len();
                }
            }
            (KeyCode::PageUp, _) => self.page_move(CursorMove::Up),
            (KeyCode::PageDown, _) => self.page_move(CursorMove::Down),
            (KeyCode::Up, _) => step(&mut self.cursor, &self.doc, CursorMove::Up),
            (KeyCode::Down, _) => step(&mut self.cursor, &self.doc, CursorMove::Down),
            (KeyCode::Left, _) => step(&mut self.cursor, &self.doc, CursorMove::Left),
            (KeyCode::Right, _) => step(&mut self.cursor, &self.doc, CursorMove::Right),
            (KeyCode::Tab, false) => self.insert_char('\t'),
            (KeyCode::Char(ch), false) if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert_char(ch);
            }
            _ => {}
        }

        // Anything but Ctrl-Q rewinds the quit countdown.
        self.quit_times = self.quit_confirm_times;
    }

    // --- edit operations ---------------------------------------------------

    fn insert_char(&mut self, ch: char) {
        if self.cursor.row == self.doc.num_rows() {
            self.doc.insert_row(self.cursor.row, "", 0);
        }
        self.doc.insert_char(self.cursor.row, self.cursor.col, ch);
        self.cursor.col += 1;
    }

    fn insert_newline(&mut self) {
        if self.cursor.row >= self.doc.num_rows() {
            self.doc.insert_row(self.doc.num_rows(), "", 0);
            self.cursor.row += 1;
            self.cursor.col = 0;
            return;
        }
        let indent = self.doc.split_row(self.cursor.row, self.cursor.col);
        self.cursor.row += 1;
        self.cursor.col = indent;
    }

    fn delete_back(&mut self) {
        if self.cursor.row >= self.doc.num_rows() {
            return;
        }
        if self.cursor.row == 0 && self.cursor.col == 0 {
            return;
        }
        if self.cursor.col > 0 {
            self.doc.delete_char(self.cursor.row, self.cursor.col - 1);
            self.cursor.col -= 1;
        } else if let Some(col) = self.doc.join_with_previous(self.cursor.row) {
            self.cursor.row -= 1;
            self.cursor.col = col;
        }
    }

    fn page_move(&mut self, direction: CursorMove) {
        match direction {
            CursorMove::Up => self.cursor.row = self.viewport.row_off,
            _ => {
                self.cursor.row = (self.viewport.row_off + self.viewport.height.max(1) - 1)
                    .min(self.doc.num_rows());
            }
        }
        for _ in 0..self.viewport.height {
            step(&mut self.cursor, &self.doc, direction);
        }
    }

    // --- saving ------------------------------------------------------------

    fn request_save(&mut self) {
        if self.doc.filename().is_none() {
            self.prompt = Prompt::SaveAs(String::new());
            return;
        }
        self.save_file();
    }

    fn save_file(&mut self) {
        let Some(name) = self.doc.filename().map(str::to_string) else {
            return;
        };
        match save_to_path(Path::new(&name), &self.doc.serialize()) {
            Ok(bytes) => {
                self.doc.mark_saved();
                info!(path = %name, bytes, "saved file");
                self.set_status(format!("{bytes} bytes written to disk"));
            }
            Err(err) => {
                warn!(path = %name, %err, "save failed");
                self.set_status(format!("Can't save! I/O error: {err}"));
            }
        }
    }

    // --- rendering ---------------------------------------------------------

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_rows(frame, chunks[0]);
        self.render_status_bar(frame, chunks[1]);
        self.render_message_bar(frame, chunks[2]);
        self.position_cursor(frame, chunks[0]);
    }

    fn render_rows(&self, frame: &mut Frame, area: Rect) {
        let gutter = self.doc.gutter_width();
        let text_width = self.viewport.text_width(&self.doc);
        let mut lines = Vec::with_capacity(area.height as usize);

        for screen_row in 0..area.height as usize {
            let file_row = screen_row + self.viewport.row_off;

            if file_row >= self.doc.num_rows() {
                if self.doc.is_empty() && screen_row == area.height as usize / 3 {
                    lines.push(Line::from(welcome_line(area.width as usize)));
                } else {
                    lines.push(Line::from("~"));
                }
                continue;
            }

            let Some(row) = self.doc.row(file_row) else {
                lines.push(Line::from("~"));
                continue;
            };

            let mut spans = vec![Span::raw(format!(
                "{:>width$} ",
                file_row + 1,
                width = gutter
            ))];
            for run in compose_row(row, self.viewport.col_off, text_width) {
                spans.push(Span::styled(run.text, to_ratatui_style(run.style)));
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let width = area.width as usize;
        let name = self.doc.filename().unwrap_or("[No Name]");
        let name = truncate_to_width(name, 20);
        let left = format!(
            "{} - {} lines {}",
            name,
            self.doc.num_rows(),
            if self.doc.is_dirty() { "(modified)" } else { "" }
        );
        let right = format!(
            "{} | {}/{}",
            self.doc.profile().map(|p| p.name).unwrap_or("no ft"),
            self.cursor.row + 1,
            self.doc.num_rows()
        );

        let left = truncate_to_width(&left, width);
        let mut bar = left.to_string();
        let used = bar.width();
        let right_width = right.width();
        if width > used + right_width {
            bar.push_str(&" ".repeat(width - used - right_width));
            bar.push_str(&right);
        } else {
            bar.push_str(&" ".repeat(width.saturating_sub(used)));
        }

        let status = Paragraph::new(bar).style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_widget(status, area);
    }

    fn render_message_bar(&self, frame: &mut Frame, area: Rect) {
        let text = if let Some(query) = self.search.query() {
            format!("Search: {query} (Use ESC/Arrows/Enter)")
        } else if let Prompt::SaveAs(input) = &self.prompt {
            format!("Save as: {input} (ESC to cancel)")
        } else if !self.status_message.is_empty()
            && self.status_time.elapsed() < MESSAGE_TIMEOUT
        {
            self.status_message.clone()
        } else {
            String::new()
        };

        let text = truncate_to_width(&text, area.width as usize).to_string();
        frame.render_widget(Paragraph::new(text), area);
    }

    fn position_cursor(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let gutter = self.doc.gutter_width() + 1;
        let row = self.cursor.row.saturating_sub(self.viewport.row_off);
        let col = gutter + self.viewport.rx.saturating_sub(self.viewport.col_off);

        let x = (area.x + col as u16).min(area.x + area.width.saturating_sub(1));
        let y = (area.y + row as u16).min(area.y + area.height.saturating_sub(1));
        frame.set_cursor_position((x, y));
    }
}

fn to_ratatui_style(style: scribe_core::Style) -> Style {
    let mut out = Style::default();
    if let Some((r, g, b)) = style.fg {
        out = out.fg(Color::Rgb(r, g, b));
    }
    if let Some((r, g, b)) = style.bg {
        out = out.bg(Color::Rgb(r, g, b));
    }
    let mut modifiers = Modifier::empty();
    if style.bold {
        modifiers |= Modifier::BOLD;
    }
    if style.italic {
        modifiers |= Modifier::ITALIC;
    }
    if style.inverted {
        modifiers |= Modifier::REVERSED;
    }
    out.add_modifier(modifiers)
}

fn welcome_line(width: usize) -> String {
    let message = format!("scribe editor -- version {VERSION}");
    let message = truncate_to_width(&message, width);
    let padding = width.saturating_sub(message.width()) / 2;
    if padding == 0 {
        return message.to_string();
    }
    format!("~{}{}", " ".repeat(padding - 1), message)
}

/// Longest prefix of `s` that fits in `width` terminal cells.
fn truncate_to_width(s: &str, width: usize) -> &str {
    if s.width() <= width {
        return s;
    }
    let mut end = 0;
    let mut used = 0;
    for (idx, ch) in s.char_indices() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        end = idx + ch.len_utf8();
    }
    &s[..end]
}

/// Writes `contents` next to `path` and atomically renames over it, so the
/// target is always either the old or the new bytes. Returns the byte count.
fn save_to_path(path: &Path, contents: &str) -> io::Result<usize> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp~");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(contents.len())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        // A resize event only records the new geometry; the reflow happens
        // here, synchronously, before the next frame.
        if let Some((width, height)) = app.pending_resize.take() {
            app.reflow(width, height);
        }

        app.viewport.scroll(app.cursor, &app.doc);
        terminal.draw(|frame| app.render(frame))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Resize(width, height) => app.pending_resize = Some((width, height)),
                _ => {}
            }
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let _log_guard = logging::init();
    let config = config::load();
    let path = env::args().nth(1).map(PathBuf::from);

    // Load before touching the terminal: an unreadable file is fatal and
    // should be reported as a plain error.
    let mut app = match App::new(&config, path) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("scribe: {err}");
            process::exit(1);
        }
    };

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_round_trips_serialized_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.txt");

        let doc = Document::from_text("alpha\nbeta", 8);
        let written = save_to_path(&path, &doc.serialize()).expect("save");

        let bytes = fs::read(&path).expect("read back");
        assert_eq!(written, bytes.len());
        assert_eq!(bytes, b"alpha\nbeta\n");

        let reloaded = Document::from_text(&String::from_utf8(bytes).expect("utf8"), 8);
        assert_eq!(reloaded.num_rows(), 2);
        assert_eq!(reloaded.row(0).map(|r| r.raw()), Some("alpha"));
    }

    #[test]
    fn test_save_replaces_existing_content_exactly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.txt");
        fs::write(&path, "something much longer than the replacement").expect("seed");

        save_to_path(&path, "short\n").expect("save");
        assert_eq!(fs::read_to_string(&path).expect("read"), "short\n");
    }

    #[test]
    fn test_save_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("no-such-dir").join("out.txt");
        assert!(save_to_path(&path, "x").is_err());
    }

    #[test]
    fn test_truncate_to_width_respects_cells() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello", 3), "hel");
        // Wide characters occupy two cells each.
        assert_eq!(truncate_to_width("宽宽宽", 4), "宽宽");
        assert_eq!(truncate_to_width("宽宽", 3), "宽");
    }

    #[test]
    fn test_welcome_line_is_centered() {
        let line = welcome_line(80);
        assert!(line.starts_with('~'));
        assert!(line.contains("scribe editor"));
        assert!(line.width() <= 80);
    }
}
