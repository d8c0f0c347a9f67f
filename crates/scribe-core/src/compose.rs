//! Frame composition: visible row slices resolved into styled runs.
//!
//! The composer turns a row's rendered content and parallel highlight
//! classifications into a compact sequence of runs, one per stretch of
//! identical resolved style, so the front end emits as few style changes as
//! possible. Control characters become a placeholder glyph in inverted
//! video and bypass the style table.

use crate::highlight::Highlight;
use crate::row::Row;

/// A resolved character style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color, if not the terminal default.
    pub fg: Option<(u8, u8, u8)>,
    /// Background color, if not the terminal default.
    pub bg: Option<(u8, u8, u8)>,
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Inverted video (control-character placeholders).
    pub inverted: bool,
}

const PLAIN: Style = Style {
    fg: None,
    bg: None,
    bold: false,
    italic: false,
    inverted: false,
};

const CONTROL: Style = Style {
    fg: None,
    bg: None,
    bold: false,
    italic: false,
    inverted: true,
};

/// A stretch of identically styled text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    /// The run's text.
    pub text: String,
    /// The run's resolved style.
    pub style: Style,
}

/// Resolves one classification to its style.
pub fn style_for(hl: Highlight) -> Style {
    match hl {
        Highlight::Normal => PLAIN,
        Highlight::Comment | Highlight::BlockComment => Style {
            fg: Some((0x00, 0x88, 0xff)),
            italic: true,
            ..PLAIN
        },
        Highlight::Keyword1 => Style {
            fg: Some((0xff, 0x9d, 0x00)),
            bold: true,
            ..PLAIN
        },
        Highlight::Keyword2 => Style {
            fg: Some((0x80, 0xff, 0xbb)),
            ..PLAIN
        },
        Highlight::Special => Style {
            fg: Some((0x80, 0xff, 0xbb)),
            bold: true,
            ..PLAIN
        },
        Highlight::Number => Style {
            fg: Some((0xff, 0x00, 0x44)),
            ..PLAIN
        },
        Highlight::String => Style {
            fg: Some((0x3a, 0xd9, 0x00)),
            ..PLAIN
        },
        Highlight::Match => Style {
            bg: Some((30, 150, 200)),
            bold: true,
            ..PLAIN
        },
        Highlight::Error => Style {
            bg: Some((0x82, 0x00, 0x00)),
            bold: true,
            ..PLAIN
        },
    }
}

/// Composes the visible slice of `row`: rendered characters from `col_off`,
/// at most `width` of them, coalesced into styled runs.
pub fn compose_row(row: &Row, col_off: usize, width: usize) -> Vec<StyledRun> {
    let mut runs: Vec<StyledRun> = Vec::new();

    for (ch, &hl) in row
        .render()
        .chars()
        .zip(row.hl())
        .skip(col_off)
        .take(width)
    {
        let (ch, style) = if ch.is_control() {
            (control_glyph(ch), CONTROL)
        } else {
            (ch, style_for(hl))
        };

        match runs.last_mut() {
            Some(run) if run.style == style => run.text.push(ch),
            _ => runs.push(StyledRun {
                text: String::from(ch),
                style,
            }),
        }
    }

    runs
}

/// Placeholder glyph for a control character: `@`-relative for codes up to
/// 26, `?` otherwise.
fn control_glyph(ch: char) -> char {
    let code = ch as u32;
    if code <= 26 {
        char::from(b'@' + code as u8)
    } else {
        '?'
    }
}
