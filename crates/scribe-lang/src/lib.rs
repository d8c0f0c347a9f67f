#![warn(missing_docs)]
//! `scribe-lang` - static language profiles for the scribe editor kernel.
//!
//! This crate intentionally stays lightweight and does **not** depend on the
//! kernel or any parsing machinery. It provides the data that drives
//! filename-based profile selection and per-character highlight
//! classification: keyword tables, comment markers, special-token tables,
//! and feature flags.

/// The character that tags a keyword-table entry as tier 2.
///
/// Entries such as `"int|"` are tier-2 keywords; the tag is stripped before
/// comparison and only affects the style the match is given.
pub const KEYWORD_TAG: char = '|';

/// Which highlight features a profile enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    /// Classify numeric literals.
    pub numbers: bool,
    /// Classify single- and double-quoted string literals.
    pub strings: bool,
    /// Classify marker-triggered special tokens (e.g. preprocessor
    /// directives).
    pub specials: bool,
}

/// A language profile: everything the highlight engine needs to classify one
/// language, as static data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Display name, shown in the status bar.
    pub name: &'static str,
    /// Filename patterns. A pattern starting with `.` matches as a filename
    /// extension; any other pattern matches as a substring of the filename.
    pub matches: &'static [&'static str],
    /// Keyword table, scanned in declared order. A trailing [`KEYWORD_TAG`]
    /// marks a tier-2 keyword.
    pub keywords: &'static [&'static str],
    /// Special-token table (e.g. preprocessor directive names), scanned in
    /// declared order.
    pub specials: &'static [&'static str],
    /// The character that triggers special-token matching, if any.
    pub special_marker: Option<char>,
    /// Single-line comment marker.
    pub line_comment: Option<&'static str>,
    /// Block comment start marker.
    pub block_comment_start: Option<&'static str>,
    /// Block comment end marker.
    pub block_comment_end: Option<&'static str>,
    /// Enabled highlight features.
    pub features: Features,
}

impl Profile {
    /// Returns `true` if a single-line comment marker is configured.
    pub fn has_line_comment(&self) -> bool {
        self.line_comment.is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment markers are configured.
    pub fn has_block_comment(&self) -> bool {
        self.block_comment_start.is_some_and(|s| !s.is_empty())
            && self.block_comment_end.is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if `filename` matches one of this profile's patterns.
    pub fn matches_filename(&self, filename: &str) -> bool {
        self.matches.iter().any(|pat| {
            if let Some(ext) = pat.strip_prefix('.') {
                filename
                    .rsplit_once('.')
                    .is_some_and(|(_, file_ext)| file_ext == ext)
            } else {
                filename.contains(pat)
            }
        })
    }
}

/// Splits a keyword-table entry into its text and tier-2 flag.
pub fn keyword_text(entry: &str) -> (&str, bool) {
    match entry.strip_suffix(KEYWORD_TAG) {
        Some(text) => (text, true),
        None => (entry, false),
    }
}

/// The built-in C profile.
pub static C: Profile = Profile {
    name: "c",
    matches: &[".c", ".h", ".cpp", ".hpp", ".cc"],
    keywords: &[
        "switch", "if", "do", "while", "for", "break", "continue", "return",
        "else", "goto", "struct", "union", "typedef", "enum", "class", "case",
        "default", "sizeof",
        // types
        "int|", "long|", "double|", "float|", "short|", "char|", "unsigned|",
        "signed|", "const|", "static|", "void|", "auto|", "bool|",
        "register|", "extern|", "volatile|", "size_t|", "ptrdiff_t|",
    ],
    specials: &[
        "include", "define", "undef", "if", "ifdef", "ifndef", "else", "elif",
        "endif", "pragma",
    ],
    special_marker: Some('#'),
    line_comment: Some("//"),
    block_comment_start: Some("/*"),
    block_comment_end: Some("*/"),
    features: Features {
        numbers: true,
        strings: true,
        specials: true,
    },
};

/// The built-in Rust profile.
pub static RUST: Profile = Profile {
    name: "rust",
    matches: &[".rs"],
    keywords: &[
        "as", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "fn", "for", "if", "impl", "in", "let", "loop", "match",
        "mod", "move", "mut", "pub", "ref", "return", "self", "static",
        "struct", "trait", "type", "unsafe", "use", "where", "while",
        // primitive types
        "bool|", "char|", "str|", "u8|", "u16|", "u32|", "u64|", "usize|",
        "i8|", "i16|", "i32|", "i64|", "isize|", "f32|", "f64|",
    ],
    specials: &[],
    special_marker: None,
    line_comment: Some("//"),
    block_comment_start: Some("/*"),
    block_comment_end: Some("*/"),
    features: Features {
        numbers: true,
        strings: true,
        specials: false,
    },
};

/// All registered profiles, in match order.
pub static PROFILES: &[&Profile] = &[&C, &RUST];

/// Finds the profile matching `filename`, if any.
pub fn detect(filename: &str) -> Option<&'static Profile> {
    PROFILES
        .iter()
        .copied()
        .find(|profile| profile.matches_filename(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(detect("main.c").map(|p| p.name), Some("c"));
        assert_eq!(detect("lib.rs").map(|p| p.name), Some("rust"));
        assert_eq!(detect("notes.txt"), None);
    }

    #[test]
    fn test_detect_uses_last_extension() {
        assert_eq!(detect("archive.tar.c").map(|p| p.name), Some("c"));
    }

    #[test]
    fn test_keyword_text_strips_tier_tag() {
        assert_eq!(keyword_text("int|"), ("int", true));
        assert_eq!(keyword_text("if"), ("if", false));
    }

    #[test]
    fn test_comment_predicates() {
        assert!(C.has_line_comment());
        assert!(C.has_block_comment());

        let bare = Profile {
            name: "bare",
            matches: &[],
            keywords: &[],
            specials: &[],
            special_marker: None,
            line_comment: None,
            block_comment_start: Some("/*"),
            block_comment_end: None,
            features: Features::default(),
        };
        assert!(!bare.has_line_comment());
        assert!(!bare.has_block_comment());
    }
}
