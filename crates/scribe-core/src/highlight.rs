//! Per-character highlight classification.
//!
//! One left-to-right pass over a row's rendered text, driven by a
//! [`Profile`] and the open-block-comment flag carried in from the previous
//! row. Produces one classification per rendered character plus the carry-out
//! flag for the next row.

use scribe_lang::Profile;

/// Classification of one rendered character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// No special classification.
    Normal,
    /// Single-line comment.
    Comment,
    /// Block comment (possibly spanning rows).
    BlockComment,
    /// Tier-1 keyword (statements).
    Keyword1,
    /// Tier-2 keyword (types).
    Keyword2,
    /// String literal.
    String,
    /// Numeric literal.
    Number,
    /// Marker-triggered special token (e.g. a preprocessor directive).
    Special,
    /// Transient search-match overlay; written only by the search session.
    Match,
    /// Malformed construct (currently: invalid numeric literals).
    Error,
}

/// Returns `true` if `ch` delimits tokens.
///
/// Separators are whitespace and a fixed punctuation set; the end of a row
/// also counts as a separator wherever a following character is required.
pub fn is_separator(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            ',' | '.'
                | '('
                | ')'
                | '+'
                | '-'
                | '/'
                | '*'
                | '!'
                | '?'
                | '='
                | '~'
                | '%'
                | '<'
                | '>'
                | '['
                | ']'
                | '{'
                | '}'
                | ':'
                | ';'
                | '&'
                | '|'
                | '^'
                | '"'
                | '\''
                | '\\'
        )
}

/// Classifies every character of `render`.
///
/// `starts_in_comment` is the carry-in flag from the previous row; the
/// second element of the result is the carry-out flag for the next row.
/// Without a profile every character is Normal and the carry-out is `false`.
pub fn highlight_line(
    render: &str,
    profile: Option<&Profile>,
    starts_in_comment: bool,
) -> (Vec<Highlight>, bool) {
    let chars: Vec<char> = render.chars().collect();
    let n = chars.len();
    let mut hl = vec![Highlight::Normal; n];

    let Some(profile) = profile else {
        return (hl, false);
    };

    let block = if profile.has_block_comment() {
        Some((
            profile.block_comment_start.unwrap_or(""),
            profile.block_comment_end.unwrap_or(""),
        ))
    } else {
        None
    };

    let mut prev_sep = true;
    let mut in_string: Option<char> = None;
    let mut in_comment = starts_in_comment;
    let mut in_special = false;

    let mut i = 0usize;
    while i < n {
        let c = chars[i];

        if in_string.is_none() && !in_comment {
            if let Some(marker) = profile.line_comment {
                if !marker.is_empty() && matches_at(&chars, i, marker) {
                    hl[i..n].fill(Highlight::Comment);
                    break;
                }
            }
        }

        if let Some((start, end)) = block {
            if in_string.is_none() {
                if in_comment {
                    if matches_at(&chars, i, end) {
                        let len = end.chars().count();
                        hl[i..i + len].fill(Highlight::BlockComment);
                        i += len;
                        in_comment = false;
                        prev_sep = true;
                    } else {
                        hl[i] = Highlight::BlockComment;
                        i += 1;
                    }
                    continue;
                } else if matches_at(&chars, i, start) {
                    let len = start.chars().count();
                    hl[i..i + len].fill(Highlight::BlockComment);
                    i += len;
                    in_comment = true;
                    continue;
                }
            }
        }

        if profile.features.specials {
            if in_special {
                // Special classification runs to the end of the
                // whitespace-delimited word the matched token started.
                if c.is_whitespace() {
                    in_special = false;
                } else {
                    hl[i] = Highlight::Special;
                    i += 1;
                    continue;
                }
            } else if in_string.is_none() && profile.special_marker == Some(c) {
                let mut j = i + 1;
                while j < n && chars[j].is_whitespace() {
                    j += 1;
                }
                let mut matched = None;
                for token in profile.specials {
                    let len = token.chars().count();
                    if matches_at(&chars, j, token) && sep_or_end(&chars, j + len) {
                        matched = Some(len);
                        break;
                    }
                }
                if let Some(len) = matched {
                    hl[i] = Highlight::Special;
                    hl[j..j + len].fill(Highlight::Special);
                    in_special = true;
                    prev_sep = false;
                    i = j + len;
                    continue;
                }
            }
        }

        if profile.features.strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == '\\' && i + 1 < n {
                    // Escaped character never closes the literal.
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                prev_sep = true;
                i += 1;
                continue;
            } else if c == '"' || c == '\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if profile.features.numbers
            && prev_sep
            && (c.is_ascii_digit()
                || (c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit())))
        {
            i = scan_number(&chars, &mut hl, i);
            prev_sep = false;
            continue;
        }

        if prev_sep {
            let mut advanced = None;
            for entry in profile.keywords {
                let (text, tier2) = scribe_lang::keyword_text(entry);
                let len = text.chars().count();
                if matches_at(&chars, i, text) && sep_or_end(&chars, i + len) {
                    let class = if tier2 {
                        Highlight::Keyword2
                    } else {
                        Highlight::Keyword1
                    };
                    hl[i..i + len].fill(class);
                    advanced = Some(len);
                    break;
                }
            }
            if let Some(len) = advanced {
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum Base {
    Decimal,
    Hex,
    Octal,
}

/// Lexes one numeric token starting at `start`, writing classifications into
/// `hl`, and returns the index just past the token.
///
/// The sub-grammar is chosen by the leading characters: `0x`/`0X` is
/// hexadecimal, a leading `0` followed by another digit is octal, anything
/// else is decimal (at most one decimal point). A character violating the
/// sub-grammar classifies the remainder of the token Error, unless the token
/// collects a third decimal point, which downgrades the remainder to Normal.
fn scan_number(chars: &[char], hl: &mut [Highlight], start: usize) -> usize {
    let n = chars.len();
    let mut i = start;
    let mut dots = 0usize;

    let base = if chars[i] == '0' {
        match chars.get(i + 1) {
            Some('x') | Some('X') => Base::Hex,
            Some(d) if d.is_ascii_digit() => Base::Octal,
            _ => Base::Decimal,
        }
    } else {
        Base::Decimal
    };

    if base == Base::Hex {
        hl[i] = Highlight::Number;
        hl[i + 1] = Highlight::Number;
        i += 2;
    }

    while i < n && in_number_token(chars[i]) {
        let c = chars[i];
        let legal = match base {
            Base::Hex => c.is_ascii_hexdigit(),
            Base::Octal => ('0'..='7').contains(&c),
            Base::Decimal => c.is_ascii_digit() || (c == '.' && dots == 0),
        };
        if legal {
            if c == '.' {
                dots += 1;
            }
            hl[i] = Highlight::Number;
            i += 1;
        } else {
            let from = i;
            while i < n && in_number_token(chars[i]) {
                if chars[i] == '.' {
                    dots += 1;
                }
                i += 1;
            }
            let class = if dots > 2 {
                Highlight::Normal
            } else {
                Highlight::Error
            };
            hl[from..i].fill(class);
            break;
        }
    }

    i
}

/// A numeric token runs until the next separator, except that `.` stays part
/// of the token.
fn in_number_token(c: char) -> bool {
    !is_separator(c) || c == '.'
}

fn matches_at(chars: &[char], at: usize, token: &str) -> bool {
    let mut idx = at;
    for tc in token.chars() {
        if chars.get(idx) != Some(&tc) {
            return false;
        }
        idx += 1;
    }
    true
}

fn sep_or_end(chars: &[char], at: usize) -> bool {
    chars.get(at).map_or(true, |&c| is_separator(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Vec<Highlight> {
        highlight_line(text, Some(&scribe_lang::C), false).0
    }

    fn runs(hl: &[Highlight]) -> Vec<(Highlight, usize)> {
        let mut out: Vec<(Highlight, usize)> = Vec::new();
        for &h in hl {
            match out.last_mut() {
                Some((last, count)) if *last == h => *count += 1,
                _ => out.push((h, 1)),
            }
        }
        out
    }

    #[test]
    fn test_no_profile_is_all_normal() {
        let (hl, carry) = highlight_line("int x = 1;", None, true);
        assert!(hl.iter().all(|&h| h == Highlight::Normal));
        assert!(!carry);
    }

    #[test]
    fn test_hex_literal_is_all_number() {
        assert!(classify("0x1F").iter().all(|&h| h == Highlight::Number));
        assert!(classify("0Xab").iter().all(|&h| h == Highlight::Number));
    }

    #[test]
    fn test_octal_violation_marks_remainder_error() {
        assert_eq!(
            runs(&classify("0779")),
            vec![(Highlight::Number, 3), (Highlight::Error, 1)]
        );
    }

    #[test]
    fn test_second_decimal_point_marks_remainder_error() {
        assert_eq!(
            runs(&classify("3.14.1")),
            vec![(Highlight::Number, 4), (Highlight::Error, 2)]
        );
    }

    #[test]
    fn test_third_decimal_point_downgrades_remainder_to_normal() {
        assert_eq!(
            runs(&classify("3.14.1.5")),
            vec![(Highlight::Number, 4), (Highlight::Normal, 4)]
        );
    }

    #[test]
    fn test_number_requires_leading_separator() {
        // 'x' makes "x12" one word; no number token starts inside it.
        assert!(classify("x12").iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn test_leading_dot_number() {
        assert!(classify(".5").iter().all(|&h| h == Highlight::Number));
    }

    #[test]
    fn test_keyword_tiers() {
        let hl = classify("if (x) int");
        assert_eq!(hl[0], Highlight::Keyword1);
        assert_eq!(hl[1], Highlight::Keyword1);
        assert_eq!(hl[2], Highlight::Normal);
        assert_eq!(hl[7], Highlight::Keyword2);
        assert_eq!(hl[9], Highlight::Keyword2);
    }

    #[test]
    fn test_keyword_needs_following_separator() {
        // "iffy" must not match the keyword "if".
        assert!(classify("iffy").iter().all(|&h| h == Highlight::Normal));
        // A keyword at the end of the row matches (end counts as separator).
        assert!(classify("if").iter().all(|&h| h == Highlight::Keyword1));
    }

    #[test]
    fn test_line_comment_consumes_rest_of_row() {
        let hl = classify("a; // if 0x1");
        assert_eq!(hl[0], Highlight::Normal);
        assert!(hl[3..].iter().all(|&h| h == Highlight::Comment));
    }

    #[test]
    fn test_block_comment_within_row() {
        let hl = classify("a /* b */ c");
        assert_eq!(hl[0], Highlight::Normal);
        assert!(hl[2..9].iter().all(|&h| h == Highlight::BlockComment));
        assert_eq!(hl[10], Highlight::Normal);
    }

    #[test]
    fn test_block_comment_carry_out() {
        let (hl, carry) = highlight_line("x /* open", Some(&scribe_lang::C), false);
        assert!(carry);
        assert!(hl[2..].iter().all(|&h| h == Highlight::BlockComment));

        let (hl, carry) = highlight_line("still */ out", Some(&scribe_lang::C), true);
        assert!(!carry);
        assert!(hl[..8].iter().all(|&h| h == Highlight::BlockComment));
        assert_eq!(hl[9], Highlight::Normal);
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let hl = classify(r#""a\"b" x"#);
        assert!(hl[..6].iter().all(|&h| h == Highlight::String));
        assert_eq!(hl[7], Highlight::Normal);
    }

    #[test]
    fn test_comment_markers_ignored_inside_string() {
        let hl = classify(r#""// not a comment""#);
        assert!(hl.iter().all(|&h| h == Highlight::String));
    }

    #[test]
    fn test_special_token_word() {
        let hl = classify("#include <stdio.h>");
        // Marker and token are Special; the next word is not.
        assert_eq!(hl[0], Highlight::Special);
        assert!(hl[1..8].iter().all(|&h| h == Highlight::Special));
        assert!(hl[9..].iter().all(|&h| h != Highlight::Special));
    }

    #[test]
    fn test_special_token_with_gap_after_marker() {
        let hl = classify("#  define X");
        assert_eq!(hl[0], Highlight::Special);
        // The skipped whitespace stays Normal.
        assert_eq!(hl[1], Highlight::Normal);
        assert_eq!(hl[2], Highlight::Normal);
        assert!(hl[3..9].iter().all(|&h| h == Highlight::Special));
    }

    #[test]
    fn test_special_token_order_is_declared_order() {
        // "ifdef" must not be cut short by the earlier "if" entry: "if"
        // fails its following-separator check against 'd'.
        let hl = classify("#ifdef X");
        assert!(hl[..6].iter().all(|&h| h == Highlight::Special));
    }

    #[test]
    fn test_unknown_special_token_is_not_special() {
        let hl = classify("#nonsense");
        assert!(hl.iter().all(|&h| h != Highlight::Special));
    }
}
