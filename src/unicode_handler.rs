//! Unicode width and grapheme utilities
//!
//! Word lengths are measured in extended grapheme clusters so that a cut
//! never lands inside a combined character or emoji sequence.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Calculate the display width of a string
///
/// Takes into account East Asian Wide/Fullwidth characters.
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Count grapheme clusters in a string
pub fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Split a string after its first `count` grapheme clusters
///
/// Returns `(head, tail)`. A `count` past the end yields `(s, "")`.
pub fn split_at_grapheme(s: &str, count: usize) -> (&str, &str) {
    match s.grapheme_indices(true).nth(count) {
        Some((byte_idx, _)) => s.split_at(byte_idx),
        None => (s, ""),
    }
}

/// Truncate a string to fit within a maximum display width
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for grapheme in s.graphemes(true) {
        let grapheme_width = grapheme.width();
        if current_width + grapheme_width > max_width {
            break;
        }
        result.push_str(grapheme);
        current_width += grapheme_width;
    }

    result
}

/// Shorten a string for one-line listings, appending an ellipsis when cut
pub fn ellipsize(s: &str, max_width: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    if display_width(first_line) <= max_width && first_line.len() == s.len() {
        return first_line.to_string();
    }
    let mut short = truncate_to_width(first_line, max_width.saturating_sub(1));
    short.push('…');
    short
}
