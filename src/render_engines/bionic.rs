//! Bionic reading transform
//!
//! Bolds the leading half of every word. Words are separated by the literal
//! space character only; tabs and newlines stay inside their word, and runs
//! of spaces survive unchanged because empty tokens are passed through.

use crate::render_engines::styler::Segment;
use crate::unicode_handler::{grapheme_count, split_at_grapheme};

/// Emphasis delimiter understood by simple markup renderers
pub const BOLD_DELIMITER: &str = "**";

/// Number of leading grapheme clusters of `word` that are bolded
///
/// Always at least 1, so a one-character word is bolded entirely.
pub fn bionic_cut(word: &str) -> usize {
    (grapheme_count(word) / 2).max(1)
}

/// Split a non-empty word into its bold head and plain tail
pub fn split_word(word: &str) -> (&str, &str) {
    split_at_grapheme(word, bionic_cut(word))
}

/// Wrap the leading half of every word in bold markup
///
/// The result must only ever be produced from unmarked source text: running
/// it again over its own output re-splits on the delimiter characters.
pub fn apply_bionic_markup(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + text.len() / 2);

    for (i, word) in text.split(' ').enumerate() {
        if i > 0 {
            output.push(' ');
        }
        if word.is_empty() {
            continue;
        }
        let (head, tail) = split_word(word);
        output.push_str(BOLD_DELIMITER);
        output.push_str(head);
        output.push_str(BOLD_DELIMITER);
        output.push_str(tail);
    }

    output
}

/// Produce bold/plain spans directly, without a markup round trip
///
/// Adjacent plain runs (a word tail, the separating spaces) are merged, so
/// segments strictly alternate between bold and plain. Concatenating the
/// segment texts reproduces `text` exactly.
pub fn bionic_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain = String::new();

    for (i, word) in text.split(' ').enumerate() {
        if i > 0 {
            plain.push(' ');
        }
        if word.is_empty() {
            continue;
        }
        let (head, tail) = split_word(word);
        if !plain.is_empty() {
            segments.push(Segment::plain(std::mem::take(&mut plain)));
        }
        segments.push(Segment::bold(head));
        plain.push_str(tail);
    }

    if !plain.is_empty() {
        segments.push(Segment::plain(plain));
    }

    segments
}
