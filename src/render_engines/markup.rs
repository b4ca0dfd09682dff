//! Bold-markup parsing
//!
//! Only needed at the boundary where a renderer is handed the markup string
//! instead of spans. Anything that does not parse cleanly back into the
//! source text is replaced by the unmarked source, so raw delimiters never
//! reach the screen.

use log::warn;
use thiserror::Error;

use crate::render_engines::bionic::BOLD_DELIMITER;
use crate::render_engines::styler::Segment;

/// Why a markup string could not be turned into spans
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("bold span opened at byte {offset} is never closed")]
    UnclosedBold { offset: usize },

    #[error("empty bold span at byte {offset}")]
    EmptyBold { offset: usize },

    #[error("parsed text does not match the source text")]
    TextMismatch,
}

fn push_segment(segments: &mut Vec<Segment>, text: &str, bold: bool) {
    if text.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(text),
        _ => segments.push(Segment {
            text: text.to_string(),
            bold,
        }),
    }
}

/// Parse `**bold**` delimited text into alternating spans
pub fn parse_bold_markup(markup: &str) -> Result<Vec<Segment>, MarkupError> {
    let mut segments = Vec::new();
    let mut bold = false;
    let mut open_at = 0;
    let mut offset = 0;
    let mut rest = markup;

    while let Some(pos) = rest.find(BOLD_DELIMITER) {
        let chunk = &rest[..pos];
        if bold && chunk.is_empty() {
            return Err(MarkupError::EmptyBold { offset: open_at });
        }
        push_segment(&mut segments, chunk, bold);
        if !bold {
            open_at = offset + pos;
        }
        bold = !bold;
        offset += pos + BOLD_DELIMITER.len();
        rest = &rest[pos + BOLD_DELIMITER.len()..];
    }

    if bold {
        return Err(MarkupError::UnclosedBold { offset: open_at });
    }
    push_segment(&mut segments, rest, false);

    Ok(segments)
}

/// Parse markup and check it spells out exactly `original`
pub fn parse_against_source(markup: &str, original: &str) -> Result<Vec<Segment>, MarkupError> {
    let segments = parse_bold_markup(markup)?;
    let mut remaining = original;
    for segment in &segments {
        remaining = remaining
            .strip_prefix(segment.text.as_str())
            .ok_or(MarkupError::TextMismatch)?;
    }
    if !remaining.is_empty() {
        return Err(MarkupError::TextMismatch);
    }
    Ok(segments)
}

/// Spans for `markup`, or the whole of `original` as plain text
///
/// Never fails. A parse failure is logged and the caller gets something
/// readable.
pub fn segments_or_plain(markup: &str, original: &str) -> Vec<Segment> {
    match parse_against_source(markup, original) {
        Ok(segments) => segments,
        Err(err) => {
            warn!("bold markup rejected, showing plain text: {}", err);
            if original.is_empty() {
                Vec::new()
            } else {
                vec![Segment::plain(original)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_engines::bionic::apply_bionic_markup;

    #[test]
    fn test_parse_simple() {
        let segments = parse_bold_markup("**he**llo **wo**rld").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::bold("he"),
                Segment::plain("llo "),
                Segment::bold("wo"),
                Segment::plain("rld"),
            ]
        );
    }

    #[test]
    fn test_parse_plain_only() {
        assert_eq!(
            parse_bold_markup("no markup").unwrap(),
            vec![Segment::plain("no markup")]
        );
        assert!(parse_bold_markup("").unwrap().is_empty());
    }

    #[test]
    fn test_unclosed() {
        assert_eq!(
            parse_bold_markup("ok **broken"),
            Err(MarkupError::UnclosedBold { offset: 3 })
        );
    }

    #[test]
    fn test_empty_bold() {
        assert_eq!(
            parse_bold_markup("a****b"),
            Err(MarkupError::EmptyBold { offset: 1 })
        );
    }

    #[test]
    fn test_single_star_in_tail_survives() {
        // "a*b" -> "**a***b"
        let markup = apply_bionic_markup("a*b");
        let segments = parse_against_source(&markup, "a*b").unwrap();
        assert_eq!(segments, vec![Segment::bold("a"), Segment::plain("*b")]);
    }

    #[test]
    fn test_source_with_delimiters_falls_back() {
        let source = "x**y";
        let markup = apply_bionic_markup(source);
        assert!(parse_against_source(&markup, source).is_err());
        assert_eq!(segments_or_plain(&markup, source), vec![Segment::plain(source)]);
    }

    #[test]
    fn test_silent_text_loss_is_caught() {
        // parses cleanly, but drops the source's own delimiters
        let source = "abcd**ef**";
        let markup = apply_bionic_markup(source);
        assert!(parse_bold_markup(&markup).is_ok());
        assert_eq!(
            parse_against_source(&markup, source),
            Err(MarkupError::TextMismatch)
        );
    }

    #[test]
    fn test_fallback_of_empty_source() {
        assert!(segments_or_plain("**", "").is_empty());
    }
}
