//! Ratatui adapter
//!
//! Converts a [`StyledDocument`] into a `Text` that any ratatui widget
//! (usually a `Paragraph`) can draw.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

use crate::color_space::Rgb;
use crate::render_engines::ansi::spacing_rows;
use crate::render_engines::styler::StyledDocument;

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Base style shared by every span of the document
pub fn base_style(doc: &StyledDocument) -> Style {
    Style::default()
        .fg(to_color(doc.text_color))
        .bg(to_color(doc.background_color))
}

/// Build ratatui text, one `Line` per source line plus spacing rows
pub fn to_text(doc: &StyledDocument) -> Text<'static> {
    let base = base_style(doc);
    let bold = base.add_modifier(Modifier::BOLD);
    let gap = spacing_rows(doc.line_spacing);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (i, segments) in doc.lines().into_iter().enumerate() {
        if i > 0 {
            lines.extend((0..gap).map(|_| Line::default()));
        }
        let spans: Vec<Span<'static>> = segments
            .into_iter()
            .map(|s| Span::styled(s.text, if s.bold { bold } else { base }))
            .collect();
        lines.push(Line::from(spans));
    }

    Text::from(lines).style(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_engines::styler::render;
    use crate::style::StyleConfig;

    #[test]
    fn test_bold_spans() {
        let doc = render("hello world", &StyleConfig::default().with_bionic(true));
        let text = to_text(&doc);
        assert_eq!(text.lines.len(), 1);
        let spans = &text.lines[0].spans;
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].content, "he");
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_line_spacing_rows() {
        let config = StyleConfig::default().with_line_spacing(10.0);
        let doc = render("one\ntwo\nthree", &config);
        // three lines plus one blank row between each pair
        assert_eq!(to_text(&doc).lines.len(), 5);
    }

    #[test]
    fn test_colors_applied() {
        let doc = render("ink", &StyleConfig::default());
        let text = to_text(&doc);
        assert_eq!(text.style.fg, Some(Color::Rgb(0, 0, 0)));
        assert_eq!(text.style.bg, Some(Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_empty() {
        let doc = render("", &StyleConfig::default());
        assert!(to_text(&doc).lines.is_empty());
    }
}
