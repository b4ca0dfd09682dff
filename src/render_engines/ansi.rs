//! Terminal renderer
//!
//! Paints a [`StyledDocument`] with ANSI SGR sequences. A terminal cell grid
//! has no font size or kerning, so only weight, colors and line spacing are
//! represented. Line spacing becomes blank rows.

use crate::color_space::{format_bg_color, format_fg_color, ANSI_BOLD, ANSI_NORMAL, ANSI_RESET};
use crate::render_engines::styler::StyledDocument;
use crate::terminal_capabilities::ColorSupport;

/// Line spacing points that make up one blank terminal row
pub const POINTS_PER_ROW: f32 = 10.0;

/// Blank rows inserted between lines for a given line spacing
pub fn spacing_rows(line_spacing: f32) -> usize {
    if line_spacing.is_nan() || line_spacing <= 0.0 {
        return 0;
    }
    (line_spacing / POINTS_PER_ROW).floor() as usize
}

/// Render `doc` as an ANSI-escaped string
pub fn render_ansi(doc: &StyledDocument, support: ColorSupport) -> String {
    let lines = doc.lines();
    if lines.is_empty() {
        return String::new();
    }

    let colors = format!(
        "{}{}",
        format_bg_color(doc.background_color, support),
        format_fg_color(doc.text_color, support)
    );
    let gap = spacing_rows(doc.line_spacing);
    let mut output = String::with_capacity(doc.plain_text().len() * 2);

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            output.push('\n');
            for _ in 0..gap {
                output.push('\n');
            }
        }
        output.push_str(&colors);
        for segment in line {
            if segment.bold {
                output.push_str(ANSI_BOLD);
                output.push_str(&segment.text);
                output.push_str(ANSI_NORMAL);
            } else {
                output.push_str(&segment.text);
            }
        }
        output.push_str(ANSI_RESET);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_engines::styler::render;
    use crate::style::StyleConfig;

    #[test]
    fn test_spacing_rows() {
        assert_eq!(spacing_rows(0.0), 0);
        assert_eq!(spacing_rows(5.0), 0);
        assert_eq!(spacing_rows(10.0), 1);
        assert_eq!(spacing_rows(30.0), 3);
        assert_eq!(spacing_rows(f32::NAN), 0);
    }

    #[test]
    fn test_empty_renders_nothing() {
        let doc = render("", &StyleConfig::default());
        assert_eq!(render_ansi(&doc, ColorSupport::TrueColor), "");
    }

    #[test]
    fn test_bold_only_changes_weight() {
        let doc = render("hello", &StyleConfig::default().with_bionic(true));
        let output = render_ansi(&doc, ColorSupport::NoColor);
        assert_eq!(output, "\x1b[1mhe\x1b[22mllo\x1b[0m");
    }

    #[test]
    fn test_multi_line_snapshot() {
        // the newline does not end a word, so "there\nok" is cut as one
        let doc = render("hi there\nok", &StyleConfig::default().with_bionic(true));
        let output = render_ansi(&doc, ColorSupport::NoColor).replace('\x1b', "^[");
        insta::assert_snapshot!(output, @r"
        ^[[1mh^[[22mi ^[[1mther^[[22me^[[0m
        ok^[[0m
        ");
    }

    #[test]
    fn test_colors_and_spacing() {
        let config = StyleConfig::default()
            .with_line_spacing(20.0)
            .with_background_color_index(1);
        let doc = render("a\nb", &config);
        let output = render_ansi(&doc, ColorSupport::TrueColor);
        let prefix = "\x1b[48;2;247;242;237m\x1b[38;2;0;0;0m";
        assert_eq!(output, format!("{prefix}a\x1b[0m\n\n\n{prefix}b\x1b[0m"));
    }
}
