//! HTML export
//!
//! One block element carries every uniform property; bold spans become `<b>`
//! so a browser only changes their weight.

use crate::render_engines::styler::StyledDocument;

/// Escape text for use inside HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render `doc` as a self-contained HTML fragment
pub fn render_html(doc: &StyledDocument) -> String {
    let mut html = format!(
        "<div class=\"readable\" style=\"font-family: &#39;{}&#39;; font-size: {}px; \
         letter-spacing: {}px; line-height: calc(1em + {}px); color: {}; \
         background-color: {}; white-space: pre-wrap;\">",
        escape_html(doc.font.name()),
        doc.font_size,
        doc.letter_spacing,
        doc.line_spacing,
        doc.text_color.to_hex(),
        doc.background_color.to_hex(),
    );

    for segment in &doc.segments {
        if segment.bold {
            html.push_str("<b>");
            html.push_str(&escape_html(&segment.text));
            html.push_str("</b>");
        } else {
            html.push_str(&escape_html(&segment.text));
        }
    }

    html.push_str("</div>");
    html
}

/// Wrap a fragment in a minimal standalone page
pub fn html_page(title: &str, doc: &StyledDocument) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n\
         <body style=\"margin: 0; background-color: {};\">\n{}\n</body>\n</html>\n",
        escape_html(title),
        doc.background_color.to_hex(),
        render_html(doc)
    )
}
