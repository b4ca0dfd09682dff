//! Reading pane

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use crate::render_engines::tui::{base_style, to_text};
use crate::state::ReaderState;

/// Render the styled document with scrolling
pub fn render_reader(frame: &mut Frame, area: Rect, state: &ReaderState) {
    let Some(doc) = state.document() else {
        render_placeholder(frame, area, "Rendering…");
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} · {}pt ", doc.font.name(), doc.font_size as i32),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if doc.is_empty() {
        render_placeholder(frame, inner, "Empty document");
        return;
    }

    let widget = Paragraph::new(to_text(doc))
        .style(base_style(doc))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(widget, inner);

    let total_rows = state.content_rows();
    let visible_rows = inner.height as usize;
    if total_rows > visible_rows {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_rows)
            .position(state.scroll)
            .viewport_content_length(visible_rows);

        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, message: &str) {
    let widget = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}
