//! UI module
//!
//! Draws the interactive reader using Ratatui.

mod help;
mod preview;
mod widgets;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::ReaderState;
use crate::unicode_handler::ellipsize;

/// Main render function - draws the entire UI
pub fn render(frame: &mut Frame, state: &ReaderState) {
    let size = frame.area();

    // Check minimum size
    if size.width < 40 || size.height < 12 {
        render_size_warning(frame, size);
        return;
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    render_title_bar(frame, main_chunks[0], state);
    render_main_content(frame, main_chunks[1], state);
    render_status_bar(frame, main_chunks[2], state);

    if state.show_help {
        help::render_help_overlay(frame, size);
    }
}

/// Render warning when terminal is too small
fn render_size_warning(frame: &mut Frame, area: Rect) {
    let warning = Paragraph::new("Terminal too small!\nMinimum: 40x12")
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(warning, area);
}

fn render_title_bar(frame: &mut Frame, area: Rect, state: &ReaderState) {
    let title = Line::from(vec![
        Span::styled(
            " Readable ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(
            ellipsize(&state.title, area.width.saturating_sub(30) as usize),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    let hints = Line::from(vec![
        Span::styled("[?]", Style::default().fg(Color::Green)),
        Span::raw(" Help  "),
        Span::styled("[Q]", Style::default().fg(Color::Red)),
        Span::raw(" Quit "),
    ])
    .right_aligned();

    let bar_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    frame.render_widget(Paragraph::new(title).style(bar_style), area);
    frame.render_widget(Paragraph::new(hints).style(bar_style), area);
}

/// Settings beside the text on wide terminals, above it on narrow ones
fn render_main_content(frame: &mut Frame, area: Rect, state: &ReaderState) {
    let chunks = if area.width >= 80 {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(40)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(5)])
            .split(area)
    };

    widgets::render_style_controls(frame, chunks[0], state);
    preview::render_reader(frame, chunks[1], state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &ReaderState) {
    let status_color = if state.status_is_error {
        Color::Red
    } else {
        Color::White
    };

    let info = format!(
        "{} │ Render: {:>3}ms ",
        state.capabilities.color_support.name(),
        state.last_render_time_ms
    );

    let status = Line::from(vec![
        Span::raw(" "),
        Span::styled(state.status_message.clone(), Style::default().fg(status_color)),
    ]);
    let info = Line::from(Span::styled(info, Style::default().fg(Color::DarkGray))).right_aligned();

    let bar_style = Style::default().bg(Color::Black).fg(Color::White);
    frame.render_widget(Paragraph::new(status).style(bar_style), area);
    frame.render_widget(Paragraph::new(info), area);
}
