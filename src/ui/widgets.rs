//! Style control panel

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::color_space::Rgb;
use crate::state::ReaderState;
use crate::style::StyleConfig;

/// Render the settings list with the selected row highlighted
pub fn render_style_controls(frame: &mut Frame, area: Rect, state: &ReaderState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Settings ",
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let config = &state.config;
    let lines: Vec<Line> = (0..StyleConfig::settings_count())
        .map(|index| {
            let swatch = match index {
                5 => Some(state.backgrounds.resolve(config.background_color_index())),
                6 => Some(state.text_colors.resolve(config.text_color_index())),
                _ => None,
            };
            create_setting_line(
                config.setting_name(index),
                &config.setting_value(index),
                index == state.selected_setting,
                swatch,
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Create a setting line with label, value and an optional color swatch
fn create_setting_line(
    label: &str,
    value: &str,
    is_selected: bool,
    swatch: Option<Rgb>,
) -> Line<'static> {
    let indicator = if is_selected { "▸" } else { " " };

    let label_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let value_style = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(format!("{} ", indicator), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(value.to_string(), value_style),
    ];

    if let Some(color) = swatch {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            "██",
            Style::default().fg(Color::Rgb(color.r, color.g, color.b)),
        ));
    }

    Line::from(spans)
}
