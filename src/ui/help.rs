//! Help overlay rendering

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Key bindings grouped by section
const KEY_HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "General",
        &[
            ("Q Esc", "Quit"),
            ("?", "Toggle help overlay"),
            ("C", "Copy text to clipboard"),
        ],
    ),
    (
        "Style",
        &[
            ("↑ ↓ Tab", "Select setting"),
            ("← → + -", "Adjust selected setting"),
            ("Space B", "Toggle bionic reading"),
        ],
    ),
    (
        "Reading",
        &[
            ("J K", "Scroll by line"),
            ("PgUp PgDn", "Scroll by page"),
            ("Home End", "Jump to top/bottom"),
        ],
    ),
];

const KEY_COLUMN: usize = 12;

/// Render the help overlay centered over `area`
pub fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let lines = help_lines();
    // content plus borders
    let wanted_height = lines.len() as u16 + 2;
    let overlay = centered(area, area.width.min(56), area.height.min(wanted_height));

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().fg(Color::White)),
        overlay,
    );
}

fn help_lines() -> Vec<Line<'static>> {
    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Green);

    let mut lines = Vec::new();
    for (i, (section, bindings)) in KEY_HELP.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(*section, section_style)));
        for (keys, action) in bindings.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<width$}", keys, width = KEY_COLUMN), key_style),
                Span::raw(*action),
            ]));
        }
    }
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            "[Press ? or Esc to close]",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    );
    lines
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered(area, 56, 20);
        assert_eq!(rect, Rect::new(22, 10, 56, 20));
    }

    #[test]
    fn test_every_binding_listed() {
        let bindings: usize = KEY_HELP.iter().map(|(_, keys)| keys.len()).sum();
        // section titles, blank separators and the closing hint
        let expected = bindings + KEY_HELP.len() + (KEY_HELP.len() - 1) + 2;
        assert_eq!(help_lines().len(), expected);
    }
}
