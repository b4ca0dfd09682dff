//! Input handling
//!
//! Maps keyboard events to reader state transitions.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::state::ReaderState;

/// Handle an input event
pub fn handle_event(event: Event, state: &mut ReaderState) -> Result<()> {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key_event(key_event, state)
        }
        Event::Resize(width, height) => {
            state.set_terminal_size(width, height);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Handle a key event
fn handle_key_event(key: KeyEvent, state: &mut ReaderState) -> Result<()> {
    if state.show_help {
        return handle_help_input(key, state);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => state.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.should_quit = true
        }
        KeyCode::Char('?') => state.show_help = true,

        // Settings
        KeyCode::Up => state.prev_setting(),
        KeyCode::Down | KeyCode::Tab => state.next_setting(),
        KeyCode::BackTab => state.prev_setting(),
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => state.adjust_selected(true),
        KeyCode::Left | KeyCode::Char('-') => state.adjust_selected(false),
        KeyCode::Char(' ') | KeyCode::Char('b') => state.toggle_bionic(),

        // Reading
        KeyCode::Char('j') => state.scroll_down(1),
        KeyCode::Char('k') => state.scroll_up(1),
        KeyCode::PageDown => state.scroll_down(state.page_size()),
        KeyCode::PageUp => state.scroll_up(state.page_size()),
        KeyCode::Home => state.scroll_to_top(),
        KeyCode::End => state.scroll_to_bottom(),

        KeyCode::Char('c') | KeyCode::Char('C') => copy_to_clipboard(state),
        _ => {}
    }
    Ok(())
}

/// Handle input when help overlay is shown
fn handle_help_input(key: KeyEvent, state: &mut ReaderState) -> Result<()> {
    match key.code {
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Enter => {
            state.show_help = false;
        }
        _ => {}
    }
    Ok(())
}

/// Copy the shown text, with bold markup when bionic mode is on
fn copy_to_clipboard(state: &mut ReaderState) {
    let Some(content) = state.document().map(|doc| doc.to_markup()) else {
        state.set_status("Nothing to copy yet", false);
        return;
    };

    match arboard::Clipboard::new() {
        Ok(mut clipboard) => match clipboard.set_text(content) {
            Ok(_) => state.set_status("Copied to clipboard", false),
            Err(e) => state.set_status(&format!("Copy failed: {}", e), true),
        },
        Err(e) => state.set_status(&format!("Clipboard unavailable: {}", e), true),
    }
}
