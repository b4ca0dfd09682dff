//! Reader state management
//!
//! Everything the interactive reader shows: the document, the style being
//! edited, the newest finished render and the status line. Rendering itself
//! happens on the worker; this state only asks for it and accepts results.

use crate::palette::Palette;
use crate::render_engines::ansi::spacing_rows;
use crate::render_engines::styler::StyledDocument;
use crate::style::StyleConfig;
use crate::terminal_capabilities::TerminalCapabilities;
use crate::worker::{LatestRender, RenderResponse};

/// Main reader state
pub struct ReaderState {
    pub title: String,
    pub text: String,
    pub config: StyleConfig,
    pub backgrounds: Palette,
    pub text_colors: Palette,

    pub selected_setting: usize,
    pub show_help: bool,
    pub should_quit: bool,

    pub scroll: usize,
    pub status_message: String,
    pub status_is_error: bool,

    pub terminal_size: (u16, u16),
    pub capabilities: TerminalCapabilities,

    pub last_render_time_ms: u64,
    latest: LatestRender,
    render_requested: bool,
    preferences_changed: bool,
}

impl ReaderState {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        config: StyleConfig,
        (backgrounds, text_colors): (Palette, Palette),
        capabilities: TerminalCapabilities,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            config,
            backgrounds,
            text_colors,
            selected_setting: 0,
            show_help: false,
            should_quit: false,
            scroll: 0,
            status_message: "Ready - Press [?] for help".to_string(),
            status_is_error: false,
            terminal_size: capabilities.size,
            capabilities,
            last_render_time_ms: 0,
            latest: LatestRender::new(),
            // the first frame needs a document
            render_requested: true,
            preferences_changed: false,
        }
    }

    /// Update terminal size on resize
    pub fn set_terminal_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }

    /// Set status message
    pub fn set_status(&mut self, message: &str, is_error: bool) {
        self.status_message = message.to_string();
        self.status_is_error = is_error;
    }

    /// Newest finished render, if any
    pub fn document(&self) -> Option<&StyledDocument> {
        self.latest.document()
    }

    pub fn trigger_render(&mut self) {
        self.render_requested = true;
    }

    /// Whether a render should be submitted; clears the request
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    /// Whether the style changed since the last call; clears the flag
    pub fn take_preferences_changed(&mut self) -> bool {
        std::mem::take(&mut self.preferences_changed)
    }

    /// Accept a worker result unless a newer one is already shown
    pub fn handle_render_response(&mut self, response: RenderResponse) {
        let render_time = response.render_time;
        if self.latest.accept(response) {
            self.last_render_time_ms = render_time;
            self.scroll = self.scroll.min(self.max_scroll());
        }
    }

    /// Select next setting
    pub fn next_setting(&mut self) {
        let count = StyleConfig::settings_count();
        self.selected_setting = (self.selected_setting + 1) % count;
    }

    /// Select previous setting
    pub fn prev_setting(&mut self) {
        let count = StyleConfig::settings_count();
        self.selected_setting = if self.selected_setting == 0 {
            count - 1
        } else {
            self.selected_setting - 1
        };
    }

    /// Step the selected setting up or down
    pub fn adjust_selected(&mut self, forward: bool) {
        let config = &mut self.config;
        match self.selected_setting {
            0 if forward => config.next_font(),
            0 => config.prev_font(),
            1 if forward => config.increase_font_size(),
            1 => config.decrease_font_size(),
            2 if forward => config.increase_letter_spacing(),
            2 => config.decrease_letter_spacing(),
            3 if forward => config.increase_line_spacing(),
            3 => config.decrease_line_spacing(),
            4 => config.toggle_bionic(),
            5 => {
                let index = cycle_index(config.background_color_index(), self.backgrounds.len(), forward);
                config.set_background_color_index(index);
            }
            6 => {
                let index = cycle_index(config.text_color_index(), self.text_colors.len(), forward);
                config.set_text_color_index(index);
            }
            _ => return,
        }

        let index = self.selected_setting;
        let message = format!(
            "{}: {}",
            self.config.setting_name(index),
            self.config.setting_value(index)
        );
        self.set_status(&message, false);
        self.style_changed();
    }

    pub fn toggle_bionic(&mut self) {
        self.config.toggle_bionic();
        let message = format!("Bionic: {}", self.config.setting_value(4));
        self.set_status(&message, false);
        self.style_changed();
    }

    fn style_changed(&mut self) {
        self.preferences_changed = true;
        self.trigger_render();
    }

    /// Rows the current document occupies before wrapping
    pub fn content_rows(&self) -> usize {
        match self.document() {
            Some(doc) => {
                let lines = doc.lines().len();
                lines + lines.saturating_sub(1) * spacing_rows(doc.line_spacing)
            }
            None => 0,
        }
    }

    fn max_scroll(&self) -> usize {
        self.content_rows().saturating_sub(1)
    }

    /// Scroll reader up
    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll = self.scroll.saturating_sub(amount);
    }

    /// Scroll reader down
    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll = (self.scroll + amount).min(self.max_scroll());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    /// Rows moved by a page scroll
    pub fn page_size(&self) -> usize {
        (self.terminal_size.1 as usize).saturating_sub(4).max(1)
    }
}

/// Step through `0..len`, wrapping; an out-of-range start goes to 0
fn cycle_index(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 || current >= len {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}
