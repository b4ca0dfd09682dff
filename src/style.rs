//! Display preferences
//!
//! `StyleConfig` is an immutable-by-convention snapshot of how text should
//! look. Every numeric field is clamped when it is set, so a value read back
//! is always inside its range.

use std::ops::RangeInclusive;

use log::debug;

/// Fonts offered to the reader, in selection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontChoice {
    #[default]
    ComicSansMs,
    ArialRoundedMtBold,
    HelveticaNeue,
}

impl FontChoice {
    pub fn name(&self) -> &'static str {
        match self {
            FontChoice::ComicSansMs => "Comic Sans MS",
            FontChoice::ArialRoundedMtBold => "Arial Rounded MT Bold",
            FontChoice::HelveticaNeue => "Helvetica Neue",
        }
    }

    pub fn all() -> &'static [FontChoice] {
        &ALL_FONTS[..]
    }

    /// Position in [`FontChoice::all`]
    pub fn index(&self) -> usize {
        Self::all().iter().position(|f| f == self).unwrap_or(0)
    }

    /// Font at `index`, or the first font when the index is unknown
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

static ALL_FONTS: [FontChoice; 3] = [
    FontChoice::ComicSansMs,
    FontChoice::ArialRoundedMtBold,
    FontChoice::HelveticaNeue,
];

pub const FONT_SIZE_RANGE: RangeInclusive<f32> = 10.0..=72.0;
pub const LETTER_SPACING_RANGE: RangeInclusive<f32> = 0.0..=10.0;
pub const LINE_SPACING_RANGE: RangeInclusive<f32> = 0.0..=30.0;

pub const DEFAULT_FONT_SIZE: f32 = 18.0;
pub const DEFAULT_LETTER_SPACING: f32 = 0.0;
pub const DEFAULT_LINE_SPACING: f32 = 5.0;

/// Increment used by the `increase_*` / `decrease_*` helpers
pub const SPACING_STEP: f32 = 1.0;

fn clamp_to(value: f32, range: &RangeInclusive<f32>, fallback: f32, field: &str) -> f32 {
    if value.is_nan() {
        debug!("{} is NaN, using {}", field, fallback);
        return fallback;
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        debug!("{} {} clamped to {}", field, value, clamped);
    }
    clamped
}

/// Snapshot of display preferences
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    font: FontChoice,
    font_size: f32,
    letter_spacing: f32,
    line_spacing: f32,
    bionic: bool,
    background_color_index: usize,
    text_color_index: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font: FontChoice::default(),
            font_size: DEFAULT_FONT_SIZE,
            letter_spacing: DEFAULT_LETTER_SPACING,
            line_spacing: DEFAULT_LINE_SPACING,
            bionic: false,
            background_color_index: 0,
            text_color_index: 0,
        }
    }
}

impl StyleConfig {
    pub fn font(&self) -> FontChoice {
        self.font
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn letter_spacing(&self) -> f32 {
        self.letter_spacing
    }

    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    pub fn bionic(&self) -> bool {
        self.bionic
    }

    pub fn background_color_index(&self) -> usize {
        self.background_color_index
    }

    pub fn text_color_index(&self) -> usize {
        self.text_color_index
    }

    pub fn set_font(&mut self, font: FontChoice) {
        self.font = font;
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = clamp_to(size, &FONT_SIZE_RANGE, DEFAULT_FONT_SIZE, "font_size");
    }

    pub fn set_letter_spacing(&mut self, spacing: f32) {
        self.letter_spacing = clamp_to(
            spacing,
            &LETTER_SPACING_RANGE,
            DEFAULT_LETTER_SPACING,
            "letter_spacing",
        );
    }

    pub fn set_line_spacing(&mut self, spacing: f32) {
        self.line_spacing = clamp_to(
            spacing,
            &LINE_SPACING_RANGE,
            DEFAULT_LINE_SPACING,
            "line_spacing",
        );
    }

    pub fn set_bionic(&mut self, enabled: bool) {
        self.bionic = enabled;
    }

    /// Any index is accepted; palettes resolve unknown ones to their default
    pub fn set_background_color_index(&mut self, index: usize) {
        self.background_color_index = index;
    }

    pub fn set_text_color_index(&mut self, index: usize) {
        self.text_color_index = index;
    }

    // Builder-style variants for constructing snapshots in one expression

    pub fn with_font(mut self, font: FontChoice) -> Self {
        self.set_font(font);
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.set_font_size(size);
        self
    }

    pub fn with_letter_spacing(mut self, spacing: f32) -> Self {
        self.set_letter_spacing(spacing);
        self
    }

    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.set_line_spacing(spacing);
        self
    }

    pub fn with_bionic(mut self, enabled: bool) -> Self {
        self.set_bionic(enabled);
        self
    }

    pub fn with_background_color_index(mut self, index: usize) -> Self {
        self.set_background_color_index(index);
        self
    }

    pub fn with_text_color_index(mut self, index: usize) -> Self {
        self.set_text_color_index(index);
        self
    }

    pub fn next_font(&mut self) {
        self.font = self.font.next();
    }

    pub fn prev_font(&mut self) {
        self.font = self.font.prev();
    }

    pub fn increase_font_size(&mut self) {
        self.set_font_size(self.font_size + SPACING_STEP);
    }

    pub fn decrease_font_size(&mut self) {
        self.set_font_size(self.font_size - SPACING_STEP);
    }

    pub fn increase_letter_spacing(&mut self) {
        self.set_letter_spacing(self.letter_spacing + SPACING_STEP);
    }

    pub fn decrease_letter_spacing(&mut self) {
        self.set_letter_spacing(self.letter_spacing - SPACING_STEP);
    }

    pub fn increase_line_spacing(&mut self) {
        self.set_line_spacing(self.line_spacing + SPACING_STEP);
    }

    pub fn decrease_line_spacing(&mut self) {
        self.set_line_spacing(self.line_spacing - SPACING_STEP);
    }

    pub fn toggle_bionic(&mut self) {
        self.bionic = !self.bionic;
    }

    pub fn settings_count() -> usize {
        7
    }

    pub fn setting_name(&self, index: usize) -> &'static str {
        match index {
            0 => "Font",
            1 => "Size",
            2 => "Letter Spacing",
            3 => "Line Spacing",
            4 => "Bionic",
            5 => "Background",
            6 => "Text Color",
            _ => "Unknown",
        }
    }

    pub fn setting_value(&self, index: usize) -> String {
        match index {
            0 => self.font.name().to_string(),
            1 => format!("{}", self.font_size as i32),
            2 => format!("{}", self.letter_spacing as i32),
            3 => format!("{}", self.line_spacing as i32),
            4 => if self.bionic { "On" } else { "Off" }.to_string(),
            5 => format!("#{}", self.background_color_index),
            6 => format!("#{}", self.text_color_index),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_cycling() {
        let font = FontChoice::ComicSansMs;
        assert_eq!(font.next(), FontChoice::ArialRoundedMtBold);
        assert_eq!(font.prev(), FontChoice::HelveticaNeue);
        assert_eq!(FontChoice::HelveticaNeue.next(), FontChoice::ComicSansMs);
    }

    #[test]
    fn test_font_from_index() {
        assert_eq!(FontChoice::from_index(1), FontChoice::ArialRoundedMtBold);
        assert_eq!(FontChoice::from_index(42), FontChoice::ComicSansMs);
        for font in FontChoice::all() {
            assert_eq!(FontChoice::from_index(font.index()), *font);
        }
    }

    #[test]
    fn test_defaults() {
        let config = StyleConfig::default();
        assert_eq!(config.font_size(), 18.0);
        assert_eq!(config.letter_spacing(), 0.0);
        assert_eq!(config.line_spacing(), 5.0);
        assert!(!config.bionic());
    }

    #[test]
    fn test_clamping_at_mutation() {
        let mut config = StyleConfig::default();
        config.set_font_size(200.0);
        assert_eq!(config.font_size(), 72.0);
        config.set_font_size(1.0);
        assert_eq!(config.font_size(), 10.0);
        config.set_letter_spacing(-3.0);
        assert_eq!(config.letter_spacing(), 0.0);
        config.set_line_spacing(31.0);
        assert_eq!(config.line_spacing(), 30.0);
        config.set_line_spacing(12.5);
        assert_eq!(config.line_spacing(), 12.5);
    }

    #[test]
    fn test_nan_falls_back_to_default() {
        let config = StyleConfig::default().with_font_size(f32::NAN);
        assert_eq!(config.font_size(), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_steps_stop_at_bounds() {
        let mut config = StyleConfig::default().with_font_size(72.0);
        config.increase_font_size();
        assert_eq!(config.font_size(), 72.0);
        config.decrease_font_size();
        assert_eq!(config.font_size(), 71.0);

        let mut config = StyleConfig::default();
        config.decrease_letter_spacing();
        assert_eq!(config.letter_spacing(), 0.0);
        config.increase_line_spacing();
        assert_eq!(config.line_spacing(), 6.0);
    }

    #[test]
    fn test_setting_rows() {
        let config = StyleConfig::default().with_bionic(true);
        assert_eq!(config.setting_name(0), "Font");
        assert_eq!(config.setting_value(0), "Comic Sans MS");
        assert_eq!(config.setting_value(1), "18");
        assert_eq!(config.setting_value(4), "On");
        assert_eq!(config.setting_name(99), "Unknown");
    }
}
