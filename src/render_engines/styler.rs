//! Text styling engine
//!
//! Turns raw text plus a [`StyleConfig`] into a [`StyledDocument`]: a list of
//! bold/plain spans together with the font, spacing and resolved colors a
//! renderer needs. Rendering is pure; inputs are only borrowed.

use crate::color_space::Rgb;
use crate::palette::Palette;
use crate::render_engines::bionic::{apply_bionic_markup, bionic_segments, BOLD_DELIMITER};
use crate::render_engines::markup::segments_or_plain;
use crate::style::{FontChoice, StyleConfig};

/// A run of text with a single weight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub bold: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Render output: spans plus the uniform typography they are drawn with
///
/// Bold only changes the weight of a span. Family, size and both spacings
/// apply to the whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledDocument {
    pub segments: Vec<Segment>,
    pub font: FontChoice,
    pub font_size: f32,
    pub letter_spacing: f32,
    pub line_spacing: f32,
    pub text_color: Rgb,
    pub background_color: Rgb,
}

impl StyledDocument {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The text without any weight information
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn has_bold(&self) -> bool {
        self.segments.iter().any(|s| s.bold)
    }

    /// Re-emit the spans as bold markup, for markup-only consumers
    pub fn to_markup(&self) -> String {
        let mut output = String::with_capacity(self.plain_text().len() * 2);
        for segment in &self.segments {
            if segment.bold {
                output.push_str(BOLD_DELIMITER);
                output.push_str(&segment.text);
                output.push_str(BOLD_DELIMITER);
            } else {
                output.push_str(&segment.text);
            }
        }
        output
    }

    /// Spans grouped into visual lines, splitting on `\n`
    ///
    /// An empty document has no lines; a trailing newline yields a final
    /// empty line.
    pub fn lines(&self) -> Vec<Vec<Segment>> {
        if self.segments.is_empty() {
            return Vec::new();
        }

        let mut lines: Vec<Vec<Segment>> = vec![Vec::new()];
        for segment in &self.segments {
            for (i, part) in segment.text.split('\n').enumerate() {
                if i > 0 {
                    lines.push(Vec::new());
                }
                if part.is_empty() {
                    continue;
                }
                if let Some(line) = lines.last_mut() {
                    line.push(Segment {
                        text: part.to_string(),
                        bold: segment.bold,
                    });
                }
            }
        }
        lines
    }
}

/// Styling engine bound to a pair of palettes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEngine {
    backgrounds: Palette,
    text_colors: Palette,
}

impl Default for StyleEngine {
    fn default() -> Self {
        Self::new(Palette::backgrounds(), Palette::text_colors())
    }
}

impl StyleEngine {
    pub fn new(backgrounds: Palette, text_colors: Palette) -> Self {
        Self {
            backgrounds,
            text_colors,
        }
    }

    pub fn backgrounds(&self) -> &Palette {
        &self.backgrounds
    }

    pub fn text_colors(&self) -> &Palette {
        &self.text_colors
    }

    /// Colors for `config`, falling back to each palette's default
    pub fn resolve_colors(&self, config: &StyleConfig) -> (Rgb, Rgb) {
        (
            self.backgrounds.resolve(config.background_color_index()),
            self.text_colors.resolve(config.text_color_index()),
        )
    }

    /// Render `text` with `config`
    pub fn render(&self, text: &str, config: &StyleConfig) -> StyledDocument {
        let segments = if text.is_empty() {
            Vec::new()
        } else if config.bionic() {
            bionic_segments(text)
        } else {
            vec![Segment::plain(text)]
        };
        self.document(segments, config)
    }

    /// Render from a bold-markup string produced elsewhere
    ///
    /// Falls back to the unmarked `original` when the markup does not parse
    /// back into it.
    pub fn render_markup(&self, markup: &str, original: &str, config: &StyleConfig) -> StyledDocument {
        self.document(segments_or_plain(markup, original), config)
    }

    /// The string form of `text` for previews and export
    ///
    /// Bold markup when bionic mode is on, the text itself otherwise.
    pub fn formatted(&self, text: &str, config: &StyleConfig) -> String {
        if config.bionic() {
            apply_bionic_markup(text)
        } else {
            text.to_string()
        }
    }

    fn document(&self, segments: Vec<Segment>, config: &StyleConfig) -> StyledDocument {
        let (background_color, text_color) = self.resolve_colors(config);
        StyledDocument {
            segments,
            font: config.font(),
            font_size: config.font_size(),
            letter_spacing: config.letter_spacing(),
            line_spacing: config.line_spacing(),
            text_color,
            background_color,
        }
    }
}

/// Render with the built-in palettes
pub fn render(text: &str, config: &StyleConfig) -> StyledDocument {
    StyleEngine::default().render(text, config)
}

/// Remembers the last render and reuses it while its inputs are unchanged
#[derive(Debug, Default)]
pub struct RenderCache {
    last: Option<CachedRender>,
    hits: u64,
    misses: u64,
}

#[derive(Debug)]
struct CachedRender {
    text: String,
    config: StyleConfig,
    colors: (Rgb, Rgb),
    document: StyledDocument,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render through the cache; the key includes the resolved colors so a
    /// changed custom palette slot invalidates the entry
    pub fn render(&mut self, engine: &StyleEngine, text: &str, config: &StyleConfig) -> &StyledDocument {
        let colors = engine.resolve_colors(config);
        let fresh = matches!(
            &self.last,
            Some(c) if c.text == text && c.config == *config && c.colors == colors
        );

        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.last = None;
        }

        let cached = self.last.get_or_insert_with(|| CachedRender {
            text: text.to_string(),
            config: config.clone(),
            colors,
            document: engine.render(text, config),
        });
        &cached.document
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_passthrough() {
        let config = StyleConfig::default();
        let doc = render("Hello, World!", &config);
        assert_eq!(doc.plain_text(), "Hello, World!");
        assert!(!doc.has_bold());
        assert_eq!(doc.segments.len(), 1);
    }

    #[test]
    fn test_bionic_render() {
        let config = StyleConfig::default().with_bionic(true);
        let doc = render("hello world", &config);
        assert_eq!(doc.plain_text(), "hello world");
        assert_eq!(doc.to_markup(), "**he**llo **wo**rld");
    }

    #[test]
    fn test_empty_document() {
        for bionic in [false, true] {
            let doc = render("", &StyleConfig::default().with_bionic(bionic));
            assert!(doc.is_empty());
            assert!(doc.lines().is_empty());
        }
    }

    #[test]
    fn test_typography_carried_over() {
        let config = StyleConfig::default()
            .with_font(FontChoice::HelveticaNeue)
            .with_font_size(24.0)
            .with_letter_spacing(2.0)
            .with_line_spacing(12.0)
            .with_bionic(true);
        let doc = render("spacing stays uniform", &config);
        assert_eq!(doc.font, FontChoice::HelveticaNeue);
        assert_eq!(doc.font_size, 24.0);
        assert_eq!(doc.letter_spacing, 2.0);
        assert_eq!(doc.line_spacing, 12.0);
    }

    #[test]
    fn test_palette_default_for_bad_index() {
        let config = StyleConfig::default()
            .with_background_color_index(9999)
            .with_text_color_index(9999);
        let doc = render("text", &config);
        assert_eq!(doc.background_color, Rgb::WHITE);
        assert_eq!(doc.text_color, Rgb::BLACK);
    }

    #[test]
    fn test_render_markup_fallback() {
        let engine = StyleEngine::default();
        let config = StyleConfig::default().with_bionic(true);
        let doc = engine.render_markup("**he**llo **wo", "hello world", &config);
        assert_eq!(doc.segments, vec![Segment::plain("hello world")]);
    }

    #[test]
    fn test_formatted() {
        let engine = StyleEngine::default();
        let off = StyleConfig::default();
        let on = StyleConfig::default().with_bionic(true);
        assert_eq!(engine.formatted("read me", &off), "read me");
        assert_eq!(engine.formatted("read me", &on), "**re**ad **m**e");
    }

    #[test]
    fn test_lines() {
        let config = StyleConfig::default().with_bionic(true);
        let doc = render("one two\nthree", &config);
        let lines = doc.lines();
        assert_eq!(lines.len(), 2);
        // "two\nthree" is one word: bold "two\n" then "three"
        assert_eq!(lines[0].last(), Some(&Segment::bold("two")));
        assert_eq!(lines[1][0], Segment::plain("three"));
    }

    #[test]
    fn test_inputs_untouched() {
        let text = String::from("do not touch");
        let config = StyleConfig::default().with_bionic(true);
        let before = config.clone();
        let _ = render(&text, &config);
        assert_eq!(text, "do not touch");
        assert_eq!(config, before);
    }

    #[test]
    fn test_cache_hits_and_invalidation() {
        let engine = StyleEngine::default();
        let mut cache = RenderCache::new();
        let config = StyleConfig::default().with_bionic(true);

        let first = cache.render(&engine, "cache me", &config).clone();
        let second = cache.render(&engine, "cache me", &config).clone();
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);

        let changed = config.clone().with_bionic(false);
        let third = cache.render(&engine, "cache me", &changed);
        assert!(!third.has_bold());
        assert_eq!(cache.misses(), 2);
    }
}
