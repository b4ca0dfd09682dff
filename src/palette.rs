//! Background and text color palettes
//!
//! A palette is a fixed list of base colors followed by one user-chosen
//! custom slot. Lookups never fail: an unknown index resolves to the
//! palette's default color.

use log::debug;

use crate::color_space::Rgb;

/// Colors shown per page in a palette picker
pub const DEFAULT_COLORS_PER_PAGE: usize = 5;

const BASE_BACKGROUNDS: [Rgb; 8] = [
    Rgb::new(255, 255, 255),
    Rgb::new(247, 242, 237),
    Rgb::new(240, 230, 219),
    Rgb::new(230, 219, 209),
    Rgb::new(219, 209, 199),
    Rgb::new(209, 199, 184),
    Rgb::new(204, 194, 178),
    Rgb::new(194, 184, 168),
];

const BASE_TEXT_COLORS: [Rgb; 8] = [
    Rgb::new(0, 0, 0),
    Rgb::new(94, 69, 43),
    Rgb::new(142, 142, 147),
    Rgb::new(115, 92, 74),
    Rgb::new(153, 128, 110),
    Rgb::new(64, 51, 38),
    Rgb::new(38, 38, 51),
    Rgb::new(140, 102, 89),
];

/// An ordered set of selectable colors with a trailing custom slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: &'static str,
    base: Vec<Rgb>,
    custom: Rgb,
    default_color: Rgb,
}

impl Palette {
    pub fn new(name: &'static str, base: Vec<Rgb>, custom: Rgb, default_color: Rgb) -> Self {
        Self {
            name,
            base,
            custom,
            default_color,
        }
    }

    /// Paper tones, white first
    pub fn backgrounds() -> Self {
        Self::new("background", BASE_BACKGROUNDS.to_vec(), Rgb::WHITE, Rgb::WHITE)
    }

    /// Ink tones, black first
    pub fn text_colors() -> Self {
        Self::new("text", BASE_TEXT_COLORS.to_vec(), Rgb::BLACK, Rgb::BLACK)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of selectable entries, custom slot included
    pub fn len(&self) -> usize {
        self.base.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the custom slot
    pub fn custom_index(&self) -> usize {
        self.base.len()
    }

    pub fn custom(&self) -> Rgb {
        self.custom
    }

    pub fn set_custom(&mut self, color: Rgb) {
        self.custom = color;
    }

    pub fn default_color(&self) -> Rgb {
        self.default_color
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        if index < self.base.len() {
            Some(self.base[index])
        } else if index == self.custom_index() {
            Some(self.custom)
        } else {
            None
        }
    }

    /// Color at `index`, or the default color when out of range
    pub fn resolve(&self, index: usize) -> Rgb {
        self.get(index).unwrap_or_else(|| {
            debug!(
                "{} palette index {} out of range (len {}), using default",
                self.name,
                index,
                self.len()
            );
            self.default_color
        })
    }

    /// All entries in selection order
    pub fn colors(&self) -> Vec<Rgb> {
        let mut colors = self.base.clone();
        colors.push(self.custom);
        colors
    }

    pub fn page_count(&self, per_page: usize) -> usize {
        let per_page = per_page.max(1);
        self.len().div_ceil(per_page)
    }

    /// Indices shown on `page`; empty past the last page
    pub fn page_indices(&self, page: usize, per_page: usize) -> Vec<usize> {
        let per_page = per_page.max(1);
        let start = page.saturating_mul(per_page).min(self.len());
        let end = (start + per_page).min(self.len());
        (start..end).collect()
    }

    pub fn has_next_page(&self, page: usize, per_page: usize) -> bool {
        (page + 1).saturating_mul(per_page.max(1)) < self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_sizes() {
        let bg = Palette::backgrounds();
        assert_eq!(bg.len(), 9);
        assert_eq!(bg.custom_index(), 8);
        assert_eq!(Palette::text_colors().len(), 9);
    }

    #[test]
    fn test_resolve_in_range() {
        let bg = Palette::backgrounds();
        assert_eq!(bg.resolve(1), Rgb::new(247, 242, 237));
        assert_eq!(Palette::text_colors().resolve(0), Rgb::BLACK);
    }

    #[test]
    fn test_resolve_out_of_range_uses_default() {
        assert_eq!(Palette::backgrounds().resolve(9999), Rgb::WHITE);
        assert_eq!(Palette::text_colors().resolve(usize::MAX), Rgb::BLACK);
    }

    #[test]
    fn test_custom_slot() {
        let mut text = Palette::text_colors();
        let teal = Rgb::new(0, 128, 128);
        text.set_custom(teal);
        assert_eq!(text.resolve(text.custom_index()), teal);
        assert_eq!(text.colors().last(), Some(&teal));
    }

    #[test]
    fn test_paging() {
        let bg = Palette::backgrounds();
        assert_eq!(bg.page_count(DEFAULT_COLORS_PER_PAGE), 2);
        assert_eq!(bg.page_indices(0, 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(bg.page_indices(1, 5), vec![5, 6, 7, 8]);
        assert!(bg.page_indices(2, 5).is_empty());
        assert!(bg.has_next_page(0, 5));
        assert!(!bg.has_next_page(1, 5));
    }
}
