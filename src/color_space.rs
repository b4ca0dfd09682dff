//! Color handling
//!
//! RGB colors, hex conversion, and terminal color quantization.

use serde::{Deserialize, Serialize};

use crate::terminal_capabilities::ColorSupport;

/// RGB color type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB` (case-insensitive)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        })
    }

    /// Format as `#RRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Convert RGB to perceptual luminance (0.0 to 1.0)
///
/// Uses ITU-R BT.709 (HDTV) coefficients.
pub fn rgb_to_luminance(r: u8, g: u8, b: u8) -> f32 {
    0.2126 * (r as f32 / 255.0) + 0.7152 * (g as f32 / 255.0) + 0.0722 * (b as f32 / 255.0)
}

/// Quantize RGB to ANSI 256-color palette
pub fn quantize_to_ansi256(rgb: Rgb) -> u8 {
    let r = rgb.r;
    let g = rgb.g;
    let b = rgb.b;

    // Close to gray: use the grayscale ramp (232-255)
    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_diff = (r as i16 - avg as i16).abs().max(
        (g as i16 - avg as i16)
            .abs()
            .max((b as i16 - avg as i16).abs()),
    );

    if gray_diff < 10 {
        let gray_index = (avg as f32 / 255.0 * 23.0).round() as u8;
        return 232 + gray_index;
    }

    // 6x6x6 color cube (16-231)
    let r_index = (r as f32 / 255.0 * 5.0).round() as u8;
    let g_index = (g as f32 / 255.0 * 5.0).round() as u8;
    let b_index = (b as f32 / 255.0 * 5.0).round() as u8;

    16 + 36 * r_index + 6 * g_index + b_index
}

/// Quantize RGB to ANSI 16-color palette
pub fn quantize_to_ansi16(rgb: Rgb) -> u8 {
    let luminance = rgb_to_luminance(rgb.r, rgb.g, rgb.b);
    let bright = luminance > 0.5;

    let r = rgb.r as f32 / 255.0;
    let g = rgb.g as f32 / 255.0;
    let b = rgb.b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let saturation = if max > 0.0 { (max - min) / max } else { 0.0 };

    // Paper tones and inks are mostly low saturation
    if saturation < 0.2 {
        return if luminance > 0.7 {
            15
        } else if luminance > 0.3 {
            7
        } else {
            0
        };
    }

    let color_base = if r >= g && r >= b {
        if g > b {
            3 // Yellow
        } else {
            1 // Red
        }
    } else if g >= r && g >= b {
        if b > r {
            6 // Cyan
        } else {
            2 // Green
        }
    } else if r > g {
        5 // Magenta
    } else {
        4 // Blue
    };

    if bright {
        color_base + 8
    } else {
        color_base
    }
}

/// ANSI reset sequence
pub const ANSI_RESET: &str = "\x1b[0m";
/// ANSI bold on
pub const ANSI_BOLD: &str = "\x1b[1m";
/// ANSI normal intensity (bold off)
pub const ANSI_NORMAL: &str = "\x1b[22m";

fn ansi16_code(color: u8, base: u8, bright_base: u8) -> String {
    if color < 8 {
        format!("\x1b[{}m", base + color)
    } else {
        format!("\x1b[{}m", bright_base + (color - 8))
    }
}

/// Format foreground color for terminal based on color support level
pub fn format_fg_color(rgb: Rgb, support: ColorSupport) -> String {
    match support {
        ColorSupport::NoColor => String::new(),
        ColorSupport::Color16 => ansi16_code(quantize_to_ansi16(rgb), 30, 90),
        ColorSupport::Color256 => format!("\x1b[38;5;{}m", quantize_to_ansi256(rgb)),
        ColorSupport::TrueColor => format!("\x1b[38;2;{};{};{}m", rgb.r, rgb.g, rgb.b),
    }
}

/// Format background color for terminal based on color support level
pub fn format_bg_color(rgb: Rgb, support: ColorSupport) -> String {
    match support {
        ColorSupport::NoColor => String::new(),
        ColorSupport::Color16 => ansi16_code(quantize_to_ansi16(rgb), 40, 100),
        ColorSupport::Color256 => format!("\x1b[48;5;{}m", quantize_to_ansi256(rgb)),
        ColorSupport::TrueColor => format!("\x1b[48;2;{};{};{}m", rgb.r, rgb.g, rgb.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color = Rgb::new(247, 242, 237);
        assert_eq!(color.to_hex(), "#F7F2ED");
        assert_eq!(Rgb::from_hex("#f7f2ed"), Some(color));
        assert_eq!(Rgb::from_hex("F7F2ED"), Some(color));
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert_eq!(Rgb::from_hex(""), None);
        assert_eq!(Rgb::from_hex("#FFF"), None);
        assert_eq!(Rgb::from_hex("#GG0000"), None);
        assert_eq!(Rgb::from_hex("#ééé"), None);
    }

    #[test]
    fn test_luminance_range() {
        assert!((rgb_to_luminance(0, 0, 0) - 0.0).abs() < 0.01);
        assert!((rgb_to_luminance(255, 255, 255) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_ansi256_grayscale() {
        let code = quantize_to_ansi256(Rgb::new(128, 128, 128));
        assert!(code >= 232);
    }

    #[test]
    fn test_ansi16_paper_is_bright_white() {
        assert_eq!(quantize_to_ansi16(Rgb::new(247, 242, 237)), 15);
        assert_eq!(quantize_to_ansi16(Rgb::BLACK), 0);
    }

    #[test]
    fn test_fg_format() {
        let red = Rgb::new(255, 0, 0);
        assert_eq!(format_fg_color(red, ColorSupport::TrueColor), "\x1b[38;2;255;0;0m");
        assert_eq!(format_fg_color(red, ColorSupport::NoColor), "");
        assert_eq!(format_bg_color(Rgb::WHITE, ColorSupport::Color16), "\x1b[107m");
    }
}
