//! Terminal capability detection
//!
//! Decides how the CLI renderer should paint a styled document on stdout.

use crossterm::{terminal, tty::IsTty};
use std::env;

/// Level of color support in the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSupport {
    /// No color support
    NoColor,
    /// 16 basic colors
    Color16,
    /// 256 color palette
    Color256,
    /// Full 24-bit RGB (TrueColor)
    #[default]
    TrueColor,
}

impl ColorSupport {
    pub fn name(&self) -> &'static str {
        match self {
            ColorSupport::NoColor => "None",
            ColorSupport::Color16 => "16 Colors",
            ColorSupport::Color256 => "256 Colors",
            ColorSupport::TrueColor => "True Color",
        }
    }
}

/// Terminal capabilities
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub color_support: ColorSupport,
    /// Whether stdout is attached to a terminal
    pub is_tty: bool,
    pub size: (u16, u16),
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            color_support: ColorSupport::TrueColor,
            is_tty: true,
            size: (80, 24),
        }
    }
}

/// Detect terminal capabilities for stdout
pub fn detect_capabilities() -> TerminalCapabilities {
    let is_tty = std::io::stdout().is_tty();
    let color_support = if is_tty {
        color_support_from_env(|key| env::var(key).ok())
    } else {
        ColorSupport::NoColor
    };
    let size = terminal::size().unwrap_or((80, 24));

    TerminalCapabilities {
        color_support,
        is_tty,
        size,
    }
}

/// Derive the color level from environment variables
///
/// Takes a lookup function so detection can be exercised without touching
/// the process environment.
pub fn color_support_from_env<F>(lookup: F) -> ColorSupport
where
    F: Fn(&str) -> Option<String>,
{
    // https://no-color.org
    if lookup("NO_COLOR").is_some() {
        return ColorSupport::NoColor;
    }

    if let Some(colorterm) = lookup("COLORTERM") {
        let colorterm = colorterm.to_lowercase();
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return ColorSupport::TrueColor;
        }
    }

    if let Some(term) = lookup("TERM") {
        let term = term.to_lowercase();

        if term == "dumb" {
            return ColorSupport::NoColor;
        }

        if term.contains("kitty")
            || term.contains("alacritty")
            || term.contains("iterm")
            || term.contains("vte")
            || term.contains("256color")
        {
            if lookup("COLORTERM").is_some() {
                return ColorSupport::TrueColor;
            }
            return ColorSupport::Color256;
        }

        if term.contains("xterm") {
            return ColorSupport::Color16;
        }

        if term.contains("screen") || term.contains("tmux") {
            return ColorSupport::Color256;
        }

        if term.contains("linux") || term.contains("console") {
            return ColorSupport::Color16;
        }
    }

    if lookup("WT_SESSION").is_some() {
        return ColorSupport::TrueColor;
    }

    ColorSupport::Color256
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_no_color_wins() {
        let lookup = env_of(&[("NO_COLOR", "1"), ("COLORTERM", "truecolor")]);
        assert_eq!(color_support_from_env(lookup), ColorSupport::NoColor);
    }

    #[test]
    fn test_colorterm_truecolor() {
        let lookup = env_of(&[("COLORTERM", "24bit")]);
        assert_eq!(color_support_from_env(lookup), ColorSupport::TrueColor);
    }

    #[test]
    fn test_term_variants() {
        assert_eq!(
            color_support_from_env(env_of(&[("TERM", "xterm-256color")])),
            ColorSupport::Color256
        );
        assert_eq!(
            color_support_from_env(env_of(&[("TERM", "xterm")])),
            ColorSupport::Color16
        );
        assert_eq!(
            color_support_from_env(env_of(&[("TERM", "dumb")])),
            ColorSupport::NoColor
        );
        assert_eq!(color_support_from_env(env_of(&[])), ColorSupport::Color256);
    }

    #[test]
    fn test_capabilities_default() {
        let caps = TerminalCapabilities::default();
        assert_eq!(caps.color_support, ColorSupport::TrueColor);
        assert!(caps.is_tty);
    }
}
