//! Preference storage
//!
//! Display preferences are kept as named scalar values behind the
//! [`PreferenceStore`] trait. The styling engine never sees a store; the
//! application loads a [`StyleConfig`] from one, and saves it back on change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::color_space::Rgb;
use crate::error::StoreError;
use crate::palette::Palette;
use crate::style::{
    FontChoice, StyleConfig, DEFAULT_FONT_SIZE, DEFAULT_LETTER_SPACING, DEFAULT_LINE_SPACING,
};

/// Setting names used in every store
pub mod keys {
    pub const FONT_INDEX: &str = "font_index";
    pub const FONT_SIZE: &str = "font_size";
    pub const LETTER_SPACING: &str = "letter_spacing";
    pub const LINE_SPACING: &str = "line_spacing";
    pub const BIONIC: &str = "bionic";
    pub const BACKGROUND_COLOR_INDEX: &str = "background_color_index";
    pub const TEXT_COLOR_INDEX: &str = "text_color_index";
    pub const CUSTOM_BACKGROUND_COLOR: &str = "custom_background_color";
    pub const CUSTOM_TEXT_COLOR: &str = "custom_text_color";

    pub const ALL: [&str; 9] = [
        FONT_INDEX,
        FONT_SIZE,
        LETTER_SPACING,
        LINE_SPACING,
        BIONIC,
        BACKGROUND_COLOR_INDEX,
        TEXT_COLOR_INDEX,
        CUSTOM_BACKGROUND_COLOR,
        CUSTOM_TEXT_COLOR,
    ];
}

/// A single stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PrefValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            PrefValue::Int(i) => Some(*i != 0),
            PrefValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Some(true),
                "false" | "off" | "no" | "0" => Some(false),
                _ => None,
            },
            PrefValue::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PrefValue::Float(f) => Some(*f),
            PrefValue::Int(i) => Some(*i as f64),
            PrefValue::Text(s) => s.trim().parse().ok(),
            PrefValue::Bool(_) => None,
        }
    }

    /// Non-negative integer view; fractional values are truncated
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            PrefValue::Int(i) => usize::try_from(*i).ok(),
            PrefValue::Float(f) if *f >= 0.0 && f.is_finite() => Some(*f as usize),
            PrefValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret user input: bool, then integer, then float, else text
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if let Ok(b) = trimmed.parse::<bool>() {
            PrefValue::Bool(b)
        } else if let Ok(i) = trimmed.parse::<i64>() {
            PrefValue::Int(i)
        } else if let Ok(f) = trimmed.parse::<f64>() {
            PrefValue::Float(f)
        } else {
            PrefValue::Text(trimmed.to_string())
        }
    }
}

impl std::fmt::Display for PrefValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{}", b),
            PrefValue::Int(i) => write!(f, "{}", i),
            PrefValue::Float(v) => write!(f, "{}", v),
            PrefValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Key-value store for display preferences
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<PrefValue>;

    fn set(&mut self, key: &str, value: PrefValue);

    fn remove(&mut self, key: &str);

    /// Persist pending changes; a no-op for in-memory stores
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn get_f32_or(&self, key: &str, default: f32) -> f32 {
        self.get(key)
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
            .unwrap_or(default)
    }

    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    fn get_usize_or(&self, key: &str, default: usize) -> usize {
        self.get(key).and_then(|v| v.as_usize()).unwrap_or(default)
    }
}

/// Volatile store, mostly for tests and one-shot commands
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &BTreeMap<String, PrefValue> {
        &self.values
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: PrefValue) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Store backed by a flat TOML table on disk
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, PrefValue>,
    dirty: bool,
}

impl FilePreferenceStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        } else {
            debug!("no preferences at {}, starting empty", path.display());
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn values(&self) -> &BTreeMap<String, PrefValue> {
        &self.values
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: PrefValue) {
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, contents)?;
        self.dirty = false;
        info!("saved preferences to {}", self.path.display());
        Ok(())
    }
}

/// Build a style snapshot from stored values
///
/// Missing or unreadable values take their defaults and every numeric
/// value goes through the clamping setters.
pub fn load_style(store: &dyn PreferenceStore) -> StyleConfig {
    let mut config = StyleConfig::default();
    config.set_font(FontChoice::from_index(store.get_usize_or(keys::FONT_INDEX, 0)));
    config.set_font_size(store.get_f32_or(keys::FONT_SIZE, DEFAULT_FONT_SIZE));
    config.set_letter_spacing(store.get_f32_or(keys::LETTER_SPACING, DEFAULT_LETTER_SPACING));
    config.set_line_spacing(store.get_f32_or(keys::LINE_SPACING, DEFAULT_LINE_SPACING));
    config.set_bionic(store.get_bool_or(keys::BIONIC, false));
    config.set_background_color_index(store.get_usize_or(keys::BACKGROUND_COLOR_INDEX, 0));
    config.set_text_color_index(store.get_usize_or(keys::TEXT_COLOR_INDEX, 0));
    config
}

/// Write every field of `config` to the store
pub fn save_style(store: &mut dyn PreferenceStore, config: &StyleConfig) -> Result<(), StoreError> {
    store.set(keys::FONT_INDEX, PrefValue::Int(config.font().index() as i64));
    store.set(keys::FONT_SIZE, PrefValue::Float(config.font_size() as f64));
    store.set(keys::LETTER_SPACING, PrefValue::Float(config.letter_spacing() as f64));
    store.set(keys::LINE_SPACING, PrefValue::Float(config.line_spacing() as f64));
    store.set(keys::BIONIC, PrefValue::Bool(config.bionic()));
    store.set(
        keys::BACKGROUND_COLOR_INDEX,
        PrefValue::Int(config.background_color_index() as i64),
    );
    store.set(
        keys::TEXT_COLOR_INDEX,
        PrefValue::Int(config.text_color_index() as i64),
    );
    store.flush()
}

/// Palettes with any stored custom colors applied
pub fn load_palettes(store: &dyn PreferenceStore) -> (Palette, Palette) {
    let mut backgrounds = Palette::backgrounds();
    let mut text_colors = Palette::text_colors();

    if let Some(color) = stored_color(store, keys::CUSTOM_BACKGROUND_COLOR) {
        backgrounds.set_custom(color);
    }
    if let Some(color) = stored_color(store, keys::CUSTOM_TEXT_COLOR) {
        text_colors.set_custom(color);
    }

    (backgrounds, text_colors)
}

fn stored_color(store: &dyn PreferenceStore, key: &str) -> Option<Rgb> {
    let value = store.get(key)?;
    let color = value.as_str().and_then(Rgb::from_hex);
    if color.is_none() {
        debug!("ignoring unreadable color {} = {}", key, value);
    }
    color
}

/// Store a custom background color and select its slot
pub fn save_custom_background(
    store: &mut dyn PreferenceStore,
    config: &mut StyleConfig,
    color: Rgb,
) -> Result<(), StoreError> {
    store.set(keys::CUSTOM_BACKGROUND_COLOR, PrefValue::Text(color.to_hex()));
    config.set_background_color_index(Palette::backgrounds().custom_index());
    save_style(store, config)
}

/// Store a custom text color and select its slot
pub fn save_custom_text_color(
    store: &mut dyn PreferenceStore,
    config: &mut StyleConfig,
    color: Rgb,
) -> Result<(), StoreError> {
    store.set(keys::CUSTOM_TEXT_COLOR, PrefValue::Text(color.to_hex()));
    config.set_text_color_index(Palette::text_colors().custom_index());
    save_style(store, config)
}

/// Drop every known setting, returning the store to defaults
pub fn reset(store: &mut dyn PreferenceStore) -> Result<(), StoreError> {
    for key in keys::ALL {
        store.remove(key);
    }
    store.flush()
}
