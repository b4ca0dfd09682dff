//! Configuration management
//!
//! Load and save application settings to a TOML config file. Display
//! preferences live in their own store; this file only says where things
//! are kept and how the reader behaves.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::palette::DEFAULT_COLORS_PER_PAGE;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "readable";
const APPLICATION: &str = "readable";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub reader: ReaderConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`; a missing file gives defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = project_dirs() {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            // Fallback to current directory
            Ok(PathBuf::from("readable.toml"))
        }
    }

    /// Directory holding the text file library
    pub fn documents_dir(&self) -> PathBuf {
        self.storage
            .documents_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("documents"))
    }

    pub fn notes_path(&self) -> PathBuf {
        self.storage
            .notes_file
            .clone()
            .unwrap_or_else(|| data_dir().join("notes.json"))
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.storage
            .preferences_file
            .clone()
            .unwrap_or_else(|| data_dir().join("preferences.toml"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Platform data directory, or the working directory when there is none
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Overrides for where documents, notes and preferences are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub documents_dir: Option<PathBuf>,
    pub notes_file: Option<PathBuf>,
    pub preferences_file: Option<PathBuf>,
}

/// Reader behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Colors shown per page of a palette picker
    pub colors_per_page: usize,
    /// Text used to preview style changes
    pub sample_text: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            colors_per_page: DEFAULT_COLORS_PER_PAGE,
            sample_text: "Reading is easier when the start of every word stands out.".to_string(),
        }
    }
}

/// Log output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    /// Write logs here instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}
