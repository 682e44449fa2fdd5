//! Configuration handling for titlesync
//!
//! Settings are stored in `.titlesync/config.toml` inside the vault and
//! user preferences in `~/.config/titlesync/config.toml` (global).
//! Every field has a default, so partial files merge over the defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{HeadingFormat, HeadingStyle, Sanitizer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// How the manual file list and the path regex are interpreted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Listed or matching files are skipped
    #[default]
    Ignore,
    /// Only listed or matching files are synced
    Include,
}

impl MatchMode {
    pub fn as_str(&self) -> &str {
        match self {
            MatchMode::Ignore => "ignore",
            MatchMode::Include => "include",
        }
    }
}

/// Which title wins when heading and frontmatter change together
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    #[default]
    Heading,
    Frontmatter,
}

/// Targets updated from the filename
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilenameTargets {
    pub heading: bool,
    pub frontmatter: bool,
}

impl Default for FilenameTargets {
    fn default() -> Self {
        Self {
            heading: true,
            frontmatter: false,
        }
    }
}

/// Targets updated from the heading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HeadingTargets {
    pub filename: bool,
    pub frontmatter: bool,
}

impl Default for HeadingTargets {
    fn default() -> Self {
        Self {
            filename: true,
            frontmatter: false,
        }
    }
}

/// Targets updated from the frontmatter title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct FrontmatterTargets {
    pub filename: bool,
    pub heading: bool,
}

/// Sync settings stored per vault
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Extra strings removed from titles before they become file names
    pub illegal_symbols: Vec<String>,

    /// Regex matched against vault paths (empty disables it)
    pub ignore_regex: String,

    /// Whether listed files are ignored or are the only ones synced
    pub match_mode: MatchMode,

    /// Sync filename into content when a note is opened
    pub use_file_open_hook: bool,

    /// Sync content into filename when the active note is modified
    pub use_file_save_hook: bool,

    pub new_heading_style: HeadingStyle,

    /// Convert existing headings to `new_heading_style` when replacing them
    pub replace_style: bool,

    pub underline_string: String,

    /// Frontmatter field holding the title
    pub frontmatter_key: String,

    pub precedence: Precedence,

    /// Wait for a quiet period before handling modifications
    pub use_debounce: bool,

    /// Quiet period in milliseconds
    pub debounce_ms: u64,

    pub filename_targets: FilenameTargets,
    pub heading_targets: HeadingTargets,
    pub frontmatter_targets: FrontmatterTargets,

    /// Manually listed files and when they were listed
    pub listed_files: BTreeMap<String, DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            illegal_symbols: vec![],
            ignore_regex: String::new(),
            match_mode: MatchMode::Ignore,
            listed_files: BTreeMap::new(),
            use_file_open_hook: true,
            use_file_save_hook: true,
            new_heading_style: HeadingStyle::Prefix,
            replace_style: false,
            underline_string: "===".to_string(),
            frontmatter_key: "title".to_string(),
            filename_targets: FilenameTargets::default(),
            heading_targets: HeadingTargets::default(),
            frontmatter_targets: FrontmatterTargets::default(),
            precedence: Precedence::Heading,
            use_debounce: true,
            debounce_ms: 1000,
        }
    }
}

impl Settings {
    /// Checks values the sync engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "debounce_ms must be a positive number of milliseconds".to_string(),
            ));
        }

        if self.frontmatter_key.trim().is_empty() || self.frontmatter_key.contains(':') {
            return Err(ConfigError::Invalid(format!(
                "frontmatter_key is not a usable key: '{}'",
                self.frontmatter_key
            )));
        }

        if self.underline_string.is_empty() || !self.underline_string.chars().all(|c| c == '=') {
            return Err(ConfigError::Invalid(format!(
                "underline_string must be one or more '=' characters, got '{}'",
                self.underline_string
            )));
        }

        Ok(())
    }

    /// Sanitizer using the configured illegal symbols
    pub fn sanitizer(&self) -> Sanitizer {
        Sanitizer::new(&self.illegal_symbols)
    }

    /// Heading layout used by the rewriter
    pub fn heading_format(&self) -> HeadingFormat {
        HeadingFormat {
            style: self.new_heading_style,
            replace_style: self.replace_style,
            underline: self.underline_string.clone(),
        }
    }

    /// Returns true if the path is in the manual list
    pub fn is_listed(&self, path: &str) -> bool {
        self.listed_files.contains_key(path)
    }

    /// Moves a manual list entry to a new path. Returns true if one moved.
    pub fn relist(&mut self, old_path: &str, new_path: &str) -> bool {
        match self.listed_files.remove(old_path) {
            Some(listed_at) => {
                self.listed_files.insert(new_path.to_string(), listed_at);
                true
            }
            None => false,
        }
    }
}

/// Persists settings across sessions
pub trait SettingsStore {
    /// Loads settings, merged over defaults
    fn load(&self) -> Result<Settings>;

    /// Saves settings
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings stored as TOML on disk
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings: {}", self.path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse settings")?;

        settings.validate()?;
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings: {}", self.path.display()))
    }
}

/// Settings kept in memory; clones share the same value
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    settings: Arc<Mutex<Settings>>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(Mutex::new(settings)),
        }
    }

    /// Returns the last saved settings
    pub fn snapshot(&self) -> Settings {
        self.settings
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.snapshot())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|_| anyhow::anyhow!("Settings lock poisoned"))?;
        *guard = settings.clone();
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl GlobalConfig {
    /// Returns the global config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "titlesync", "titlesync")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration, defaults when absent
    pub fn load() -> Result<Self> {
        let config_dir = match Self::config_dir() {
            Some(dir) => dir,
            None => return Ok(Self::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }
}
