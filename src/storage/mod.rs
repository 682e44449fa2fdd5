//! # Storage Layer
//!
//! Persistence for titlesync: the notes themselves and the sync settings.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Notes | Markdown, optional YAML frontmatter | anywhere in the vault |
//! | Settings | TOML | `.titlesync/config.toml` |
//! | Watch journal | Text, rotated | `.titlesync/watch.log` |
//! | User preferences | TOML | `~/.config/titlesync/config.toml` |
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point for a vault set up for titlesync
//! - [`Vault`] - Read/modify/rename notes ([`FsVault`], [`MemoryVault`])
//! - [`SettingsStore`] - Load/save [`Settings`] ([`TomlSettingsStore`], [`MemorySettingsStore`])

mod config;
mod vault;
mod workspace;

pub use config::{
    ConfigError, FilenameTargets, FrontmatterTargets, GlobalConfig, HeadingTargets, MatchMode,
    MemorySettingsStore, OutputFormat, Precedence, Settings, SettingsStore, TomlSettingsStore,
};
pub use vault::{parse_frontmatter, Frontmatter, FsVault, MemoryVault, Vault, VaultError};
pub use workspace::{Workspace, WorkspaceError, STATE_DIR};
