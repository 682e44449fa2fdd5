//! Workspace management
//!
//! A workspace is a vault directory containing a `.titlesync/` folder.
//! Handles initialization and hands out the vault and settings store.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{FsVault, Settings, SettingsStore, TomlSettingsStore};

/// Folder holding titlesync state inside a vault
pub const STATE_DIR: &str = ".titlesync";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Workspace already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Not in a titlesync vault. Run 'titlesync init' first.")]
    NotInWorkspace,

    #[error("Path is outside the vault: {0}")]
    OutsideVault(PathBuf),
}

/// A vault set up for titlesync
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.join(STATE_DIR).is_dir() {
            return Err(WorkspaceError::NotInWorkspace.into());
        }

        Ok(Self { root })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let current = std::env::current_dir().context("Failed to read current directory")?;
        let root = Self::find_root(&current).ok_or(WorkspaceError::NotInWorkspace)?;
        Self::open(root)
    }

    /// Finds the vault root by looking for `.titlesync/` upwards from `start`
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(STATE_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Initializes a workspace at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let state_dir = root.join(STATE_DIR);

        fs::create_dir_all(&state_dir).with_context(|| {
            format!("Failed to create {} directory: {}", STATE_DIR, state_dir.display())
        })?;

        let store = TomlSettingsStore::new(state_dir.join("config.toml"));
        if !store.path().exists() {
            store.save(&Settings::default())?;
        }

        let gitignore_path = state_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Watch journal (rotated)
watch.log
watch.log.*
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the vault root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.titlesync` directory path
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    /// Returns the settings store
    pub fn settings_store(&self) -> TomlSettingsStore {
        TomlSettingsStore::new(self.state_dir().join("config.toml"))
    }

    /// Returns the vault over the workspace root
    pub fn vault(&self) -> FsVault {
        FsVault::new(&self.root)
    }

    /// Returns the watch journal path
    pub fn journal_path(&self) -> PathBuf {
        self.state_dir().join("watch.log")
    }

    /// Converts a user-supplied path into a vault path.
    ///
    /// Relative paths are tried against the current directory first, then
    /// against the vault root.
    pub fn note_path(&self, path: &Path) -> Result<String> {
        let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());

        let candidates = if path.is_absolute() {
            vec![path.to_path_buf()]
        } else {
            let mut candidates = Vec::new();
            if let Ok(cwd) = std::env::current_dir() {
                candidates.push(cwd.join(path));
            }
            candidates.push(self.root.join(path));
            candidates
        };

        for candidate in &candidates {
            let absolute = candidate.canonicalize().unwrap_or_else(|_| candidate.clone());
            if let Ok(relative) = absolute.strip_prefix(&root) {
                return Ok(to_vault_path(relative));
            }
            if let Ok(relative) = candidate.strip_prefix(&self.root) {
                return Ok(to_vault_path(relative));
            }
        }

        Err(WorkspaceError::OutsideVault(path.to_path_buf()).into())
    }

    /// Converts an absolute path reported by the filesystem into a vault path
    pub fn relative_path(&self, path: &Path) -> Option<String> {
        let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        path.strip_prefix(&root)
            .or_else(|_| path.strip_prefix(&self.root))
            .ok()
            .map(to_vault_path)
    }
}

fn to_vault_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
