//! Vault access
//!
//! The sync engine reads, rewrites and renames notes through the [`Vault`]
//! trait. [`FsVault`] works on a directory on disk; [`MemoryVault`] keeps
//! notes in memory for embedding and tests.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{frontmatter_end, Document};

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("A file already exists at {0}")]
    AlreadyExists(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Parsed YAML frontmatter of a note
pub type Frontmatter = serde_yaml::Mapping;

/// Parses the frontmatter block of a note's text.
///
/// Returns `None` when there is no block or it is not a YAML mapping.
pub fn parse_frontmatter(text: &str) -> Option<Frontmatter> {
    let doc = Document::parse(text);
    let end = frontmatter_end(&doc.lines)?;
    let yaml = doc.lines[1..end].join("\n");
    if yaml.trim().is_empty() {
        return Some(Frontmatter::new());
    }
    serde_yaml::from_str(&yaml).ok()
}

/// Storage holding the notes being synced
pub trait Vault {
    /// Reads a note's full text
    fn read(&self, path: &str) -> Result<String, VaultError>;

    /// Replaces a note's full text
    fn modify(&mut self, path: &str, text: &str) -> Result<(), VaultError>;

    /// Moves a note. Fails if `new_path` is taken.
    fn rename(&mut self, path: &str, new_path: &str) -> Result<(), VaultError>;

    /// Parsed frontmatter of a note, `None` if it has none
    fn frontmatter(&self, path: &str) -> Result<Option<Frontmatter>, VaultError> {
        Ok(parse_frontmatter(&self.read(path)?))
    }
}

/// Vault backed by a directory
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a vault path
    pub fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    fn io_error(path: &str, source: io::Error) -> VaultError {
        if source.kind() == io::ErrorKind::NotFound {
            VaultError::NotFound(path.to_string())
        } else {
            VaultError::Io {
                path: path.to_string(),
                source,
            }
        }
    }
}

impl Vault for FsVault {
    fn read(&self, path: &str) -> Result<String, VaultError> {
        fs::read_to_string(self.resolve(path)).map_err(|e| Self::io_error(path, e))
    }

    /// Writes atomically (temp file + rename)
    fn modify(&mut self, path: &str, text: &str) -> Result<(), VaultError> {
        let target = self.resolve(path);
        if !target.is_file() {
            return Err(VaultError::NotFound(path.to_string()));
        }

        let temp_path = target.with_extension("md.tmp");
        fs::write(&temp_path, text).map_err(|e| Self::io_error(path, e))?;
        fs::rename(&temp_path, &target).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Self::io_error(path, e)
        })
    }

    fn rename(&mut self, path: &str, new_path: &str) -> Result<(), VaultError> {
        let from = self.resolve(path);
        let to = self.resolve(new_path);

        if !from.exists() {
            return Err(VaultError::NotFound(path.to_string()));
        }
        // Case-only renames resolve to the same file on case-insensitive systems
        let same_file = match (from.canonicalize(), to.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if to.exists() && !same_file {
            return Err(VaultError::AlreadyExists(new_path.to_string()));
        }

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(new_path, e))?;
        }
        fs::rename(&from, &to).map_err(|e| Self::io_error(path, e))
    }
}

/// Vault held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    files: BTreeMap<String, String>,
    renames: Vec<(String, String)>,
    writes: usize,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file without counting it as a write
    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    /// Builder form of [`MemoryVault::insert`]
    pub fn with_file(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Renames performed through [`Vault::rename`], oldest first
    pub fn renames(&self) -> &[(String, String)] {
        &self.renames
    }

    /// Number of successful [`Vault::modify`] calls
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Vault for MemoryVault {
    fn read(&self, path: &str) -> Result<String, VaultError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(path.to_string()))
    }

    fn modify(&mut self, path: &str, text: &str) -> Result<(), VaultError> {
        let file = self
            .files
            .get_mut(path)
            .ok_or_else(|| VaultError::NotFound(path.to_string()))?;
        *file = text.to_string();
        self.writes += 1;
        Ok(())
    }

    fn rename(&mut self, path: &str, new_path: &str) -> Result<(), VaultError> {
        if self.files.contains_key(new_path) {
            return Err(VaultError::AlreadyExists(new_path.to_string()));
        }
        let text = self
            .files
            .remove(path)
            .ok_or_else(|| VaultError::NotFound(path.to_string()))?;
        self.files.insert(new_path.to_string(), text);
        self.renames.push((path.to_string(), new_path.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_frontmatter_mapping() {
        let fm = parse_frontmatter("---\ntitle: T\nkanban-plugin: basic\n---\n# T").unwrap();
        assert_eq!(fm.get("title").and_then(|v| v.as_str()), Some("T"));
        assert!(fm.contains_key("kanban-plugin"));
    }

    #[test]
    fn parse_frontmatter_absent_or_invalid() {
        assert!(parse_frontmatter("# T\nbody").is_none());
        assert!(parse_frontmatter("---\ntitle: T\n# never closed").is_none());
        assert!(parse_frontmatter("---\n- a list\n---\n").is_none());
        assert!(parse_frontmatter("---\n---\n").unwrap().is_empty());
    }

    #[test]
    fn fs_vault_read_modify_rename() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();
        fs::write(dir.path().join("notes/Old.md"), "# Old\n").unwrap();

        let mut vault = FsVault::new(dir.path());
        assert_eq!(vault.read("notes/Old.md").unwrap(), "# Old\n");

        vault.modify("notes/Old.md", "# New\n").unwrap();
        assert!(!dir.path().join("notes/Old.md.tmp").exists());

        vault.rename("notes/Old.md", "notes/New.md").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("notes/New.md")).unwrap(),
            "# New\n"
        );
        assert!(matches!(
            vault.read("notes/Old.md"),
            Err(VaultError::NotFound(_))
        ));
    }

    #[test]
    fn fs_vault_rename_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A.md"), "a").unwrap();
        fs::write(dir.path().join("B.md"), "b").unwrap();

        let mut vault = FsVault::new(dir.path());
        assert!(matches!(
            vault.rename("A.md", "B.md"),
            Err(VaultError::AlreadyExists(_))
        ));
        assert_eq!(fs::read_to_string(dir.path().join("B.md")).unwrap(), "b");
    }

    #[test]
    fn fs_vault_modify_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut vault = FsVault::new(dir.path());
        assert!(matches!(
            vault.modify("missing.md", "x"),
            Err(VaultError::NotFound(_))
        ));
    }

    #[test]
    fn memory_vault_tracks_operations() {
        let mut vault = MemoryVault::new().with_file("a.md", "# A");
        vault.modify("a.md", "# B").unwrap();
        vault.rename("a.md", "b.md").unwrap();

        assert_eq!(vault.get("b.md"), Some("# B"));
        assert_eq!(vault.writes(), 1);
        assert_eq!(vault.renames(), &[("a.md".to_string(), "b.md".to_string())]);
        assert!(vault.frontmatter("b.md").unwrap().is_none());
    }
}
