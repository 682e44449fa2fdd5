//! Note file paths
//!
//! Vault paths are relative and `/`-separated. Only markdown files are notes;
//! everything else the host reports (folders, attachments) is filtered out
//! by [`NoteFile::parse`] before it reaches the sync engine.

use std::fmt;

/// Extension of files that carry a title
pub const NOTE_EXTENSION: &str = "md";

/// A markdown file in the vault
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteFile {
    path: String,
}

impl NoteFile {
    /// Returns a note for markdown paths, `None` for anything else
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_start_matches("./").replace('\\', "/");
        let name = path.rsplit('/').next()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || !ext.eq_ignore_ascii_case(NOTE_EXTENSION) {
            return None;
        }
        Some(Self { path })
    }

    /// Vault-relative path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name including extension
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// File name without directory and extension, the filename title
    pub fn basename(&self) -> &str {
        let name = self.name();
        name.rsplit_once('.').map_or(name, |(stem, _)| stem)
    }

    /// File extension as written
    pub fn extension(&self) -> &str {
        let name = self.name();
        name.rsplit_once('.').map_or("", |(_, ext)| ext)
    }

    /// Parent folder, `None` at the vault root
    pub fn parent(&self) -> Option<&str> {
        self.path.rsplit_once('/').map(|(parent, _)| parent)
    }

    /// Same folder and extension, different basename
    pub fn with_basename(&self, basename: &str) -> Self {
        let name = format!("{}.{}", basename, self.extension());
        let path = match self.parent() {
            Some(parent) => format!("{}/{}", parent, name),
            None => name,
        };
        Self { path }
    }
}

impl fmt::Display for NoteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_markdown_paths() {
        let note = NoteFile::parse("folder/sub/My Note.md").unwrap();
        assert_eq!(note.path(), "folder/sub/My Note.md");
        assert_eq!(note.name(), "My Note.md");
        assert_eq!(note.basename(), "My Note");
        assert_eq!(note.extension(), "md");
        assert_eq!(note.parent(), Some("folder/sub"));
    }

    #[test]
    fn rejects_non_markdown() {
        assert!(NoteFile::parse("image.png").is_none());
        assert!(NoteFile::parse("folder").is_none());
        assert!(NoteFile::parse("board.canvas").is_none());
        assert!(NoteFile::parse(".md").is_none());
    }

    #[test]
    fn keeps_inner_dots_in_basename() {
        let note = NoteFile::parse("v1.2 notes.md").unwrap();
        assert_eq!(note.basename(), "v1.2 notes");
    }

    #[test]
    fn with_basename_keeps_folder() {
        let note = NoteFile::parse("a/Old.md").unwrap();
        assert_eq!(note.with_basename("New").path(), "a/New.md");

        let root = NoteFile::parse("Old.MD").unwrap();
        assert_eq!(root.with_basename("New").path(), "New.MD");
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn normalizes_separators() {
        let note = NoteFile::parse("./a\\b.md").unwrap();
        assert_eq!(note.path(), "a/b.md");
    }
}
