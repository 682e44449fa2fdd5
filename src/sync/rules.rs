//! Which notes take part in syncing
//!
//! Some file types are always excluded. On top of that the manual file list
//! and the path regex either ignore files (ignore mode) or are the only files
//! synced (include mode).

use regex::Regex;
use serde::Serialize;

use crate::domain::NoteFile;
use crate::storage::{Frontmatter, MatchMode, Settings};

/// Frontmatter keys marking notes owned by other tools
pub const EXCLUDED_FRONTMATTER_KEYS: &[&str] = &["excalidraw-plugin", "kanban-plugin"];

/// File name suffix of drawing notes
pub const EXCALIDRAW_SUFFIX: &str = ".excalidraw.md";

/// Whether a note may be synced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    /// File type is never synced
    Excluded,
    /// Listed or matched in ignore mode
    Ignored,
    /// Neither listed nor matched in include mode
    NotIncluded,
}

/// Compiles a user path rule. Empty or invalid patterns are no rule at all.
pub fn compile_rule(pattern: &str) -> Option<Regex> {
    if pattern.trim().is_empty() {
        return None;
    }

    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!("Ignoring invalid path rule '{}': {}", pattern, e);
            None
        }
    }
}

/// Returns true for notes that belong to other tools
pub fn is_excluded_type(path: &str, frontmatter: Option<&Frontmatter>) -> bool {
    let Some(note) = NoteFile::parse(path) else {
        return true;
    };

    if note.name().to_lowercase().ends_with(EXCALIDRAW_SUFFIX) {
        return true;
    }

    frontmatter.is_some_and(|fm| {
        EXCLUDED_FRONTMATTER_KEYS
            .iter()
            .any(|key| fm.contains_key(*key))
    })
}

/// Returns true if the path is in the manual list or matches the regex
pub fn is_listed(settings: &Settings, path: &str) -> bool {
    settings.is_listed(path)
        || compile_rule(&settings.ignore_regex).is_some_and(|regex| regex.is_match(path))
}

/// Decides whether the note at `path` may be synced
pub fn eligibility(settings: &Settings, path: &str, frontmatter: Option<&Frontmatter>) -> Eligibility {
    if is_excluded_type(path, frontmatter) {
        return Eligibility::Excluded;
    }

    match (settings.match_mode, is_listed(settings, path)) {
        (MatchMode::Ignore, true) => Eligibility::Ignored,
        (MatchMode::Include, false) => Eligibility::NotIncluded,
        _ => Eligibility::Eligible,
    }
}
