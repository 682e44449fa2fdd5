//! Last-known titles per note
//!
//! When a note is modified the engine compares the heading and frontmatter
//! title it finds against what it saw last time, to tell which of the two
//! the user edited.

use std::num::NonZeroUsize;

use lru::LruCache;

/// Number of notes remembered before the least recently used is evicted
pub const TITLE_CACHE_CAPACITY: usize = 512;

/// Titles observed in a note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedTitles {
    pub heading: Option<String>,
    pub frontmatter: Option<String>,
}

/// Bounded map from note path to its last observed titles
#[derive(Debug)]
pub struct TitleCache {
    entries: LruCache<String, CachedTitles>,
}

impl Default for TitleCache {
    fn default() -> Self {
        Self::with_capacity(TITLE_CACHE_CAPACITY)
    }
}

impl TitleCache {
    /// Creates a cache holding at most `capacity` notes (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Returns the titles for a note, marking it recently used
    pub fn get(&mut self, path: &str) -> Option<&CachedTitles> {
        self.entries.get(path)
    }

    /// Records the titles for a note
    pub fn put(&mut self, path: impl Into<String>, titles: CachedTitles) {
        self.entries.put(path.into(), titles);
    }

    /// Moves an entry to the note's new path
    pub fn relocate(&mut self, old_path: &str, new_path: &str) {
        if let Some(titles) = self.entries.pop(old_path) {
            self.entries.put(new_path.to_string(), titles);
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
