//! Title model for titlesync
//!
//! Contains the pure title logic without any I/O concerns: sanitizing,
//! locating and rewriting titles, plus the per-note title cache.

mod document;
mod locator;
mod note;
mod rewriter;
mod sanitize;
mod title_cache;

pub use document::Document;
pub use locator::{
    find_frontmatter_title, find_heading, find_note_start, frontmatter_end, TitleLocation,
    TitleStyle, FRONTMATTER_DELIMITER,
};
pub use note::{NoteFile, NOTE_EXTENSION};
pub use rewriter::{
    insert_heading, replace_heading, write_frontmatter_title, write_heading, HeadingFormat,
    HeadingStyle,
};
pub use sanitize::{Sanitizer, ILLEGAL_CHARACTERS};
pub use title_cache::{CachedTitles, TitleCache, TITLE_CACHE_CAPACITY};
