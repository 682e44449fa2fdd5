//! titlesync - Keeps note filenames, headings and frontmatter titles in sync
//!
//! A note's title lives in up to three places: its file name, its first
//! level-one heading and a frontmatter key. titlesync watches a markdown
//! vault and propagates whichever one changed to the others.

pub mod domain;
pub mod storage;
pub mod sync;
pub mod cli;

pub use sync::{Direction, SyncEngine, SyncOutcome, VaultEvent};
