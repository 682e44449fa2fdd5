//! # Sync Layer
//!
//! Decides when and how titles are propagated between a note's filename,
//! its first heading and its frontmatter title.
//!
//! - [`SyncEngine`] - Routes vault events and commands to sync passes
//! - [`Debouncer`] - Delays modify-triggered syncs until typing stops
//! - [`rules`] - Exclusions and the ignore/include file rules

mod debounce;
mod engine;
pub mod rules;

pub use debounce::Debouncer;
pub use engine::{
    ContentSource, Direction, NoteStatus, Notice, SkipReason, SyncAction, SyncEngine, SyncError,
    SyncOutcome, VaultEvent,
};
pub use rules::{eligibility, Eligibility};
