//! Title synchronization engine
//!
//! [`SyncEngine`] owns the settings, the title cache and the debounce timer,
//! and reacts to vault events:
//!
//! - **rename**: the new filename is written into the heading and/or
//!   frontmatter.
//! - **modify** (active note only, debounced): whichever of heading and
//!   frontmatter changed since last seen is written to the other targets,
//!   renaming the file last.
//! - **open**: like rename, and primes the title cache.
//!
//! Host failures (a rename colliding with an existing file, a failed write)
//! never escape an event handler. They are logged, queued as a [`Notice`] for
//! the host to show, and reported as [`SyncOutcome::Failed`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::rules::{self, Eligibility};
use crate::domain::{
    find_frontmatter_title, find_heading, find_note_start, write_frontmatter_title,
    write_heading, CachedTitles, Document, NoteFile, Sanitizer, TitleCache, TitleLocation,
};
use crate::storage::{
    ConfigError, FilenameTargets, MatchMode, Precedence, Settings, SettingsStore, Vault,
    VaultError,
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Settings store error: {0:#}")]
    Settings(anyhow::Error),

    #[error("Not a markdown note: {0}")]
    NotANote(String),
}

/// A change reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    Renamed { path: String, old_path: String },
    Modified { path: String },
    Opened { path: String },
}

/// Title inside the note used as the source of a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Heading,
    Frontmatter,
}

/// A one-way sync requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    FilenameToHeading,
    HeadingToFilename,
    FilenameToFrontmatter,
    FrontmatterToFilename,
    HeadingToFrontmatter,
    FrontmatterToHeading,
}

impl Direction {
    pub fn all() -> &'static [Direction] {
        &[
            Direction::FilenameToHeading,
            Direction::HeadingToFilename,
            Direction::FilenameToFrontmatter,
            Direction::FrontmatterToFilename,
            Direction::HeadingToFrontmatter,
            Direction::FrontmatterToHeading,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::FilenameToHeading => "filename-to-heading",
            Direction::HeadingToFilename => "heading-to-filename",
            Direction::FilenameToFrontmatter => "filename-to-frontmatter",
            Direction::FrontmatterToFilename => "frontmatter-to-filename",
            Direction::HeadingToFrontmatter => "heading-to-frontmatter",
            Direction::FrontmatterToHeading => "frontmatter-to-heading",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Direction::all()
            .iter()
            .copied()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<_> = Direction::all().iter().map(|d| d.as_str()).collect();
                format!("Unknown direction '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// A change made to the vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    HeadingWritten { path: String, title: String },
    FrontmatterWritten { path: String, title: String },
    Renamed { from: String, to: String },
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::HeadingWritten { path, title } => {
                write!(f, "{}: heading set to '{}'", path, title)
            }
            SyncAction::FrontmatterWritten { path, title } => {
                write!(f, "{}: frontmatter title set to '{}'", path, title)
            }
            SyncAction::Renamed { from, to } => write!(f, "renamed {} -> {}", from, to),
        }
    }
}

/// Why an event or command did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotANote,
    Excluded,
    Ignored,
    NotIncluded,
    /// Modified note is not the active one
    Inactive,
    HookDisabled,
    /// Echo of a rename the engine issued itself
    OwnRename,
    /// The source title does not exist in the note
    NoSource,
    /// The source title sanitizes to nothing
    EmptyTitle,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NotANote => "not a markdown note",
            SkipReason::Excluded => "excluded file type",
            SkipReason::Ignored => "ignored",
            SkipReason::NotIncluded => "not included",
            SkipReason::Inactive => "not the active note",
            SkipReason::HookDisabled => "hook disabled",
            SkipReason::OwnRename => "own rename",
            SkipReason::NoSource => "no source title",
            SkipReason::EmptyTitle => "title is empty after sanitizing",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Eligibility> for SkipReason {
    fn from(eligibility: Eligibility) -> Self {
        match eligibility {
            Eligibility::Ignored => SkipReason::Ignored,
            Eligibility::NotIncluded => SkipReason::NotIncluded,
            _ => SkipReason::Excluded,
        }
    }
}

/// Result of handling one event or command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Sync ran; empty when everything already agreed
    Applied(Vec<SyncAction>),
    Skipped(SkipReason),
    /// Waiting for the debounce period to pass
    Deferred,
    Failed(String),
}

impl SyncOutcome {
    pub fn actions(&self) -> &[SyncAction] {
        match self {
            SyncOutcome::Applied(actions) => actions,
            _ => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SyncOutcome::Failed(_))
    }
}

/// A one-shot message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub path: String,
    pub message: String,
}

/// Titles of one note as seen right now
#[derive(Debug, Clone, Serialize)]
pub struct NoteStatus {
    pub path: String,
    pub filename_title: String,
    pub heading: Option<TitleLocation>,
    pub frontmatter: Option<TitleLocation>,
    pub eligibility: Eligibility,
    pub in_sync: bool,
}

/// Keeps filenames, headings and frontmatter titles in agreement
pub struct SyncEngine<V, S> {
    vault: V,
    store: S,
    settings: Settings,
    sanitizer: Sanitizer,
    cache: TitleCache,
    debouncer: Debouncer,
    /// Destinations of renames issued by the engine whose event has not arrived yet
    own_renames: HashSet<String>,
    notices: Vec<Notice>,
}

impl<V: Vault, S: SettingsStore> SyncEngine<V, S> {
    /// Creates an engine with settings loaded from `store`
    pub fn new(vault: V, store: S) -> Result<Self, SyncError> {
        let settings = store.load().map_err(SyncError::Settings)?;
        settings.validate()?;

        Ok(Self {
            vault,
            store,
            sanitizer: settings.sanitizer(),
            debouncer: Debouncer::new(Duration::from_millis(settings.debounce_ms)),
            settings,
            cache: TitleCache::default(),
            own_renames: HashSet::new(),
            notices: Vec::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Changes settings, validating and persisting them
    pub fn update_settings(&mut self, update: impl FnOnce(&mut Settings)) -> Result<(), SyncError> {
        let mut next = self.settings.clone();
        update(&mut next);
        next.validate()?;
        self.store.save(&next).map_err(SyncError::Settings)?;

        self.sanitizer = next.sanitizer();
        self.debouncer
            .set_delay(Duration::from_millis(next.debounce_ms));
        self.settings = next;
        Ok(())
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn vault_mut(&mut self) -> &mut V {
        &mut self.vault
    }

    pub fn cache(&self) -> &TitleCache {
        &self.cache
    }

    /// Notices queued since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Note waiting for its debounce period to end
    pub fn pending(&self) -> Option<&str> {
        self.debouncer.pending()
    }

    /// When the debounced note is due, if one is pending
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Dispatches a host event.
    ///
    /// `active` is the note currently being edited; modifications of any
    /// other note are ignored.
    pub fn handle(&mut self, event: VaultEvent, active: Option<&str>, now: Instant) -> SyncOutcome {
        match event {
            VaultEvent::Renamed { path, old_path } => self.on_rename(&path, &old_path),
            VaultEvent::Modified { path } => self.on_modify(&path, active, now),
            VaultEvent::Opened { path } => self.on_open(&path),
        }
    }

    /// Handles a note moved from `old_path` to `path`
    pub fn on_rename(&mut self, path: &str, old_path: &str) -> SyncOutcome {
        if self.own_renames.remove(path) {
            debug!(path, "Rename issued by titlesync, not syncing it back");
            return SyncOutcome::Skipped(SkipReason::OwnRename);
        }

        self.cache.relocate(old_path, path);
        self.debouncer.relocate(old_path, path);

        let was_listed = rules::is_listed(&self.settings, old_path);
        if was_listed && self.settings.relist(old_path, path) {
            debug!(old_path, path, "Moved file list entry");
            if let Err(e) = self.persist() {
                return self.fail(path, e);
            }
        }
        if was_listed && self.settings.match_mode == MatchMode::Ignore {
            debug!(path, "Renamed note is ignored");
            return SyncOutcome::Skipped(SkipReason::Ignored);
        }

        let note = match self.admit(path) {
            Ok(note) => note,
            Err(outcome) => return outcome,
        };
        let targets = self.settings.filename_targets;
        let result = self.sync_from_filename(&note, targets);
        self.settle(path, result)
    }

    /// Handles a modification of `path`, debounced when enabled
    pub fn on_modify(&mut self, path: &str, active: Option<&str>, now: Instant) -> SyncOutcome {
        if !self.settings.use_file_save_hook {
            return SyncOutcome::Skipped(SkipReason::HookDisabled);
        }
        if active != Some(path) {
            debug!(path, ?active, "Modified note is not active");
            return SyncOutcome::Skipped(SkipReason::Inactive);
        }
        if let Err(outcome) = self.admit(path) {
            return outcome;
        }

        if self.settings.use_debounce {
            self.debouncer.schedule(path, now);
            return SyncOutcome::Deferred;
        }
        self.reconcile_path(path)
    }

    /// Runs the debounced sync once its quiet period is over
    pub fn poll(&mut self, now: Instant) -> Option<SyncOutcome> {
        let path = self.debouncer.poll(now)?;
        Some(self.reconcile_path(&path))
    }

    /// Runs the debounced sync immediately, if one is pending
    pub fn flush(&mut self) -> Option<SyncOutcome> {
        let path = self.debouncer.cancel()?;
        Some(self.reconcile_path(&path))
    }

    /// Handles a note being opened
    pub fn on_open(&mut self, path: &str) -> SyncOutcome {
        let note = match self.admit(path) {
            Ok(note) => note,
            Err(outcome) => return outcome,
        };

        if !self.settings.use_file_open_hook {
            let primed = self.vault.read(path).map(|text| {
                self.remember(path, &Document::parse(&text));
                SyncOutcome::Skipped(SkipReason::HookDisabled)
            });
            return self.settle(path, primed.map_err(SyncError::from));
        }

        let targets = self.settings.filename_targets;
        let result = self.sync_from_filename(&note, targets);
        self.settle(path, result)
    }

    /// Runs a single sync direction on a note
    pub fn sync(&mut self, direction: Direction, path: &str) -> SyncOutcome {
        let note = match self.admit(path) {
            Ok(note) => note,
            Err(outcome) => return outcome,
        };

        let only_heading = FilenameTargets {
            heading: true,
            frontmatter: false,
        };
        let only_frontmatter = FilenameTargets {
            heading: false,
            frontmatter: true,
        };

        let result = match direction {
            Direction::FilenameToHeading => self.sync_from_filename(&note, only_heading),
            Direction::FilenameToFrontmatter => self.sync_from_filename(&note, only_frontmatter),
            Direction::HeadingToFilename => {
                self.sync_from_content(&note, ContentSource::Heading, false, true)
            }
            Direction::HeadingToFrontmatter => {
                self.sync_from_content(&note, ContentSource::Heading, true, false)
            }
            Direction::FrontmatterToFilename => {
                self.sync_from_content(&note, ContentSource::Frontmatter, false, true)
            }
            Direction::FrontmatterToHeading => {
                self.sync_from_content(&note, ContentSource::Frontmatter, true, false)
            }
        };
        self.settle(path, result)
    }

    /// Stops syncing a note. Returns false if it was already not synced.
    pub fn ignore_file(&mut self, path: &str) -> Result<bool, SyncError> {
        let changed = match self.settings.match_mode {
            MatchMode::Ignore => self
                .settings
                .listed_files
                .insert(path.to_string(), Utc::now())
                .is_none(),
            MatchMode::Include => self.settings.listed_files.remove(path).is_some(),
        };
        if changed {
            info!(path, mode = self.settings.match_mode.as_str(), "Stopped syncing note");
            self.persist()?;
        }
        Ok(changed)
    }

    /// Resumes syncing a note. Returns false if nothing changed.
    pub fn unignore_file(&mut self, path: &str) -> Result<bool, SyncError> {
        let changed = match self.settings.match_mode {
            MatchMode::Ignore => self.settings.listed_files.remove(path).is_some(),
            MatchMode::Include => self
                .settings
                .listed_files
                .insert(path.to_string(), Utc::now())
                .is_none(),
        };
        if changed {
            info!(path, mode = self.settings.match_mode.as_str(), "Resumed syncing note");
            self.persist()?;
        }
        Ok(changed)
    }

    /// Reports where a note's titles are and whether they agree
    pub fn inspect(&self, path: &str) -> Result<NoteStatus, SyncError> {
        let note = NoteFile::parse(path).ok_or_else(|| SyncError::NotANote(path.to_string()))?;
        let text = self.vault.read(path)?;
        let doc = Document::parse(&text);
        let frontmatter = self.vault.frontmatter(path)?;

        let filename_title = self.sanitizer.sanitize(note.basename());
        let heading = find_heading(&doc.lines, find_note_start(&doc.lines));
        let fm_title = find_frontmatter_title(&doc.lines, &self.settings.frontmatter_key);

        let in_sync = [&heading, &fm_title]
            .into_iter()
            .flatten()
            .all(|found| self.sanitizer.sanitize(&found.text) == filename_title);

        Ok(NoteStatus {
            path: note.path().to_string(),
            filename_title,
            heading,
            frontmatter: fm_title,
            eligibility: rules::eligibility(&self.settings, path, frontmatter.as_ref()),
            in_sync,
        })
    }

    /// Checks a note may be synced, producing the outcome to return if not
    fn admit(&mut self, path: &str) -> Result<NoteFile, SyncOutcome> {
        let Some(note) = NoteFile::parse(path) else {
            return Err(SyncOutcome::Skipped(SkipReason::NotANote));
        };

        let frontmatter = match self.vault.frontmatter(path) {
            Ok(frontmatter) => frontmatter,
            Err(e) => return Err(self.fail(path, e.into())),
        };

        match rules::eligibility(&self.settings, path, frontmatter.as_ref()) {
            Eligibility::Eligible => Ok(note),
            other => {
                debug!(path, ?other, "Skipping note");
                Err(SyncOutcome::Skipped(other.into()))
            }
        }
    }

    fn reconcile_path(&mut self, path: &str) -> SyncOutcome {
        let note = match self.admit(path) {
            Ok(note) => note,
            Err(outcome) => return outcome,
        };
        let result = self.reconcile(&note);
        self.settle(path, result)
    }

    /// Propagates whichever content title changed since it was last seen.
    ///
    /// Without a cache entry every title present counts as changed. When both
    /// changed, the configured precedence decides the source.
    fn reconcile(&mut self, note: &NoteFile) -> Result<SyncOutcome, SyncError> {
        let doc = Document::parse(&self.vault.read(note.path())?);
        let observed = self.observe(&doc);
        let previous = self.cache.get(note.path()).cloned();

        let changed = |now: &Option<String>, before: Option<&Option<String>>| {
            now.is_some() && before.is_none_or(|before| before != now)
        };
        let heading_changed = changed(&observed.heading, previous.as_ref().map(|p| &p.heading));
        let frontmatter_changed = changed(
            &observed.frontmatter,
            previous.as_ref().map(|p| &p.frontmatter),
        );

        let source = match (heading_changed, frontmatter_changed) {
            (true, true) => match self.settings.precedence {
                Precedence::Heading => ContentSource::Heading,
                Precedence::Frontmatter => ContentSource::Frontmatter,
            },
            (true, false) => ContentSource::Heading,
            (false, true) => ContentSource::Frontmatter,
            (false, false) => {
                self.cache.put(note.path(), observed);
                return Ok(SyncOutcome::Applied(vec![]));
            }
        };
        debug!(path = note.path(), ?source, "Title changed");

        let (counterpart, filename) = match source {
            ContentSource::Heading => (
                self.settings.heading_targets.frontmatter,
                self.settings.heading_targets.filename,
            ),
            ContentSource::Frontmatter => (
                self.settings.frontmatter_targets.heading,
                self.settings.frontmatter_targets.filename,
            ),
        };
        self.apply_content(note, doc, source, counterpart, filename)
    }

    /// Writes the filename title into the heading and/or frontmatter
    fn sync_from_filename(
        &mut self,
        note: &NoteFile,
        targets: FilenameTargets,
    ) -> Result<SyncOutcome, SyncError> {
        let mut doc = Document::parse(&self.vault.read(note.path())?);
        let title = self.sanitizer.sanitize(note.basename());
        if title.is_empty() {
            self.remember(note.path(), &doc);
            return Ok(SyncOutcome::Skipped(SkipReason::EmptyTitle));
        }

        let mut actions = Vec::new();

        if targets.heading {
            let current = find_heading(&doc.lines, find_note_start(&doc.lines))
                .map(|found| self.sanitizer.sanitize(&found.text));
            if current.as_deref() != Some(title.as_str()) {
                write_heading(&mut doc, note.basename(), &self.settings.heading_format());
                actions.push(SyncAction::HeadingWritten {
                    path: note.path().to_string(),
                    title: note.basename().to_string(),
                });
            }
        }

        if targets.frontmatter {
            let key = &self.settings.frontmatter_key;
            let current = find_frontmatter_title(&doc.lines, key)
                .map(|found| self.sanitizer.sanitize(&found.text));
            if current.as_deref() != Some(title.as_str()) {
                write_frontmatter_title(&mut doc, key, note.basename());
                actions.push(SyncAction::FrontmatterWritten {
                    path: note.path().to_string(),
                    title: note.basename().to_string(),
                });
            }
        }

        if !actions.is_empty() {
            self.vault.modify(note.path(), &doc.render())?;
            for action in &actions {
                info!("{}", action);
            }
        }
        self.remember(note.path(), &doc);
        Ok(SyncOutcome::Applied(actions))
    }

    fn sync_from_content(
        &mut self,
        note: &NoteFile,
        source: ContentSource,
        counterpart: bool,
        filename: bool,
    ) -> Result<SyncOutcome, SyncError> {
        let doc = Document::parse(&self.vault.read(note.path())?);
        self.apply_content(note, doc, source, counterpart, filename)
    }

    /// Writes a content title to the other content title and/or the filename.
    ///
    /// The file is renamed last, after its content has been written.
    fn apply_content(
        &mut self,
        note: &NoteFile,
        mut doc: Document,
        source: ContentSource,
        counterpart: bool,
        filename: bool,
    ) -> Result<SyncOutcome, SyncError> {
        let key = self.settings.frontmatter_key.clone();
        let found = match source {
            ContentSource::Heading => find_heading(&doc.lines, find_note_start(&doc.lines)),
            ContentSource::Frontmatter => find_frontmatter_title(&doc.lines, &key),
        };

        let Some(found) = found else {
            self.remember(note.path(), &doc);
            return Ok(SyncOutcome::Skipped(SkipReason::NoSource));
        };
        let raw = found.text.trim().to_string();
        let title = self.sanitizer.sanitize(&raw);
        if title.is_empty() {
            self.remember(note.path(), &doc);
            return Ok(SyncOutcome::Skipped(SkipReason::EmptyTitle));
        }

        let mut actions = Vec::new();

        if counterpart {
            match source {
                ContentSource::Heading => {
                    let current = find_frontmatter_title(&doc.lines, &key)
                        .map(|t| self.sanitizer.sanitize(&t.text));
                    if current.as_deref() != Some(title.as_str()) {
                        write_frontmatter_title(&mut doc, &key, &raw);
                        actions.push(SyncAction::FrontmatterWritten {
                            path: note.path().to_string(),
                            title: raw.clone(),
                        });
                    }
                }
                ContentSource::Frontmatter => {
                    let current = find_heading(&doc.lines, find_note_start(&doc.lines))
                        .map(|t| self.sanitizer.sanitize(&t.text));
                    if current.as_deref() != Some(title.as_str()) {
                        write_heading(&mut doc, &raw, &self.settings.heading_format());
                        actions.push(SyncAction::HeadingWritten {
                            path: note.path().to_string(),
                            title: raw.clone(),
                        });
                    }
                }
            }

            if !actions.is_empty() {
                self.vault.modify(note.path(), &doc.render())?;
                for action in &actions {
                    info!("{}", action);
                }
            }
        }
        self.remember(note.path(), &doc);

        if filename && title != self.sanitizer.sanitize(note.basename()) {
            let target = note.with_basename(&title);
            self.rename_note(note, &target)?;
            actions.push(SyncAction::Renamed {
                from: note.path().to_string(),
                to: target.path().to_string(),
            });
        }

        Ok(SyncOutcome::Applied(actions))
    }

    /// Renames a note, marking the rename as our own until its event arrives
    fn rename_note(&mut self, note: &NoteFile, target: &NoteFile) -> Result<(), SyncError> {
        self.own_renames.insert(target.path().to_string());
        if let Err(e) = self.vault.rename(note.path(), target.path()) {
            self.own_renames.remove(target.path());
            return Err(e.into());
        }

        info!(from = note.path(), to = target.path(), "Renamed note");
        self.cache.relocate(note.path(), target.path());
        self.debouncer.relocate(note.path(), target.path());
        if self.settings.relist(note.path(), target.path()) {
            self.persist()?;
        }
        Ok(())
    }

    fn observe(&self, doc: &Document) -> CachedTitles {
        CachedTitles {
            heading: find_heading(&doc.lines, find_note_start(&doc.lines)).map(|h| h.text),
            frontmatter: find_frontmatter_title(&doc.lines, &self.settings.frontmatter_key)
                .map(|f| f.text),
        }
    }

    fn remember(&mut self, path: &str, doc: &Document) {
        let titles = self.observe(doc);
        self.cache.put(path, titles);
    }

    fn persist(&mut self) -> Result<(), SyncError> {
        self.store
            .save(&self.settings)
            .map_err(SyncError::Settings)
    }

    fn settle(&mut self, path: &str, result: Result<SyncOutcome, SyncError>) -> SyncOutcome {
        result.unwrap_or_else(|e| self.fail(path, e))
    }

    fn fail(&mut self, path: &str, error: SyncError) -> SyncOutcome {
        let message = match &error {
            SyncError::Vault(VaultError::AlreadyExists(target)) => {
                format!("Could not rename {}: {} already exists", path, target)
            }
            other => format!("Could not sync {}: {}", path, other),
        };
        warn!("{}", message);
        self.notices.push(Notice {
            path: path.to_string(),
            message: message.clone(),
        });
        SyncOutcome::Failed(message)
    }
}
