//! Watch mode
//!
//! Watches the vault and feeds filesystem events into the sync engine.
//! Everything the engine changes is written to `.titlesync/watch.log`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};

use super::notes::{self, Engine};
use super::output::Output;
use crate::storage::{Workspace, STATE_DIR};
use crate::sync::{SyncAction, SyncOutcome, VaultEvent};

/// Maximum journal size before rotation (1MB)
const MAX_LOG_SIZE: u64 = 1024 * 1024;

/// Number of journal files to keep
const LOG_ROTATION_COUNT: usize = 7;

/// How long to block when no sync is pending
const IDLE_WAIT: Duration = Duration::from_secs(60);

/// Extension of the temporary files written by atomic saves
const TEMP_SUFFIX: &str = ".tmp";

/// What the watch loop receives: filesystem events or a shutdown request
enum Message {
    Fs(notify::Result<Event>),
    Shutdown,
}

/// Runs until Ctrl-C or until the watcher shuts down
pub fn run(workspace: &Workspace, output: &Output, active: Option<&Path>) -> Result<()> {
    let journal = workspace.journal_path();
    let mut engine = notes::engine(workspace)?;

    let pinned = active.map(|file| workspace.note_path(file)).transpose()?;

    let (tx, rx) = mpsc::channel::<Message>();
    let fs_tx = tx.clone();
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        let _ = fs_tx.send(Message::Fs(result));
    })
    .context("Failed to start file watcher")?;
    watcher
        .watch(workspace.root(), RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", workspace.root().display()))?;

    ctrlc::set_handler(move || {
        let _ = tx.send(Message::Shutdown);
    })
    .context("Failed to install Ctrl-C handler")?;

    log_message(&journal, &format!("Watching vault: {}", workspace.root().display()))?;
    output.success(&format!("Watching {} (Ctrl-C to stop)", workspace.root().display()));

    if let Some(path) = &pinned {
        let outcome = engine.on_open(path);
        record(&journal, output, path, &outcome)?;
    }

    watch_loop(&mut engine, &rx, workspace, output, pinned)
}

/// Feeds messages to the engine until shutdown, then flushes the pending sync
fn watch_loop(
    engine: &mut Engine,
    rx: &Receiver<Message>,
    workspace: &Workspace,
    output: &Output,
    pinned: Option<String>,
) -> Result<()> {
    let journal = workspace.journal_path();
    let mut active = pinned.clone();
    let mut renames = RenameTracker::default();

    loop {
        let timeout = engine
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_WAIT);

        match rx.recv_timeout(timeout) {
            Ok(Message::Fs(Ok(event))) => {
                let to_vault = |path: &Path| workspace.relative_path(path);
                for vault_event in translate(&event, to_vault, &mut renames) {
                    if pinned.is_none() {
                        if let VaultEvent::Modified { path } = &vault_event {
                            active = Some(path.clone());
                        }
                    }

                    let path = event_path(&vault_event).to_string();
                    let outcome = engine.handle(vault_event, active.as_deref(), Instant::now());
                    if let (Some(current), SyncOutcome::Applied(actions)) = (&active, &outcome) {
                        if let Some(to) = renamed_to(actions, current) {
                            active = Some(to);
                        }
                    }
                    record(&journal, output, &path, &outcome)?;
                }
            }
            Ok(Message::Fs(Err(error))) => {
                log_message(&journal, &format!("Watch error: {}", error))?;
            }
            Ok(Message::Shutdown) => {
                log_message(&journal, "Stopping")?;
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                log_message(&journal, "Watcher disconnected")?;
                break;
            }
        }

        let due = engine.pending().map(str::to_string);
        if let Some(outcome) = engine.poll(Instant::now()) {
            let path = due.unwrap_or_default();
            if let SyncOutcome::Applied(actions) = &outcome {
                if let Some(to) = renamed_to(actions, &path) {
                    active = Some(to);
                }
            }
            record(&journal, output, &path, &outcome)?;
        }

        drain_notices(engine, &journal, output)?;
    }

    let due = engine.pending().map(str::to_string);
    if let Some(outcome) = engine.flush() {
        let path = due.unwrap_or_default();
        record(&journal, output, &path, &outcome)?;
    }
    drain_notices(engine, &journal, output)?;

    Ok(())
}

fn event_path(event: &VaultEvent) -> &str {
    match event {
        VaultEvent::Renamed { path, .. }
        | VaultEvent::Modified { path }
        | VaultEvent::Opened { path } => path,
    }
}

/// New path of `path` if one of the actions renamed it
fn renamed_to(actions: &[SyncAction], path: &str) -> Option<String> {
    actions.iter().find_map(|action| match action {
        SyncAction::Renamed { from, to } if from == path => Some(to.clone()),
        _ => None,
    })
}

fn drain_notices(engine: &mut Engine, journal: &Path, output: &Output) -> Result<()> {
    for notice in engine.take_notices() {
        log_message(journal, &format!("Notice: {}", notice.message))?;
        output.notice(&notice.path, &notice.message);
    }
    Ok(())
}

/// Journals and prints what an event did. Skips stay in the debug log.
fn record(journal: &Path, output: &Output, path: &str, outcome: &SyncOutcome) -> Result<()> {
    match outcome {
        SyncOutcome::Applied(actions) => {
            for action in actions {
                log_message(journal, &action.to_string())?;
                output.success(&action.to_string());
            }
        }
        SyncOutcome::Failed(message) => {
            log_message(journal, &format!("Failed: {}", message))?;
        }
        SyncOutcome::Skipped(reason) => {
            tracing::debug!(path, %reason, "Skipped");
        }
        SyncOutcome::Deferred => {
            tracing::trace!(path, "Deferred");
        }
    }
    Ok(())
}

/// Pairs split rename events.
///
/// Some backends report a rename as a "from" event, a "to" event and then a
/// combined event for the same pair. The pair completed by "to" is kept so
/// the combined event that repeats it is dropped.
#[derive(Debug, Default)]
struct RenameTracker {
    from: Option<String>,
    paired: Option<(String, String)>,
}

/// Converts a filesystem event into vault events.
///
/// Atomic saves show up as a rename from a temporary file onto the note and
/// are reported as a modification.
fn translate(
    event: &Event,
    to_vault: impl Fn(&Path) -> Option<String>,
    renames: &mut RenameTracker,
) -> Vec<VaultEvent> {
    let paths: Vec<Option<String>> = event.paths.iter().map(|p| to_vault(p.as_path())).collect();

    match &event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match paths.as_slice() {
            [Some(from), Some(to)] => {
                let repeat = renames
                    .paired
                    .take()
                    .is_some_and(|(seen_from, seen_to)| &seen_from == from && &seen_to == to);
                if repeat {
                    vec![]
                } else {
                    renamed(from, to)
                }
            }
            [None, Some(to)] if !should_ignore_path(to) => {
                vec![VaultEvent::Modified { path: to.clone() }]
            }
            _ => vec![],
        },
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            renames.from = paths.into_iter().flatten().next();
            renames.paired = None;
            vec![]
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            let Some(to) = paths.into_iter().flatten().next() else {
                return vec![];
            };
            match renames.from.take() {
                Some(from) => {
                    let events = renamed(&from, &to);
                    renames.paired = Some((from, to));
                    events
                }
                None if !should_ignore_path(&to) => vec![VaultEvent::Modified { path: to }],
                None => vec![],
            }
        }
        EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Any)
        | EventKind::Modify(ModifyKind::Other) => paths
            .into_iter()
            .flatten()
            .filter(|path| !should_ignore_path(path))
            .map(|path| VaultEvent::Modified { path })
            .collect(),
        _ => vec![],
    }
}

fn renamed(from: &str, to: &str) -> Vec<VaultEvent> {
    if should_ignore_path(to) {
        return vec![];
    }
    if from.ends_with(TEMP_SUFFIX) || should_ignore_path(from) {
        return vec![VaultEvent::Modified {
            path: to.to_string(),
        }];
    }
    vec![VaultEvent::Renamed {
        path: to.to_string(),
        old_path: from.to_string(),
    }]
}

/// Checks if a vault path should be ignored by the watcher
fn should_ignore_path(path: &str) -> bool {
    if path.is_empty() || path.ends_with(TEMP_SUFFIX) {
        return true;
    }

    // Hidden folders, including our own state folder
    path.split('/')
        .any(|part| part.starts_with('.') || part == STATE_DIR)
}

/// Appends a line to the watch journal
fn log_message(journal: &Path, message: &str) -> Result<()> {
    rotate_logs_if_needed(journal)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(journal)
        .context("Failed to open watch journal")?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "[{}] {}", timestamp, message)?;

    Ok(())
}

/// Rotates the journal once it exceeds MAX_LOG_SIZE
fn rotate_logs_if_needed(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let metadata = fs::metadata(log_path)?;
    if metadata.len() < MAX_LOG_SIZE {
        return Ok(());
    }

    for i in (1..LOG_ROTATION_COUNT).rev() {
        let old_path = log_path.with_extension(format!("log.{}", i));
        let new_path = log_path.with_extension(format!("log.{}", i + 1));
        if old_path.exists() {
            if i + 1 >= LOG_ROTATION_COUNT {
                fs::remove_file(&old_path)?;
            } else {
                fs::rename(&old_path, &new_path)?;
            }
        }
    }

    fs::rename(log_path, log_path.with_extension("log.1"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::OutputFormat;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn vault_path(path: &Path) -> Option<String> {
        path.strip_prefix("/vault")
            .ok()
            .map(|p| p.to_string_lossy().into_owned())
    }

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |event, path| event.add_path(PathBuf::from(path)))
    }

    #[test]
    fn test_should_ignore_path() {
        assert!(should_ignore_path(".titlesync/config.toml"));
        assert!(should_ignore_path(".obsidian/workspace.json"));
        assert!(should_ignore_path("notes/A.md.tmp"));
        assert!(should_ignore_path(""));

        assert!(!should_ignore_path("notes/A.md"));
        assert!(!should_ignore_path("A.md"));
    }

    #[test]
    fn rename_becomes_rename_event() {
        let mut renames = RenameTracker::default();
        let ev = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/vault/Old.md", "/vault/New.md"],
        );

        assert_eq!(
            translate(&ev, vault_path, &mut renames),
            vec![VaultEvent::Renamed {
                path: "New.md".to_string(),
                old_path: "Old.md".to_string(),
            }]
        );
    }

    #[test]
    fn atomic_save_becomes_modify() {
        let mut renames = RenameTracker::default();
        let ev = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/vault/A.md.tmp", "/vault/A.md"],
        );

        assert_eq!(
            translate(&ev, vault_path, &mut renames),
            vec![VaultEvent::Modified {
                path: "A.md".to_string()
            }]
        );
    }

    #[test]
    fn split_rename_is_paired() {
        let mut renames = RenameTracker::default();
        let first = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/vault/Old.md"],
        );
        let second = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/vault/New.md"],
        );

        assert!(translate(&first, vault_path, &mut renames).is_empty());
        assert_eq!(
            translate(&second, vault_path, &mut renames),
            vec![VaultEvent::Renamed {
                path: "New.md".to_string(),
                old_path: "Old.md".to_string(),
            }]
        );
        assert!(renames.from.is_none());
    }

    #[test]
    fn combined_event_after_split_rename_is_dropped() {
        let mut renames = RenameTracker::default();
        let from = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/vault/Old.md"],
        );
        let to = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/vault/New.md"],
        );
        let both = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/vault/Old.md", "/vault/New.md"],
        );

        let mut events = translate(&from, vault_path, &mut renames);
        events.extend(translate(&to, vault_path, &mut renames));
        events.extend(translate(&both, vault_path, &mut renames));

        assert_eq!(
            events,
            vec![VaultEvent::Renamed {
                path: "New.md".to_string(),
                old_path: "Old.md".to_string(),
            }]
        );

        // A later rename of the same pair is reported again
        assert_eq!(translate(&both, vault_path, &mut renames).len(), 1);
    }

    #[test]
    fn split_atomic_save_is_one_modify() {
        let mut renames = RenameTracker::default();
        let from = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/vault/A.md.tmp"],
        );
        let to = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/vault/A.md"],
        );
        let both = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/vault/A.md.tmp", "/vault/A.md"],
        );

        let mut events = translate(&from, vault_path, &mut renames);
        events.extend(translate(&to, vault_path, &mut renames));
        events.extend(translate(&both, vault_path, &mut renames));

        assert_eq!(
            events,
            vec![VaultEvent::Modified {
                path: "A.md".to_string()
            }]
        );
    }

    #[test]
    fn data_change_becomes_modify() {
        let mut renames = RenameTracker::default();
        let ev = event(
            EventKind::Modify(ModifyKind::Data(notify::event::DataChange::Content)),
            &["/vault/A.md", "/vault/.titlesync/watch.log"],
        );

        assert_eq!(
            translate(&ev, vault_path, &mut renames),
            vec![VaultEvent::Modified {
                path: "A.md".to_string()
            }]
        );
    }

    #[test]
    fn shutdown_flushes_pending_edit() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path()).unwrap();
        fs::write(dir.path().join("Draft.md"), "# Draft\n").unwrap();

        let mut engine = notes::engine(&workspace).unwrap();
        engine.on_open("Draft.md");
        fs::write(dir.path().join("Draft.md"), "# Final\n").unwrap();

        let (tx, rx) = mpsc::channel();
        let modified = event(
            EventKind::Modify(ModifyKind::Data(notify::event::DataChange::Content)),
            &[dir.path().join("Draft.md").to_str().unwrap()],
        );
        tx.send(Message::Fs(Ok(modified))).unwrap();
        tx.send(Message::Shutdown).unwrap();

        let output = Output::new(OutputFormat::Text);
        watch_loop(&mut engine, &rx, &workspace, &output, None).unwrap();

        assert!(engine.pending().is_none());
        assert!(dir.path().join("Final.md").is_file());
        assert!(!dir.path().join("Draft.md").exists());

        let journal = fs::read_to_string(workspace.journal_path()).unwrap();
        assert!(journal.contains("Stopping"));
        assert!(journal.contains("renamed Draft.md -> Final.md"));
    }

    #[test]
    fn journal_rotates_when_full() {
        let dir = TempDir::new().unwrap();
        let journal = dir.path().join("watch.log");
        fs::write(&journal, vec![b'x'; MAX_LOG_SIZE as usize]).unwrap();

        log_message(&journal, "fresh").unwrap();

        assert!(dir.path().join("watch.log.1").is_file());
        let content = fs::read_to_string(&journal).unwrap();
        assert!(content.ends_with("fresh\n"));
    }
}
