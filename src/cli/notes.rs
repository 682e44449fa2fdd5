//! Note-level commands: status, sync, open and the file list

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use super::output::Output;
use crate::domain::NoteFile;
use crate::storage::{FsVault, MatchMode, TomlSettingsStore, Workspace, STATE_DIR};
use crate::sync::{Direction, NoteStatus, SyncEngine, SyncError, SyncOutcome};

pub(crate) type Engine = SyncEngine<FsVault, TomlSettingsStore>;

/// Creates an engine over the workspace's vault and settings
pub(crate) fn engine(workspace: &Workspace) -> Result<Engine> {
    let engine = SyncEngine::new(workspace.vault(), workspace.settings_store())
        .context("Failed to load settings")?;
    Ok(engine)
}

/// Shows title locations for the given notes, or every note in the vault
pub fn status(
    workspace: &Workspace,
    output: &Output,
    files: &[PathBuf],
    out_of_sync: bool,
) -> Result<()> {
    let engine = engine(workspace)?;

    let mut statuses = Vec::new();
    if files.is_empty() {
        for path in list_notes(workspace.root())? {
            match engine.inspect(&path) {
                Ok(status) => statuses.push(status),
                Err(e) => tracing::warn!("Skipping {}: {}", path, e),
            }
        }
    } else {
        for file in files {
            let path = workspace.note_path(file)?;
            statuses.push(engine.inspect(&path)?);
        }
    }

    if out_of_sync {
        statuses.retain(|status| !status.in_sync);
    }
    tracing::debug!(notes = statuses.len(), "Inspected notes");

    if output.is_json() {
        output.data(&statuses);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No notes to show");
        return Ok(());
    }

    println!("{:<10} {:<12} {:<40} TITLES", "STATE", "SYNC", "NOTE");
    println!("{}", "-".repeat(80));
    for status in &statuses {
        print_status(status);
    }

    Ok(())
}

fn print_status(status: &NoteStatus) {
    let state = if status.in_sync { "ok" } else { "differs" };
    let eligibility = serde_json::to_value(status.eligibility)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();

    let mut titles = Vec::new();
    if let Some(heading) = &status.heading {
        titles.push(format!("heading '{}' (line {})", heading.text, heading.line + 1));
    }
    if let Some(frontmatter) = &status.frontmatter {
        titles.push(format!(
            "frontmatter '{}' (line {})",
            frontmatter.text,
            frontmatter.line + 1
        ));
    }
    if titles.is_empty() {
        titles.push("none".to_string());
    }

    println!(
        "{:<10} {:<12} {:<40} {}",
        state,
        eligibility,
        status.path,
        titles.join(", ")
    );
}

/// Runs one sync direction on a note
pub fn sync(workspace: &Workspace, output: &Output, direction: Direction, file: &Path) -> Result<()> {
    let path = note_path(workspace, file)?;
    let mut engine = engine(workspace)?;

    tracing::debug!(%direction, path = %path, "Running sync");
    let outcome = engine.sync(direction, &path);
    report(output, &path, &outcome)
}

/// Syncs a note the way opening it in the editor would
pub fn open(workspace: &Workspace, output: &Output, file: &Path) -> Result<()> {
    let path = note_path(workspace, file)?;
    let mut engine = engine(workspace)?;

    let outcome = engine.on_open(&path);
    report(output, &path, &outcome)
}

pub fn ignore(workspace: &Workspace, output: &Output, file: &Path) -> Result<()> {
    let path = note_path(workspace, file)?;
    let mut engine = engine(workspace)?;

    if engine.ignore_file(&path)? {
        output.success(&format!("{}: no longer synced", path));
    } else {
        output.success(&format!("{}: already not synced", path));
    }
    Ok(())
}

pub fn unignore(workspace: &Workspace, output: &Output, file: &Path) -> Result<()> {
    let path = note_path(workspace, file)?;
    let mut engine = engine(workspace)?;

    if engine.unignore_file(&path)? {
        output.success(&format!("{}: synced again", path));
    } else {
        output.success(&format!("{}: already synced", path));
    }
    Ok(())
}

/// Lists the manual file list and what it means in the current mode
pub fn ignored(workspace: &Workspace, output: &Output) -> Result<()> {
    let engine = engine(workspace)?;
    let settings = engine.settings();

    if output.is_json() {
        let files: Vec<_> = settings
            .listed_files
            .iter()
            .map(|(path, added)| serde_json::json!({ "path": path, "added": added }))
            .collect();
        output.data(&serde_json::json!({
            "mode": settings.match_mode.as_str(),
            "ignore_regex": settings.ignore_regex,
            "files": files,
        }));
        return Ok(());
    }

    let meaning = match settings.match_mode {
        MatchMode::Ignore => "never synced",
        MatchMode::Include => "the only notes synced",
    };
    println!("Mode: {} (listed notes are {})", settings.match_mode.as_str(), meaning);
    if !settings.ignore_regex.is_empty() {
        println!("Path rule: {}", settings.ignore_regex);
    }

    if settings.listed_files.is_empty() {
        println!("No notes listed");
    } else {
        println!();
        for (path, added) in &settings.listed_files {
            println!("{:<50} {}", path, added.format("%Y-%m-%d %H:%M"));
        }
    }
    Ok(())
}

pub fn config_show(workspace: &Workspace, output: &Output) -> Result<()> {
    let engine = engine(workspace)?;

    if output.is_json() {
        output.data(engine.settings());
    } else {
        let text = toml::to_string_pretty(engine.settings()).context("Failed to format settings")?;
        print!("{}", text);
    }
    Ok(())
}

pub fn config_path(workspace: &Workspace, output: &Output) {
    let path = workspace.settings_store().path().display().to_string();
    if output.is_json() {
        output.data(&serde_json::json!({ "path": path }));
    } else {
        println!("{}", path);
    }
}

/// Prints an outcome; failures become command errors
pub(crate) fn report(output: &Output, path: &str, outcome: &SyncOutcome) -> Result<()> {
    match outcome {
        SyncOutcome::Failed(message) => anyhow::bail!("{}", message),
        _ if output.is_json() => {
            output.data(&serde_json::json!({ "path": path, "result": outcome }));
        }
        SyncOutcome::Applied(actions) if actions.is_empty() => {
            println!("{}: already in sync", path);
        }
        SyncOutcome::Applied(actions) => {
            for action in actions {
                output.success(&action.to_string());
            }
        }
        SyncOutcome::Skipped(reason) => println!("{}: skipped ({})", path, reason),
        SyncOutcome::Deferred => println!("{}: waiting for edits to settle", path),
    }
    Ok(())
}

/// Resolves a user path to a vault path of a markdown note
fn note_path(workspace: &Workspace, file: &Path) -> Result<String> {
    let path = workspace.note_path(file)?;
    if NoteFile::parse(&path).is_none() {
        return Err(SyncError::NotANote(path).into());
    }
    Ok(path)
}

/// Lists every markdown note in the vault, skipping hidden folders
pub(crate) fn list_notes(root: &Path) -> Result<Vec<String>> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !name.starts_with('.') && name != STATE_DIR
        });

    let mut notes = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk vault: {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let path = relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if NoteFile::parse(&path).is_some() {
            notes.push(path);
        }
    }

    notes.sort();
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn list_notes_skips_hidden_and_non_markdown() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::create_dir_all(root.join(".obsidian")).unwrap();
        fs::write(root.join("Top.md"), "").unwrap();
        fs::write(root.join("a/b/Deep.md"), "").unwrap();
        fs::write(root.join("a/image.png"), "").unwrap();
        fs::write(root.join(".obsidian/Hidden.md"), "").unwrap();
        fs::create_dir_all(root.join("a/.trash")).unwrap();
        fs::write(root.join("a/.trash/Gone.md"), "").unwrap();
        fs::create_dir_all(root.join(STATE_DIR)).unwrap();
        fs::write(root.join(STATE_DIR).join("State.md"), "").unwrap();

        assert_eq!(
            list_notes(root).unwrap(),
            vec!["Top.md".to_string(), "a/b/Deep.md".to_string()]
        );
    }
}
