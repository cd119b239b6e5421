use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::mpsc::channel,
};

use anyhow::{Context, Result};
use colored::Colorize;
use notify::{Event, EventKind, RecursiveMode, Watcher, recommended_watcher};

use super::{
    CommandResult, CommandSummary, FileOutcome, FileReport,
    generate::{GenerateSettings, generate_all, process_file},
};
use crate::{
    cli::{args::GenerateCommand, report},
    core::typescript::type_definition_path,
    file_scanner::{IgnorePatterns, SourcePattern},
};

/// A change to apply after a file system event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchAction {
    /// Regenerate the definitions of a source file.
    Generate(PathBuf),
    /// A source file is gone; remove its definitions.
    Remove(PathBuf),
}

/// Run `generate`, then keep regenerating as matching files change.
///
/// Reports are printed as they happen. Returns when the watcher stops.
pub fn generate_and_watch(cmd: GenerateCommand) -> Result<CommandResult> {
    let settings = GenerateSettings::load(&cmd)?;

    if !settings.render.ignore_initial {
        let initial = CommandResult::from_generate(generate_all(&settings));
        report::print(&initial, settings.verbose);
    }

    let cwd = env::current_dir()
        .and_then(|dir| dir.canonicalize())
        .context("Failed to read the current directory")?;
    let root = settings.pattern.watch_root();

    let (tx, rx) = channel::<notify::Result<Event>>();
    let mut watcher = recommended_watcher(tx).context("Failed to start file watcher")?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", root.display()))?;

    eprintln!(
        "{} {} (press Ctrl+C to stop)",
        "Watching".bold().cyan(),
        settings.pattern_text
    );

    for event in rx {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                eprintln!("{}: watch error: {}", "error".bold().red(), err);
                continue;
            }
        };

        for action in watch_actions(&event, &settings.pattern, &settings.ignores, &cwd) {
            let file_report = match action {
                WatchAction::Generate(file) => process_file(&file, &settings),
                WatchAction::Remove(file) => match remove_definitions(&file, &settings) {
                    Some(file_report) => file_report,
                    None => continue,
                },
            };
            report::print_file_report(&file_report, settings.verbose);
        }
    }

    Ok(CommandResult {
        summary: CommandSummary::Watch,
        error_count: 0,
        different_count: 0,
    })
}

/// Actions for the matching, non-ignored paths of `event`.
///
/// Relative patterns are interpreted from `cwd`, so event paths are made
/// relative to it before matching. Absolute patterns match the event path
/// as reported.
pub fn watch_actions(
    event: &Event,
    pattern: &SourcePattern,
    ignores: &IgnorePatterns,
    cwd: &Path,
) -> Vec<WatchAction> {
    let mut actions: Vec<WatchAction> = Vec::new();

    for path in &event.paths {
        let relative = path.strip_prefix(cwd).unwrap_or(path);
        let file = if pattern.matches(relative) {
            relative
        } else if pattern.matches(path) {
            path.as_path()
        } else {
            continue;
        };
        if ignores.is_ignored(file) {
            continue;
        }

        let file = file.to_path_buf();
        let action = match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) if path.is_file() => WatchAction::Generate(file),
            EventKind::Create(_) | EventKind::Modify(_) if !path.exists() => WatchAction::Remove(file),
            EventKind::Remove(_) => WatchAction::Remove(file),
            _ => continue,
        };
        if !actions.contains(&action) {
            actions.push(action);
        }
    }

    actions
}

/// Remove the definitions generated for `file`, if there are any.
fn remove_definitions(file: &Path, settings: &GenerateSettings) -> Option<FileReport> {
    let output = type_definition_path(file, settings.render.export_type);
    let outcome = match fs::remove_file(&output) {
        Ok(()) => FileOutcome::Removed { output },
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => FileOutcome::Failed {
            message: format!("Failed to remove {}: {}", output.display(), err),
        },
    };

    Some(FileReport {
        file: file.to_path_buf(),
        outcome,
        warnings: Vec::new(),
    })
}
