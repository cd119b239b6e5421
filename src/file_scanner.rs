use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// The `<PATTERN>` argument of `generate`: which LESS files to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePattern {
    /// A single file, whatever its extension.
    File(PathBuf),
    /// Every `.less` file below a directory.
    Directory(PathBuf),
    /// A glob such as `src/**/*.less`.
    Glob(Pattern),
}

impl SourcePattern {
    pub fn parse(pattern: &str) -> Result<Self, glob::PatternError> {
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        if is_glob_pattern(pattern) {
            return Pattern::new(pattern).map(SourcePattern::Glob);
        }

        let path = PathBuf::from(pattern);
        if path.is_dir() {
            Ok(SourcePattern::Directory(path))
        } else {
            Ok(SourcePattern::File(path))
        }
    }

    /// Directory to watch for changes of matching files.
    ///
    /// For globs this is the literal prefix before the first wildcard.
    pub fn watch_root(&self) -> PathBuf {
        match self {
            SourcePattern::File(path) => match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
            SourcePattern::Directory(path) => path.clone(),
            SourcePattern::Glob(pattern) => {
                let base: PathBuf = Path::new(pattern.as_str())
                    .components()
                    .take_while(|component| !is_glob_pattern(&component.as_os_str().to_string_lossy()))
                    .collect();
                if base.as_os_str().is_empty() {
                    PathBuf::from(".")
                } else {
                    base
                }
            }
        }
    }

    /// Whether `path` (relative to the working directory) is selected.
    pub fn matches(&self, path: &Path) -> bool {
        let path = normalize(path);
        match self {
            SourcePattern::File(file) => normalize(file) == path,
            SourcePattern::Directory(dir) => {
                is_less_file(&path) && (is_current_dir(dir) || path.starts_with(normalize(dir)))
            }
            SourcePattern::Glob(pattern) => pattern.matches_path(&path),
        }
    }
}

fn is_current_dir(path: &Path) -> bool {
    path.components().all(|component| component == Component::CurDir)
}

/// Drop `.` components so `./src/a.less` and `src/a.less` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| *component != Component::CurDir)
        .collect()
}

fn is_less_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "less")
}

/// Compiled `ignores` globs.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns(Vec<Pattern>);

impl IgnorePatterns {
    /// Compile `patterns`, reporting invalid ones when `verbose`.
    pub fn new(patterns: &[String], verbose: bool) -> Self {
        let compiled = patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!("{} Invalid ignore pattern '{}': {}", "warning:".bold().yellow(), p, e);
                    }
                    None
                }
            })
            .collect();
        Self(compiled)
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.0.iter().any(|pattern| pattern.matches_path(&path))
    }
}

/// Result of scanning files.
pub struct ScanResult {
    /// Selected files, sorted.
    pub files: BTreeSet<PathBuf>,
    pub ignored_count: usize,
    pub skipped_count: usize,
}

pub fn scan_files(pattern: &SourcePattern, ignores: &IgnorePatterns, verbose: bool) -> ScanResult {
    let mut candidates: Vec<PathBuf> = Vec::new();
    let mut skipped_count = 0;

    match pattern {
        SourcePattern::File(path) => {
            if path.is_file() {
                candidates.push(path.clone());
            } else if verbose {
                eprintln!("{} File does not exist: {}", "warning:".bold().yellow(), path.display());
            }
        }
        SourcePattern::Directory(dir) => {
            for entry in WalkDir::new(dir) {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        skipped_count += 1;
                        if verbose {
                            eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                        }
                        continue;
                    }
                };
                if entry.file_type().is_file() && is_less_file(entry.path()) {
                    candidates.push(entry.into_path());
                }
            }
        }
        SourcePattern::Glob(glob_pattern) => match glob(glob_pattern.as_str()) {
            Ok(entries) => {
                for entry in entries {
                    match entry {
                        Ok(path) if path.is_file() => candidates.push(path),
                        Ok(_) => {}
                        Err(e) => {
                            skipped_count += 1;
                            if verbose {
                                eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                            }
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!(
                    "{} Invalid glob pattern '{}': {}",
                    "warning:".bold().yellow(),
                    glob_pattern,
                    e
                );
            }
        },
    }

    let mut files = BTreeSet::new();
    let mut ignored_count = 0;
    for path in candidates {
        if ignores.is_ignored(&path) {
            ignored_count += 1;
            if verbose {
                eprintln!("{} {}", "ignored:".dimmed(), path.display());
            }
            continue;
        }
        files.insert(normalize(&path));
    }

    ScanResult {
        files,
        ignored_count,
        skipped_count,
    }
}
