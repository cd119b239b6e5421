use std::path::PathBuf;

use super::super::exit_status::ExitStatus;

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Type definitions were written to `output`.
    Generated { output: PathBuf },
    /// The file has no class names; nothing was written.
    NoClassNames,
    /// `--list-different`: `output` is up to date.
    UpToDate { output: PathBuf },
    /// `--list-different`: `output` is missing or outdated.
    Different { output: PathBuf },
    /// Watch mode: the source was removed and so was `output`.
    Removed { output: PathBuf },
    /// The file could not be compiled or its definitions not written.
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file: PathBuf,
    pub outcome: FileOutcome,
    /// Names skipped by the renderer.
    pub warnings: Vec<String>,
}

impl FileReport {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, FileOutcome::Failed { .. })
    }

    pub fn is_different(&self) -> bool {
        matches!(self.outcome, FileOutcome::Different { .. })
    }
}

#[derive(Debug)]
pub struct GenerateSummary {
    pub pattern: String,
    pub files: Vec<FileReport>,
    pub ignored_count: usize,
    /// Paths the scan could not access.
    pub skipped_count: usize,
    pub list_different: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

#[derive(Debug)]
pub enum CommandSummary {
    Generate(GenerateSummary),
    /// Watch mode ended; reports were printed while watching.
    Watch,
    Init(InitSummary),
}

/// Result of running a typed-less command.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Files that failed, or an init that did not create its file.
    pub error_count: usize,
    /// Files whose definitions differ from disk.
    pub different_count: usize,
}

impl CommandResult {
    pub fn from_generate(summary: GenerateSummary) -> Self {
        let error_count = summary.files.iter().filter(|f| f.is_error()).count();
        let different_count = summary.files.iter().filter(|f| f.is_different()).count();
        Self {
            summary: CommandSummary::Generate(summary),
            error_count,
            different_count,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.error_count > 0 || self.different_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
