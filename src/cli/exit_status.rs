use std::process::ExitCode;

/// Exit status of the CLI.
///
/// - `Success` (0): every file was processed
/// - `Failure` (1): some files failed to compile, or differ from disk with `--list-different`
/// - `Error` (2): the command could not run (config error, invalid pattern, I/O failure)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
