use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to compile a LESS file into rulesets.
///
/// Compilation errors are fatal for the file being processed: no partial list
/// of rulesets is ever returned alongside one.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{}: '{specifier}' wasn't found (tried {})", importer.display(), resolved.display())]
    MissingImport {
        importer: PathBuf,
        specifier: String,
        resolved: PathBuf,
    },

    #[error("variable @{name} is undefined")]
    UndefinedVariable { name: String },

    #[error("{call} is undefined")]
    UndefinedMixin { call: String },

    #[error("no matching definition was found for {call}")]
    NoMatchingMixin { call: String },

    #[error("{call} nests more than {limit} mixin calls")]
    MixinRecursion { call: String, limit: usize },

    #[error("guard 'when {guard}' can't be evaluated")]
    UnsupportedGuard { guard: String },

    #[error("operation on an invalid type: {operation}")]
    InvalidOperation { operation: String },
}

impl CompileError {
    pub(crate) fn syntax(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        CompileError::Syntax {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
