use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shape of the generated type definitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    /// One `export const` declaration per class (`<file>.d.ts`)
    #[default]
    Named,
    /// A `Styles` interface and a default export (`<file>.d.ts`)
    Default,
    /// One constant per class holding its original name (`<file>.const.ts`)
    Values,
}

impl ExportType {
    pub const ALL: [ExportType; 3] = [ExportType::Named, ExportType::Default, ExportType::Values];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportType::Named => "named",
            ExportType::Default => "default",
            ExportType::Values => "values",
        }
    }
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown export type '{0}' (expected named, default or values)")]
pub struct UnknownExportType(pub String);

impl FromStr for ExportType {
    type Err = UnknownExportType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportType::ALL
            .into_iter()
            .find(|export_type| export_type.as_str() == s)
            .ok_or_else(|| UnknownExportType(s.to_string()))
    }
}

/// Line separator of generated files.
///
/// Configured as a literal escape sequence (`"\\n"`, `"\\r"` or `"\\r\\n"`),
/// which is what a shell or a JSON config naturally carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    CrLf,
}

impl LineEnding {
    /// The separator characters.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// The escaped form used in configuration.
    pub fn escaped(self) -> &'static str {
        match self {
            LineEnding::Lf => "\\n",
            LineEnding::Cr => "\\r",
            LineEnding::CrLf => "\\r\\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown line ending '{0}' (expected \\n, \\r or \\r\\n)")]
pub struct UnknownLineEnding(pub String);

impl FromStr for LineEnding {
    type Err = UnknownLineEnding;

    /// Accepts escape sequences as well as the characters themselves.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace("\\n", "\n").replace("\\r", "\r").as_str() {
            "\n" => Ok(LineEnding::Lf),
            "\r" => Ok(LineEnding::Cr),
            "\r\n" => Ok(LineEnding::CrLf),
            _ => Err(UnknownLineEnding(s.to_string())),
        }
    }
}

impl TryFrom<String> for LineEnding {
    type Error = UnknownLineEnding;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LineEnding> for String {
    fn from(line_ending: LineEnding) -> Self {
        line_ending.escaped().to_string()
    }
}

/// Options of a generation run.
///
/// Only `export_type` and `line_ending` affect rendering; the flags drive the
/// CLI layer that writes, compares or watches files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub export_type: ExportType,
    pub line_ending: LineEnding,
    /// Compare against existing files instead of writing them.
    pub list_different: bool,
    /// Keep running and regenerate on changes.
    pub watch: bool,
    /// With `watch`, skip the initial generation.
    pub ignore_initial: bool,
}
