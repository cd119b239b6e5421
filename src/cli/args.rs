//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `generate`: Generate type definitions for LESS files
//! - `init`: Initialize a `.typedlessrc.json` configuration file

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::{
    class_names::NameFormat,
    typescript::{ExportType, LineEnding},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Generate(cmd)) => cmd.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// LESS files to process: a glob ("src/**/*.less"), a directory or a file
    pub pattern: String,

    /// Name format of generated identifiers (overrides config file)
    #[arg(short, long, value_enum)]
    pub name_format: Option<NameFormat>,

    /// Shape of the generated definitions (overrides config file)
    #[arg(short, long, value_enum)]
    pub export_type: Option<ExportType>,

    /// Line ending of generated files: "\n", "\r" or "\r\n" (overrides config file)
    #[arg(long, allow_hyphen_values = true)]
    pub line_ending: Option<LineEnding>,

    /// List files whose type definitions are missing or outdated, without writing
    #[arg(short, long)]
    pub list_different: bool,

    /// Regenerate type definitions when files change
    #[arg(short, long)]
    pub watch: bool,

    /// Skip the initial generation when watching
    #[arg(long, requires = "watch")]
    pub ignore_initial: bool,

    /// Import alias, repeatable (accepted but not applied)
    #[arg(long = "alias", value_name = "FROM=TO", value_parser = parse_key_value)]
    pub aliases: Vec<(String, String)>,

    /// Import alias prefix, repeatable (accepted but not applied)
    #[arg(long = "alias-prefix", value_name = "FROM=TO", value_parser = parse_key_value)]
    pub alias_prefixes: Vec<(String, String)>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_key_value(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, target)) if !key.is_empty() => Ok((key.to_string(), target.to_string())),
        _ => Err(format!("expected FROM=TO, got '{value}'")),
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate TypeScript definitions for LESS class names
    Generate(GenerateCommand),
    /// Initialize a new .typedlessrc.json configuration file
    Init,
}
