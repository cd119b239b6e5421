//! Report formatting and printing utilities.
//!
//! Separate from the core so typed-less can be used as a library without
//! printing side effects.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, FileOutcome, FileReport, GenerateSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Generate(summary) => print_generate(summary, verbose),
        CommandSummary::Watch => {}
        CommandSummary::Init(summary) => print_init(summary),
    }
}

/// Print the outcome of one file: status lines to stdout, problems to stderr.
pub fn print_file_report(report: &FileReport, verbose: bool) {
    print_file_report_to(report, verbose, &mut io::stdout().lock(), &mut io::stderr().lock());
}

pub fn print_file_report_to<O: Write, E: Write>(report: &FileReport, verbose: bool, out: &mut O, err: &mut E) {
    for warning in &report.warnings {
        let _ = writeln!(err, "{}: {}", "warning".bold().yellow(), warning);
    }

    match &report.outcome {
        FileOutcome::Generated { output } => {
            let _ = writeln!(out, "{} {}", "[GENERATED TYPES]".green(), output.display());
        }
        FileOutcome::NoClassNames => {
            let _ = writeln!(out, "{} {}", "[NO GENERATED TYPES]".yellow(), report.file.display());
        }
        FileOutcome::UpToDate { output } => {
            if verbose {
                let _ = writeln!(out, "{} {}", SUCCESS_MARK.green(), output.display());
            }
        }
        FileOutcome::Different { .. } => {
            let _ = writeln!(
                out,
                "{} Check type definitions for {}",
                "[INVALID TYPES]".red(),
                report.file.display()
            );
        }
        FileOutcome::Removed { output } => {
            let _ = writeln!(out, "{} {}", "[REMOVED TYPES]".yellow(), output.display());
        }
        FileOutcome::Failed { message } => {
            let _ = writeln!(err, "{}: {}", "error".bold().red(), message);
        }
    }
}

fn print_generate(summary: &GenerateSummary, verbose: bool) {
    print_generate_to(summary, verbose, &mut io::stdout().lock(), &mut io::stderr().lock());
}

pub fn print_generate_to<O: Write, E: Write>(summary: &GenerateSummary, verbose: bool, out: &mut O, err: &mut E) {
    if summary.files.is_empty() {
        let _ = writeln!(
            err,
            "{} No files found matching '{}'",
            "warning:".bold().yellow(),
            summary.pattern
        );
        return;
    }

    for report in &summary.files {
        print_file_report_to(report, verbose, out, err);
    }

    if verbose && summary.ignored_count > 0 {
        let _ = writeln!(err, "{} {} file(s) ignored", "note:".bold().cyan(), summary.ignored_count);
    }
    if verbose && summary.skipped_count > 0 {
        let _ = writeln!(
            err,
            "{} {} path(s) could not be accessed",
            "note:".bold().cyan(),
            summary.skipped_count
        );
    }

    let failed = summary.files.iter().filter(|f| f.is_error()).count();
    let different = summary.files.iter().filter(|f| f.is_different()).count();
    let total = summary.files.len();
    let files = if total == 1 { "file" } else { "files" };

    if failed > 0 {
        let _ = writeln!(
            err,
            "{} {}",
            FAILURE_MARK.red(),
            format!("{} of {} {} could not be processed", failed, total, files).red()
        );
    } else if summary.list_different && different > 0 {
        let _ = writeln!(
            err,
            "{} {}",
            FAILURE_MARK.red(),
            format!("{} of {} {} have outdated type definitions", different, total, files).red()
        );
    } else if summary.list_different {
        let _ = writeln!(
            out,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Checked {} {} - type definitions are up to date", total, files).green()
        );
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        eprintln!("{}: {} already exists", "error".bold().red(), CONFIG_FILE_NAME);
    }
}
