use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use typed_less::cli::{Arguments, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match typed_less::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{}: {:#}", "error".bold().red(), err);
            ExitStatus::Error.into()
        }
    }
}
