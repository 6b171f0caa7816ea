//! # jarlibs CLI
//!
//! Binary entry point for the `jarlibs` command-line tool. Parses arguments
//! with `clap` and hands off to the matching command. Any error exits with
//! status 1; errors a command has already reported are not printed again.
//!
//! All consolidation logic lives in the library crate.

mod cli;
mod commands;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is::<commands::ReportedFailure>() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
