//! # CLI Command Implementations
//!
//! One module per `jarlibs` subcommand. Each holds a clap `Args` struct and
//! an `execute` function that calls into the `jarlibs` library.

pub mod completions;
pub mod consolidate;
pub mod info;

use std::fmt;

/// A failure whose message the command already printed.
///
/// `main` exits with status 1 for it without printing it a second time.
#[derive(Debug)]
pub struct ReportedFailure(pub jarlibs::error::Error);

impl fmt::Display for ReportedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ReportedFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}
