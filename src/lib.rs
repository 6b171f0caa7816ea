//! # jarlibs
//!
//! This library gathers every `.jar` archive found under a project root into
//! a single `all-in-one/` directory and registers that directory as a
//! project library attached to every module. It backs the `jarlibs`
//! command-line tool but can be embedded wherever a project needs its
//! scattered archives consolidated.
//!
//! ## Quick Example
//!
//! ```no_run
//! use std::path::Path;
//! use jarlibs::phases::{Consolidator, Notifier, Outcome};
//! use jarlibs::progress::Progress;
//! use jarlibs::project::ProjectStore;
//!
//! struct Quiet;
//!
//! impl Notifier for Quiet {
//!     fn confirm_overwrite(&self, _dir: &Path) -> jarlibs::error::Result<bool> {
//!         Ok(true)
//!     }
//!     fn progress(&self, _progress: &Progress) {}
//!     fn finish(&self, outcome: &Outcome) {
//!         println!("{:?}", outcome);
//!     }
//! }
//!
//! let root = Path::new("/path/to/project");
//! let store = ProjectStore::new(root);
//! let outcome = Consolidator::new(root, &store, &Quiet).run();
//! assert!(!outcome.is_failure());
//! ```
//!
//! ## Core Concepts
//!
//! - **Phases (`phases`)**: collect archives, materialize the consolidation
//!   directory, register the library. The orchestrator runs them in order.
//! - **Project metadata (`project`)**: modules and libraries, edited only
//!   inside an exclusive write section.
//! - **Progress (`progress`)**: advisory progress updates and the
//!   cooperative cancellation token.
//! - **Defaults (`defaults`)**: the archive extension, directory and library
//!   names, and the directory skip set.
//!
//! ## Execution Flow
//!
//! 1.  **Confirm**: if `all-in-one/` already exists, ask before replacing it.
//! 2.  **Collect**: walk the tree on a worker thread, skipping hidden and
//!     build/dependency-cache directories.
//! 3.  **Materialize**: recreate `all-in-one/` and copy archives into it,
//!     renaming repeats to `<name>_<n>.jar`.
//! 4.  **Register**: rebuild the `all-in-one` library and attach it to every
//!     module, atomically.

pub mod defaults;
pub mod error;
pub mod output;
pub mod phases;
pub mod progress;
pub mod project;

#[cfg(test)]
mod phases_proptest;
