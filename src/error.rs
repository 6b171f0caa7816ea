//! # Error Handling
//!
//! This module defines the centralized error type for jarlibs. It uses the
//! `thiserror` library to give every failure mode of a consolidation run a
//! descriptive, user-facing message.
//!
//! ## Key Components
//!
//! - **`Error`**: every failure a run can end with. Two variants,
//!   `DestinationConflict` and `Cancelled`, are cancellations rather than
//!   failures; [`Error::is_cancellation`] tells them apart.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Traversal errors never reach this type: the collector swallows them.
//! Copy errors carry the offending source path, registration errors carry
//! the module or library they concern when one is attributable.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for jarlibs operations
#[derive(Error, Debug)]
pub enum Error {
    /// The destination directory already exists and the user declined to
    /// overwrite it.
    #[error("Destination already exists: {}", path.display())]
    DestinationConflict { path: PathBuf },

    /// The consolidation directory could not be created.
    #[error("Failed to create directory '{}': {cause}", path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// The pre-existing consolidation directory could not be removed.
    #[error("Failed to delete directory '{}': {cause}", path.display())]
    DirectoryDeleteFailed {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// Copying a discovered archive failed. `path` is the source file.
    #[error("Failed to copy '{}': {cause}", path.display())]
    FileCopyFailed {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// Building, committing or attaching the project library failed.
    ///
    /// `target` names the module or library involved, when known.
    #[error("Library registration failed{}: {message}", target.as_ref().map(|t| format!(" for '{}'", t)).unwrap_or_default())]
    RegistrationFailed {
        target: Option<String>,
        message: String,
    },

    /// The run was interrupted through its cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    /// The project metadata file could not be read, parsed, locked or saved.
    #[error("Project metadata error at '{}': {message}", path.display())]
    Metadata { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Build a registration error attributed to a module or library.
    pub fn registration(target: impl Into<String>, message: impl Into<String>) -> Self {
        Error::RegistrationFailed {
            target: Some(target.into()),
            message: message.into(),
        }
    }

    /// True for errors that mean "the user stopped the run" rather than
    /// "the run failed".
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled | Error::DestinationConflict { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
