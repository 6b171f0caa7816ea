//! Project metadata service.
//!
//! The registration step only sees [`ProjectModel`] (the operations on
//! modules and libraries) and [`ProjectService`] (the exclusive write
//! section those operations run in). [`ProjectStore`] is the file-backed
//! implementation used by the CLI.

pub mod model;
pub mod store;

pub use model::{Library, LibraryDraft, Module, ProjectMetadata, ProjectModel};
pub use store::ProjectStore;

use crate::error::Result;

/// Serializes writers to project metadata.
///
/// Everything `f` does happens atomically with respect to other writers:
/// either all of it is committed or none of it is.
pub trait ProjectService {
    fn write_exclusive(&self, f: &mut dyn FnMut(&mut dyn ProjectModel) -> Result<()>)
        -> Result<()>;
}
