//! Phase 3: Registering the consolidation directory as a project library
//!
//! Runs inside the project's exclusive write section and is not
//! cancellable. The library named `library` is rebuilt from scratch on every
//! run:
//!
//! 1.  **Tear down**: an existing library of that name is detached from every
//!     module, then removed.
//! 2.  **Populate**: one classpath root per archive in the directory. An
//!     archive that cannot be read, or is not a ZIP file, is logged and left
//!     out.
//! 3.  **Commit** the library.
//! 4.  **Attach** it to every module that does not already depend on it.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::defaults::is_archive_name;
use crate::error::{Error, Result};
use crate::project::{ProjectModel, ProjectService};

/// Leading bytes of a ZIP local file header.
const ZIP_LOCAL_HEADER: [u8; 4] = *b"PK\x03\x04";
/// Leading bytes of an empty ZIP archive (end of central directory only).
const ZIP_EMPTY_ARCHIVE: [u8; 4] = *b"PK\x05\x06";

/// Summary of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Classpath roots the library ended up with.
    pub roots: Vec<String>,
    /// Archives left out because they could not be used as roots.
    pub skipped: Vec<PathBuf>,
    /// Modules that gained the dependency in this run.
    pub attached: Vec<String>,
}

/// Rebuild `library` from the archives in `dir` and attach it to every
/// module, all within one exclusive write on `service`.
pub fn register(service: &dyn ProjectService, library: &str, dir: &Path) -> Result<Registration> {
    let archives = list_archives(dir)?;
    let mut outcome = None;

    service
        .write_exclusive(&mut |model| {
            outcome = Some(rebuild_library(model, library, &archives)?);
            Ok(())
        })
        .map_err(|e| match e {
            Error::Metadata { .. } => Error::registration(library, e.to_string()),
            other => other,
        })?;

    outcome.ok_or_else(|| Error::registration(library, "write section did not run"))
}

/// Archives directly inside `dir`, sorted by file name.
fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::RegistrationFailed {
        target: None,
        message: format!("cannot read '{}': {}", dir.display(), e),
    })?;

    let mut archives: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| is_archive_name(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .collect();
    archives.sort();

    if archives.is_empty() {
        return Err(Error::RegistrationFailed {
            target: None,
            message: format!("no archives found in '{}'", dir.display()),
        });
    }
    Ok(archives)
}

/// Tear down, repopulate, commit and attach. Operates on the model only.
pub fn rebuild_library(
    model: &mut dyn ProjectModel,
    library: &str,
    archives: &[PathBuf],
) -> Result<Registration> {
    if model.library_by_name(library).is_some() {
        debug!("Removing existing library '{}'", library);
        for module in model.module_names() {
            if model.module_has_library_dependency(&module, library) {
                model.remove_library_dependency(&module, library)?;
            }
        }
        model.remove_library(library)?;
    }

    let mut draft = model.create_library(library)?;
    let mut skipped = Vec::new();
    for archive in archives {
        match classpath_root(archive) {
            Ok(root) => draft.add_classpath_root(root),
            Err(e) => {
                warn!("Skipping archive {}: {}", archive.display(), e);
                skipped.push(archive.clone());
            }
        }
    }
    let roots = draft.roots().to_vec();
    model.commit(draft)?;

    let mut attached = Vec::new();
    for module in model.module_names() {
        if model.module_has_library_dependency(&module, library) {
            continue;
        }
        model
            .add_library_dependency(&module, library)
            .map_err(|e| match e {
                Error::RegistrationFailed { .. } => e,
                other => Error::registration(&module, other.to_string()),
            })?;
        attached.push(module);
    }

    debug!(
        "Library '{}' has {} root(s), attached to {} module(s)",
        library,
        roots.len(),
        attached.len()
    );
    Ok(Registration {
        roots,
        skipped,
        attached,
    })
}

/// The `jar://…!/` URL for an archive, after checking it looks like a ZIP.
pub fn classpath_root(archive: &Path) -> std::io::Result<String> {
    let mut magic = [0u8; 4];
    File::open(archive)?.read_exact(&mut magic)?;
    if magic != ZIP_LOCAL_HEADER && magic != ZIP_EMPTY_ARCHIVE {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "not a ZIP archive",
        ));
    }

    let absolute = std::path::absolute(archive)?;
    let path = absolute.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        Ok(format!("jar://{}!/", path))
    } else {
        Ok(format!("jar:///{}!/", path))
    }
}
