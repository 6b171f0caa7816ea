//! Default values and fixed names used across jarlibs.
//!
//! Everything here is static configuration. The skip set is the only
//! process-wide state in the crate and it is never mutated.

use std::path::{Path, PathBuf};

/// File extension identifying an archive, compared case-insensitively.
pub const ARCHIVE_EXTENSION: &str = "jar";

/// Name of the consolidation directory created under the project root.
pub const CONSOLIDATION_DIR_NAME: &str = "all-in-one";

/// Name of the project library that points at the consolidation directory.
pub const LIBRARY_NAME: &str = "all-in-one";

/// Directory (relative to the project root) holding project metadata.
pub const METADATA_DIR_NAME: &str = ".jarlibs";

/// Project metadata file name inside [`METADATA_DIR_NAME`].
pub const METADATA_FILE_NAME: &str = "project.yaml";

/// Lock file name inside [`METADATA_DIR_NAME`].
pub const LOCK_FILE_NAME: &str = "project.lock";

/// Directory basenames the collector never descends into.
///
/// Hidden directories (leading `.`) are skipped separately, so the dotted
/// entries here only document intent.
pub const SKIP_DIRS: &[&str] = &[
    "node_modules", // npm dependencies
    "target",       // Maven / Cargo output
    "build",        // Gradle output
    ".gradle",      // Gradle cache
    ".mvn",         // Maven wrapper
];

/// Returns true when the collector must not descend into a directory with
/// this basename.
pub fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || SKIP_DIRS.contains(&name)
}

/// Returns true when `name` ends in the archive extension, ignoring ASCII case.
pub fn is_archive_name(name: &str) -> bool {
    let suffix_len = ARCHIVE_EXTENSION.len() + 1;
    if name.len() < suffix_len || !name.is_char_boundary(name.len() - suffix_len) {
        return false;
    }
    let (_, suffix) = name.split_at(name.len() - suffix_len);
    suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(ARCHIVE_EXTENSION)
}

/// The consolidation directory for a project root.
pub fn consolidation_dir(root: &Path) -> PathBuf {
    root.join(CONSOLIDATION_DIR_NAME)
}

/// The project metadata file for a project root.
pub fn metadata_path(root: &Path) -> PathBuf {
    root.join(METADATA_DIR_NAME).join(METADATA_FILE_NAME)
}
