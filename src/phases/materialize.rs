//! Phase 2: Materializing the consolidation directory
//!
//! This phase turns the list of discovered archives into files on disk.
//!
//! ## Process
//!
//! 1.  **Prepare**: [`prepare_destination`] makes sure the destination exists
//!     and is empty. An existing directory is only removed when the caller
//!     has obtained confirmation.
//!
//! 2.  **Plan**: [`plan_copies`] assigns every source a distinct file name.
//!     The first source with a given name keeps it; the Nth repeat becomes
//!     `<stem>_<N>.<ext>`.
//!
//! 3.  **Copy**: [`materialize`] copies the bytes in plan order. A failed copy
//!     aborts the run; files copied before it stay in place.

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::progress::{CancellationToken, Phase, Progress, ProgressSink};

/// Fraction reported once copying starts.
const COPY_START: f64 = 0.5;
/// Share of overall progress covered by copying.
const COPY_SPAN: f64 = 0.3;

/// One planned copy: where a file comes from and the name it gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlanEntry {
    pub source: PathBuf,
    pub file_name: String,
}

/// Ensure `dir` exists and is empty.
///
/// When `dir` already exists it is removed first, but only if
/// `user_confirmed` is set; otherwise this fails with
/// [`Error::DestinationConflict`] and touches nothing.
pub fn prepare_destination(dir: &Path, user_confirmed: bool) -> Result<()> {
    if dir.exists() {
        if !user_confirmed {
            return Err(Error::DestinationConflict {
                path: dir.to_path_buf(),
            });
        }
        debug!("Removing existing directory {}", dir.display());
        fs::remove_dir_all(dir).map_err(|cause| Error::DirectoryDeleteFailed {
            path: dir.to_path_buf(),
            cause,
        })?;
    }

    fs::create_dir_all(dir).map_err(|cause| Error::DirectoryCreateFailed {
        path: dir.to_path_buf(),
        cause,
    })
}

/// Assign each source a destination file name unique within this run.
pub fn plan_copies(files: &[PathBuf]) -> Vec<CopyPlanEntry> {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut claimed: HashSet<String> = HashSet::new();

    files
        .iter()
        .map(|source| {
            let original = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let count = occurrences.entry(original.clone()).or_insert(0);
            *count += 1;

            let mut n = *count;
            let mut file_name = if n == 1 {
                original.clone()
            } else {
                suffixed(&original, n)
            };
            // Claims are case-folded: `A.jar` and `a.jar` are one file on
            // case-insensitive filesystems
            while !claimed.insert(file_name.to_lowercase()) {
                n = n.max(1) + 1;
                file_name = suffixed(&original, n);
            }

            CopyPlanEntry {
                source: source.clone(),
                file_name,
            }
        })
        .collect()
}

/// `a.jar` + 3 -> `a_3.jar`. Names without an extension get a plain suffix.
fn suffixed(original: &str, n: usize) -> String {
    let path = Path::new(original);
    let extension = path.extension().and_then(OsStr::to_str);
    let stem = path.file_stem().and_then(OsStr::to_str).unwrap_or(original);
    match extension {
        Some(ext) => format!("{}_{}.{}", stem, n, ext),
        None => format!("{}_{}", stem, n),
    }
}

/// Copy `files` into `dest_dir`, returning the created paths in plan order.
///
/// `dest_dir` must already exist (see [`prepare_destination`]). Existing
/// targets are overwritten.
pub fn materialize(
    files: &[PathBuf],
    dest_dir: &Path,
    cancel: &CancellationToken,
    progress: &dyn ProgressSink,
) -> Result<Vec<PathBuf>> {
    let plan = plan_copies(files);
    let total = plan.len();
    let mut copied = Vec::with_capacity(total);

    for (index, entry) in plan.iter().enumerate() {
        if cancel.is_cancelled() {
            debug!("Copy cancelled after {} of {} file(s)", index, total);
            return Err(Error::Cancelled);
        }

        let target = dest_dir.join(&entry.file_name);
        fs::copy(&entry.source, &target).map_err(|cause| Error::FileCopyFailed {
            path: entry.source.clone(),
            cause,
        })?;
        copied.push(target);

        let done = index + 1;
        progress.report(Progress::new(
            Phase::Copying,
            Some(COPY_START + done as f64 / total as f64 * COPY_SPAN),
            format!("Copying: {} ({}/{})", display_name(&entry.source), done, total),
        ));
    }

    Ok(copied)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
