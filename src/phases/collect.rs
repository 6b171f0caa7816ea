//! Phase 1: Collecting archives
//!
//! Walks the project tree depth-first and returns every regular file whose
//! name ends in `.jar` (any case). Directories matching the skip policy
//! (hidden, or a well-known build/dependency-cache name) are pruned before
//! they are entered. Explicitly excluded paths, such as a consolidation
//! directory left over from a previous run, are pruned the same way.
//!
//! The scan is best-effort: unreadable directories and entries are skipped
//! and traversal continues with their siblings. Cancellation is checked
//! between entries; a cancelled scan returns what it found so far.

use std::path::{Path, PathBuf};

use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::defaults::{is_archive_name, is_skipped_dir};
use crate::progress::{CancellationToken, Phase, Progress, ProgressSink};

/// Result of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Absolute paths of discovered archives, in traversal order (siblings
    /// sorted by name).
    pub files: Vec<PathBuf>,
    /// True when the scan stopped early because of cancellation.
    pub cancelled: bool,
}

/// Directory walker with a fixed skip policy.
#[derive(Debug, Clone)]
pub struct Collector {
    root: PathBuf,
    excluded: Vec<PathBuf>,
}

impl Collector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded: Vec::new(),
        }
    }

    /// Never descend into `path`, wherever it appears in the tree.
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    fn should_descend(&self, entry: &DirEntry) -> bool {
        // The root is always walked, even when it is itself hidden
        if entry.depth() == 0 {
            return true;
        }
        if !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_str().unwrap_or("");
        if is_skipped_dir(name) {
            return false;
        }
        !self.excluded.iter().any(|p| p == entry.path())
    }

    /// Walk the tree and collect archives.
    pub fn discover(&self, cancel: &CancellationToken, progress: &dyn ProgressSink) -> Discovery {
        let mut discovery = Discovery::default();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_descend(e));

        for entry in walker {
            if cancel.is_cancelled() {
                debug!(
                    "Scan cancelled after {} archive(s)",
                    discovery.files.len()
                );
                discovery.cancelled = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if is_archive_name(&name) {
                progress.report(Progress::new(
                    Phase::Scanning,
                    None,
                    format!("Found: {}", name),
                ));
                discovery.files.push(absolute(entry.path()));
            }
        }

        discovery
    }
}

/// Convenience wrapper for a one-off scan without exclusions.
pub fn discover(root: &Path, cancel: &CancellationToken) -> Discovery {
    Collector::new(root).discover(cancel, &crate::progress::NoOpProgress)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoOpProgress;
    use std::collections::BTreeSet;
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel.as_bytes()).unwrap();
    }

    fn found(discovery: &Discovery, root: &Path) -> BTreeSet<String> {
        discovery
            .files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn root_of(temp: &TempDir) -> PathBuf {
        std::path::absolute(temp.path()).unwrap()
    }

    #[test]
    fn test_discover_skips_hidden_and_build_dirs() {
        let temp = TempDir::new().unwrap();
        let root = root_of(&temp);
        touch(&root, "a.jar");
        touch(&root, "sub/a.jar");
        touch(&root, "sub/.git/ignored.jar");
        touch(&root, "build/skip.jar");

        let discovery = discover(&root, &CancellationToken::new());

        assert!(!discovery.cancelled);
        let expected: BTreeSet<String> =
            ["a.jar", "sub/a.jar"].iter().map(|s| s.to_string()).collect();
        assert_eq!(found(&discovery, &root), expected);
    }

    #[test]
    fn test_discover_matches_extension_case_insensitively() {
        let temp = TempDir::new().unwrap();
        let root = root_of(&temp);
        touch(&root, "libs/UPPER.JAR");
        touch(&root, "libs/Mixed.Jar");
        touch(&root, "libs/readme.txt");
        touch(&root, "libs/app.war");

        let names = found(&discover(&root, &CancellationToken::new()), &root);
        assert_eq!(names.len(), 2);
        assert!(names.contains("libs/UPPER.JAR"));
        assert!(names.contains("libs/Mixed.Jar"));
    }

    #[test]
    fn test_discover_skips_every_named_dir() {
        let temp = TempDir::new().unwrap();
        let root = root_of(&temp);
        for dir in ["node_modules", "target", "build", ".gradle", ".mvn", ".idea"] {
            touch(&root, &format!("{}/x.jar", dir));
            touch(&root, &format!("nested/{}/y.jar", dir));
        }
        touch(&root, "nested/keep.jar");

        let names = found(&discover(&root, &CancellationToken::new()), &root);
        assert_eq!(names, BTreeSet::from(["nested/keep.jar".to_string()]));
    }

    #[test]
    fn test_discover_keeps_hidden_files_and_similar_dir_names() {
        let temp = TempDir::new().unwrap();
        let root = root_of(&temp);
        touch(&root, ".hidden.jar");
        touch(&root, "Build/upper.jar");
        touch(&root, "builds/plural.jar");

        let names = found(&discover(&root, &CancellationToken::new()), &root);
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_discover_walks_hidden_root() {
        let temp = TempDir::new().unwrap();
        let root = root_of(&temp).join(".workspace");
        touch(&root, "lib/a.jar");

        let names = found(&discover(&root, &CancellationToken::new()), &root);
        assert_eq!(names, BTreeSet::from(["lib/a.jar".to_string()]));
    }

    #[test]
    fn test_discover_ignores_directory_named_like_archive() {
        let temp = TempDir::new().unwrap();
        let root = root_of(&temp);
        touch(&root, "exploded.jar/inner.jar");

        let names = found(&discover(&root, &CancellationToken::new()), &root);
        assert_eq!(names, BTreeSet::from(["exploded.jar/inner.jar".to_string()]));
    }

    #[test]
    fn test_collector_excludes_consolidation_dir() {
        let temp = TempDir::new().unwrap();
        let root = root_of(&temp);
        touch(&root, "a.jar");
        touch(&root, "all-in-one/a.jar");
        touch(&root, "all-in-one/a_2.jar");

        let discovery = Collector::new(&root)
            .exclude(root.join("all-in-one"))
            .discover(&CancellationToken::new(), &NoOpProgress);
        assert_eq!(found(&discovery, &root), BTreeSet::from(["a.jar".to_string()]));
    }

    #[test]
    fn test_discover_returns_absolute_paths() {
        let temp = TempDir::new().unwrap();
        let root = root_of(&temp);
        touch(&root, "a.jar");

        let discovery = discover(&root, &CancellationToken::new());
        assert!(discovery.files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_discover_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let discovery = discover(&temp.path().join("missing"), &CancellationToken::new());
        assert!(discovery.files.is_empty());
        assert!(!discovery.cancelled);
    }

    #[test]
    fn test_discover_stops_when_cancelled() {
        let temp = TempDir::new().unwrap();
        let root = root_of(&temp);
        touch(&root, "a.jar");
        touch(&root, "b.jar");

        let cancel = CancellationToken::new();
        cancel.cancel();
        let discovery = discover(&root, &cancel);

        assert!(discovery.cancelled);
        assert!(discovery.files.is_empty());
    }

    #[test]
    fn test_discover_reports_each_find() {
        let temp = TempDir::new().unwrap();
        let root = root_of(&temp);
        touch(&root, "a.jar");
        touch(&root, "lib/b.jar");

        let (tx, rx) = mpsc::channel();
        Collector::new(&root).discover(&CancellationToken::new(), &tx);
        drop(tx);

        let messages: BTreeSet<String> = rx.iter().map(|p| p.message).collect();
        assert_eq!(
            messages,
            BTreeSet::from(["Found: a.jar".to_string(), "Found: b.jar".to_string()])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_skips_unreadable_dir_and_continues() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = root_of(&temp);
        touch(&root, "locked/inner.jar");
        touch(&root, "open/visible.jar");
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let discovery = discover(&root, &CancellationToken::new());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let names = found(&discovery, &root);
        assert!(names.contains("open/visible.jar"));
        assert!(!discovery.cancelled);
    }
}
