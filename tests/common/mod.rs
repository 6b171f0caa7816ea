//! Shared fixtures for the end-to-end tests.
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let project = Project::new().with_archive("lib/a.jar");
//! jarlibs(&project).arg("consolidate").arg("--yes").assert().success();
//! ```

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::Path;

pub mod prelude {
    pub use super::{jarlibs, Project};
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;
}

/// Bytes of a minimal archive: the ZIP local header magic.
pub const ARCHIVE_BYTES: &[u8] = b"PK\x03\x04jarlibs-test";

/// A throwaway project tree.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn with_archive(self, rel: &str) -> Self {
        self.dir.child(rel).write_binary(ARCHIVE_BYTES).unwrap();
        self
    }

    pub fn with_file(self, rel: &str, content: &str) -> Self {
        self.dir.child(rel).write_str(content).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn consolidated(&self, name: &str) -> bool {
        self.path().join("all-in-one").join(name).is_file()
    }

    /// Hold the metadata write lock until the returned file is dropped.
    pub fn lock_metadata(&self) -> std::fs::File {
        use fs2::FileExt;
        let dir = self.path().join(".jarlibs");
        std::fs::create_dir_all(&dir).unwrap();
        let file = std::fs::File::create(dir.join("project.lock")).unwrap();
        file.lock_exclusive().unwrap();
        file
    }

    pub fn metadata(&self) -> String {
        std::fs::read_to_string(self.path().join(".jarlibs/project.yaml")).unwrap()
    }
}

/// The binary pointed at `project`, isolated from the caller's environment.
pub fn jarlibs(project: &Project) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("jarlibs");
    cmd.current_dir(project.path())
        .env_remove("JARLIBS_ROOT")
        .env_remove("JARLIBS_LOG")
        .env_remove("RUST_LOG")
        .arg("--color")
        .arg("never");
    cmd
}
