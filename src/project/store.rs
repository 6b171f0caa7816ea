//! File-backed project metadata with an exclusive write section.
//!
//! Metadata lives in `<root>/.jarlibs/project.yaml`. Writers hold both an
//! in-process mutex and an advisory exclusive lock on
//! `<root>/.jarlibs/project.lock`, load the metadata fresh, mutate a working
//! copy and save it atomically (temp file + rename). The stored metadata is
//! only replaced when the whole write closure succeeds.
//!
//! The lock file itself stays on disk. The OS releases the lock when the
//! holder exits, so a killed writer never blocks later runs.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use log::debug;

use super::model::{ProjectMetadata, ProjectModel};
use super::ProjectService;
use crate::defaults::{metadata_path, LOCK_FILE_NAME};
use crate::error::{Error, Result};

/// Project metadata stored under a project root.
#[derive(Debug)]
pub struct ProjectStore {
    root: PathBuf,
    path: PathBuf,
    writer: Mutex<()>,
}

impl ProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let path = metadata_path(&root);
        Self {
            root,
            path,
            writer: Mutex::new(()),
        }
    }

    /// Path of the metadata file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_file_name(LOCK_FILE_NAME)
    }

    fn metadata_error(&self, message: impl Into<String>) -> Error {
        Error::Metadata {
            path: self.path.clone(),
            message: message.into(),
        }
    }

    /// Load the current metadata.
    ///
    /// A missing file yields a single-module project named after the root
    /// directory.
    pub fn load(&self) -> Result<ProjectMetadata> {
        match fs::read_to_string(&self.path) {
            Ok(content) => ProjectMetadata::from_yaml(&content)
                .map_err(|e| self.metadata_error(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Ok(ProjectMetadata::single_module(self.default_module_name()))
            }
            Err(e) => Err(self.metadata_error(e.to_string())),
        }
    }

    fn default_module_name(&self) -> String {
        std::path::absolute(&self.root)
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "main".to_string())
    }

    fn save(&self, metadata: &ProjectMetadata) -> Result<()> {
        let yaml = metadata
            .to_yaml()
            .map_err(|e| self.metadata_error(e.to_string()))?;
        let tmp = self.path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).map_err(|e| self.metadata_error(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            self.metadata_error(e.to_string())
        })
    }

    /// Run `f` against the metadata inside the exclusive write section.
    pub fn write<T>(&self, f: impl FnOnce(&mut ProjectMetadata) -> Result<T>) -> Result<T> {
        let _guard = self
            .writer
            .lock()
            .map_err(|_| self.metadata_error("writer lock poisoned"))?;
        let _lock = LockFile::acquire(&self.lock_path())
            .map_err(|e| self.metadata_error(e))?;

        let mut working = self.load()?;
        let value = f(&mut working)?;
        self.save(&working)?;
        debug!("Saved project metadata to {}", self.path.display());
        Ok(value)
    }
}

impl ProjectService for ProjectStore {
    fn write_exclusive(
        &self,
        f: &mut dyn FnMut(&mut dyn ProjectModel) -> Result<()>,
    ) -> Result<()> {
        self.write(|metadata| f(metadata as &mut dyn ProjectModel))
    }
}

/// Exclusive advisory lock held for the lifetime of the value.
struct LockFile {
    file: File,
}

impl LockFile {
    fn acquire(path: &Path) -> std::result::Result<Self, String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| e.to_string())?;
        file.try_lock_exclusive().map_err(|e| {
            if e.kind() == fs2::lock_contended_error().kind() {
                format!("metadata is locked by another writer ({})", path.display())
            } else {
                e.to_string()
            }
        })?;
        Ok(Self { file })
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
