//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading the documentation source tree from the
//! local filesystem.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// All paths are resolved against `source_dir` and must stay inside it.
///
/// # Example
///
/// ```ignore
/// use std::path::{Path, PathBuf};
/// use polydoc_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("docs"));
/// let images = storage.list_files(Path::new("guide/images"))?;
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Root directory of the documentation sources.
    source_dir: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Root directory of the documentation sources.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Validate that a path doesn't escape the source directory.
    ///
    /// Rejects absolute paths and paths containing parent directory
    /// components (`..`).
    fn validate_path(path: &Path) -> Result<(), StorageError> {
        let escapes = path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Resolve a validated path against the source directory.
    fn full_path(&self, path: &Path) -> Result<PathBuf, StorageError> {
        Self::validate_path(path)?;
        Ok(self.source_dir.join(path))
    }
}

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        self.full_path(path).is_ok_and(|p| p.exists())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.full_path(path).is_ok_and(|p| p.is_file())
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        let full_path = self.full_path(path)?;
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path)).with_backend(BACKEND))
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        let full_path = self.full_path(path)?;
        fs::read(&full_path).map_err(|e| StorageError::io(e, Some(full_path)).with_backend(BACKEND))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        let full_path = self.full_path(dir)?;
        if !full_path.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            if entry.path().is_file() {
                names.push(name);
            } else {
                tracing::debug!(path = %entry.path().display(), "Skipping non-file entry");
            }
        }
        names.sort();

        Ok(names.into_iter().map(|name| dir.join(name)).collect())
    }
}
