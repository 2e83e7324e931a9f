//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores files in memory. Directories exist implicitly as soon as a file
/// below them is added.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use polydoc_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("toc.yaml", "- folder: guide\n  multilanguage: true")
///     .with_file("guide/intro.Java.markdown", "# Intro");
///
/// assert!(storage.exists(Path::new("guide")));
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into().into_bytes());
        self
    }

    /// Add a binary file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_bytes(self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    fn get(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }
}

impl Storage for MockStorage {
    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap()
            .keys()
            .any(|file| file.starts_with(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        String::from_utf8(self.get(path)?).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidData)
                .with_path(path)
                .with_backend(BACKEND)
                .with_source(e)
        })
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        self.get(path)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        // BTreeMap keeps the listing sorted by path.
        Ok(self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|file| file.parent() == Some(dir))
            .filter(|file| {
                !file
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_read_and_exists() {
        let storage = MockStorage::new().with_file("guide/intro.md", "# Intro");

        assert!(storage.exists(Path::new("guide/intro.md")));
        assert!(storage.exists(Path::new("guide")));
        assert!(!storage.exists(Path::new("guide/missing.md")));
        assert!(storage.is_file(Path::new("guide/intro.md")));
        assert!(!storage.is_file(Path::new("guide")));
        assert_eq!(storage.read(Path::new("guide/intro.md")).unwrap(), "# Intro");
    }

    #[test]
    fn test_exists_does_not_match_partial_segment() {
        let storage = MockStorage::new().with_file("guidelines/intro.md", "");

        assert!(!storage.exists(Path::new("guide")));
    }

    #[test]
    fn test_read_missing() {
        let storage = MockStorage::new();

        let err = storage.read(Path::new("toc.yaml")).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::NotFound);
        assert_eq!(err.backend(), Some("Mock"));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let storage = MockStorage::new().with_bytes("logo.png", vec![0xff, 0xfe]);

        let err = storage.read(Path::new("logo.png")).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::InvalidData);
        assert_eq!(
            storage.read_bytes(Path::new("logo.png")).unwrap(),
            vec![0xff, 0xfe]
        );
    }

    #[test]
    fn test_list_files_direct_children_only() {
        let storage = MockStorage::new()
            .with_bytes("guide/images/b.png", vec![1])
            .with_bytes("guide/images/a.png", vec![2])
            .with_bytes("guide/images/icons/x.svg", vec![3])
            .with_file("guide/intro.md", "");

        let files = storage.list_files(Path::new("guide/images")).unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("guide/images/a.png"),
                PathBuf::from("guide/images/b.png")
            ]
        );
        assert!(storage.list_files(Path::new("missing")).unwrap().is_empty());
    }
}
