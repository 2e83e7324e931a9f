//! Storage abstraction for the polydoc source tree.
//!
//! The site builder never touches the filesystem directly. Manifests,
//! document sources, code samples and images are all read through the
//! [`Storage`] trait, which keeps the tree traversal testable without a
//! real source directory.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `exists()`, `is_file()`, `read()`, `read_bytes()` and `list_files()`
//! - [`FsStorage`] implementation rooted at a source directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::{Path, PathBuf};
//! use polydoc_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! if storage.exists(Path::new("guide/toc.yaml")) {
//!     let manifest = storage.read(Path::new("guide/toc.yaml"))?;
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};
