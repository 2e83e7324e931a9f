//! Output sinks for compiled documents and images.
//!
//! The compile pass hands every compiled document and every image to an
//! [`OutputSink`]. The sink also decides whether HTML compilation runs at all
//! ([`ContentType`]), whether folders get generated index pages
//! ([`CompilationMode`]), and which root URL absolute links use.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::language::Language;
use crate::tree::{Node, join_segments};

/// Output content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentType {
    /// HTML pages; the compile pass runs.
    #[default]
    Html,
    /// Markdown output; the compile pass is a no-op.
    Markdown,
}

/// Compilation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompilationMode {
    /// Only documents listed in manifests are compiled.
    #[default]
    Normal,
    /// Every compiled folder also gets a generated `index` page.
    Legacy,
}

/// Error returned when persisting output fails.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Writing to the output directory failed.
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A document was saved before it was compiled.
    #[error("Document {0} has no content")]
    MissingContent(String),
}

/// Destination of compiled documents and copied images.
///
/// Called repeatedly from a single thread; implementations need no
/// coordination beyond interior mutability.
pub trait OutputSink: Send + Sync {
    /// Content type the site is compiled to.
    fn content_type(&self) -> ContentType;

    /// Compilation mode.
    fn compilation_mode(&self) -> CompilationMode;

    /// Root URL absolute links are resolved against.
    fn root_url(&self) -> &str;

    /// Persist a compiled document.
    fn save_document(&self, document: &Node) -> Result<(), OutputError>;

    /// Persist an image found in `folder`'s `images/` directory.
    ///
    /// `image` is the source path relative to the source root.
    fn save_image(&self, folder: &Node, image: &Path, data: &[u8]) -> Result<(), OutputError>;
}

/// Public path of a compiled page (`guide/Java/intro.html`).
#[must_use]
pub fn page_path(document: &Node) -> String {
    format!("{}.html", document.public_path())
}

/// Public path of a copied image (`guide/images/logo.png`).
#[must_use]
pub fn image_path(folder: &Node, image: &Path) -> String {
    let name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    join_segments(&join_segments(&folder.public_path(), "images"), &name)
}

/// Filesystem output writing the site below an output directory.
#[derive(Debug, Clone)]
pub struct FsOutput {
    output_dir: PathBuf,
    content_type: ContentType,
    mode: CompilationMode,
    root_url: String,
}

impl FsOutput {
    /// Create an HTML output in normal mode with root URL `/`.
    #[must_use]
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            content_type: ContentType::Html,
            mode: CompilationMode::Normal,
            root_url: "/".to_owned(),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: CompilationMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into();
        self
    }

    /// Directory the site is written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write(&self, relative: &str, data: &[u8]) -> Result<(), OutputError> {
        let path = self.output_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| OutputError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, data).map_err(|source| OutputError::Io { path, source })
    }
}

impl OutputSink for FsOutput {
    fn content_type(&self) -> ContentType {
        self.content_type
    }

    fn compilation_mode(&self) -> CompilationMode {
        self.mode
    }

    fn root_url(&self) -> &str {
        &self.root_url
    }

    fn save_document(&self, document: &Node) -> Result<(), OutputError> {
        let content = document
            .content()
            .ok_or_else(|| OutputError::MissingContent(document.public_path()))?;
        let path = page_path(document);
        tracing::debug!(path = %path, "Writing document");
        self.write(&path, content.as_bytes())
    }

    fn save_image(&self, folder: &Node, image: &Path, data: &[u8]) -> Result<(), OutputError> {
        let path = image_path(folder, image);
        tracing::debug!(path = %path, source = %image.display(), "Copying image");
        self.write(&path, data)
    }
}

/// Document recorded by [`MemoryOutput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    /// Public page path (`guide/Java/intro.html`).
    pub path: String,
    /// Document title.
    pub title: String,
    /// Document language.
    pub language: Language,
    /// Compiled content.
    pub content: String,
}

/// Image recorded by [`MemoryOutput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Public image path (`guide/images/logo.png`).
    pub path: String,
    /// Source path relative to the source root.
    pub source: PathBuf,
    /// Size in bytes.
    pub size: usize,
}

/// In-memory output recording everything it is given.
///
/// Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryOutput {
    content_type: ContentType,
    mode: CompilationMode,
    root_url: String,
    documents: Mutex<Vec<SavedDocument>>,
    images: Mutex<Vec<SavedImage>>,
}

impl MemoryOutput {
    /// Create an HTML output in normal mode with root URL `/`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root_url: "/".to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: CompilationMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into();
        self
    }

    /// Documents in the order they were saved.
    #[must_use]
    pub fn documents(&self) -> Vec<SavedDocument> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Last document saved at `path`.
    #[must_use]
    pub fn document(&self, path: &str) -> Option<SavedDocument> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|doc| doc.path == path)
            .cloned()
    }

    /// Images in the order they were saved.
    #[must_use]
    pub fn images(&self) -> Vec<SavedImage> {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl OutputSink for MemoryOutput {
    fn content_type(&self) -> ContentType {
        self.content_type
    }

    fn compilation_mode(&self) -> CompilationMode {
        self.mode
    }

    fn root_url(&self) -> &str {
        &self.root_url
    }

    fn save_document(&self, document: &Node) -> Result<(), OutputError> {
        let content = document
            .content()
            .ok_or_else(|| OutputError::MissingContent(document.public_path()))?;
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SavedDocument {
                path: page_path(document),
                title: document.title.clone(),
                language: document.language,
                content: content.to_owned(),
            });
        Ok(())
    }

    fn save_image(&self, folder: &Node, image: &Path, data: &[u8]) -> Result<(), OutputError> {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SavedImage {
                path: image_path(folder, image),
                source: image.to_path_buf(),
                size: data.len(),
            });
        Ok(())
    }
}
