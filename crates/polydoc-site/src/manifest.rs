//! Per-folder manifests.
//!
//! A manifest lists the children of a folder in navigation order. The default
//! format is a YAML sequence:
//!
//! ```yaml
//! - title: Guide
//!   folder: guide
//!   multilanguage: true
//! - document: intro.markdown
//! ```
//!
//! Each entry names exactly one of `folder` or `document`. A missing `title`
//! is derived from the slug.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use polydoc_storage::{Storage, StorageError};
use serde::Deserialize;

use crate::tree::Node;

/// Child entry produced by a manifest resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Display title.
    pub title: String,
    /// Directory name or source file name, as written in the manifest.
    pub slug: String,
    /// Entry shape.
    pub kind: EntryKind,
}

/// Shape of a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Sub-folder with its own manifest.
    Folder {
        /// Whether the folder fans out per supported language.
        multilanguage: bool,
    },
    /// Document source.
    Document,
}

/// Error returned when a manifest cannot be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Manifest file could not be read.
    #[error("Failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: StorageError,
    },
    /// Manifest is not valid YAML or has the wrong shape.
    #[error("Invalid manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// An entry is inconsistent.
    #[error("Invalid manifest {}: entry {index}: {message}", .path.display())]
    Entry {
        path: PathBuf,
        index: usize,
        message: String,
    },
}

/// Turns a folder's manifest file into its ordered child entries.
///
/// Called once per language pass of a folder; implementations must return
/// the same entries every time for an unchanged manifest.
pub trait ManifestResolver: Send + Sync {
    /// Resolve the children listed in `manifest` for the folder `owner`.
    fn resolve(&self, manifest: &Path, owner: &Node) -> Result<Vec<ManifestEntry>, ManifestError>;
}

/// Raw manifest entry as parsed from YAML.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    title: Option<String>,
    folder: Option<String>,
    document: Option<String>,
    #[serde(default)]
    multilanguage: bool,
}

/// YAML manifest resolver reading through [`Storage`].
pub struct YamlManifestResolver {
    storage: Arc<dyn Storage>,
}

impl YamlManifestResolver {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl ManifestResolver for YamlManifestResolver {
    fn resolve(&self, manifest: &Path, _owner: &Node) -> Result<Vec<ManifestEntry>, ManifestError> {
        let content = self
            .storage
            .read(manifest)
            .map_err(|source| ManifestError::Read {
                path: manifest.to_path_buf(),
                source,
            })?;
        parse_manifest(&content, manifest)
    }
}

/// Parse YAML manifest content.
///
/// Empty content yields no entries, same as a missing manifest.
pub(crate) fn parse_manifest(content: &str, path: &Path) -> Result<Vec<ManifestEntry>, ManifestError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let raw: Option<Vec<RawEntry>> =
        serde_yaml::from_str(trimmed).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    raw.unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let invalid = |message: &str| ManifestError::Entry {
                path: path.to_path_buf(),
                index,
                message: message.to_owned(),
            };
            let (slug, kind) = match (entry.folder, entry.document) {
                (Some(folder), None) => (
                    folder,
                    EntryKind::Folder {
                        multilanguage: entry.multilanguage,
                    },
                ),
                (None, Some(document)) if entry.multilanguage => {
                    return Err(invalid(&format!(
                        "document {document} cannot be multilanguage"
                    )));
                }
                (None, Some(document)) => (document, EntryKind::Document),
                (Some(_), Some(_)) => return Err(invalid("names both a folder and a document")),
                (None, None) => return Err(invalid("names neither a folder nor a document")),
            };
            if slug.trim_start_matches(['/', '\\']).is_empty() {
                return Err(invalid("has an empty name"));
            }
            let title = entry.title.unwrap_or_else(|| title_from_slug(&slug));
            Ok(ManifestEntry { title, slug, kind })
        })
        .collect()
}

/// Generate a title from a slug (`getting-started.markdown` → `Getting Started`).
fn title_from_slug(slug: &str) -> String {
    let name = slug
        .trim_start_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(slug);
    let name = name.split_once('.').map_or(name, |(stem, _)| stem);

    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
