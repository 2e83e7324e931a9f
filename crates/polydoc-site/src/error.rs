//! Site build errors.

use polydoc_storage::StorageError;

use crate::manifest::ManifestError;
use crate::output::OutputError;
use crate::render::RenderError;

/// Error that aborts a site build.
///
/// Missing manifests and missing document sources are not errors: the first
/// skips a folder, the second produces a fallback page.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// [`crate::SiteBuilder::build`] was called without an output sink.
    #[error("Output sink is not configured")]
    OutputNotConfigured,
    /// Language set is unusable.
    #[error("Invalid language configuration: {0}")]
    InvalidLanguages(String),
    /// Manifest could not be read or parsed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    /// Document rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Output sink failed to persist a document or image.
    #[error(transparent)]
    Output(#[from] OutputError),
    /// Source tree read failed (images).
    #[error(transparent)]
    Storage(#[from] StorageError),
}
