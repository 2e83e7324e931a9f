//! CLI error types.

use std::path::PathBuf;

use polydoc_config::ConfigError;
use polydoc_site::{SiteError, UnknownLanguage};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Language(#[from] UnknownLanguage),

    #[error("Failed to read fallback template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
