//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use polydoc_config::{CliSettings, Config};
use polydoc_site::{CodeSamples, CompilationMode, ContentType, Language, Languages, Site, SiteBuilder};
use polydoc_storage::{FsStorage, Storage};

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;

/// Arguments shared by every command that compiles the site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover polydoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Root URL absolute links resolve against (overrides config).
    #[arg(long, env = "POLYDOC_ROOT_URL")]
    root_url: Option<String>,

    /// Generate an index page for every folder.
    #[arg(long)]
    legacy: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl SiteArgs {
    /// Load the configuration with command line overrides applied.
    pub(crate) fn load_config(&self, output_dir: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            output_dir,
            root_url: self.root_url.clone(),
            mode: self
                .legacy
                .then_some(polydoc_config::CompilationMode::Legacy),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Site builder for a loaded configuration, output sink not yet set.
pub(crate) fn site_builder(config: &Config) -> Result<SiteBuilder, CliError> {
    let languages = &config.languages_resolved;
    let supported = languages
        .supported
        .iter()
        .map(|name| name.parse::<Language>())
        .collect::<Result<Vec<_>, _>>()?;
    let primary = languages.primary.parse::<Language>()?;

    let mut samples = CodeSamples::new();
    for (name, dir) in &languages.samples {
        samples = samples.with_dir(name.parse::<Language>()?, dir.clone());
    }

    let storage: Arc<dyn Storage> =
        Arc::new(FsStorage::new(config.docs_resolved.source_dir.clone()));
    let mut builder = Site::builder(storage, Languages::new(supported, primary)?)
        .with_samples(samples)
        .with_manifest_name(config.docs_resolved.manifest.clone());

    if let Some(path) = &config.site_resolved.fallback_template {
        let template = std::fs::read_to_string(path).map_err(|source| CliError::Template {
            path: path.clone(),
            source,
        })?;
        builder = builder.with_fallback_template(template);
    }

    Ok(builder)
}

pub(crate) fn content_type(config: &Config) -> ContentType {
    match config.site_resolved.content_type {
        polydoc_config::ContentType::Html => ContentType::Html,
        polydoc_config::ContentType::Markdown => ContentType::Markdown,
    }
}

pub(crate) fn compilation_mode(config: &Config) -> CompilationMode {
    match config.site_resolved.mode {
        polydoc_config::CompilationMode::Normal => CompilationMode::Normal,
        polydoc_config::CompilationMode::Legacy => CompilationMode::Legacy,
    }
}
