//! Multi-language documentation tree for Polydoc.
//!
//! This crate provides:
//! - [`Site`]: runs the parse pass (manifests to [`SiteTree`]) and the compile
//!   pass (tree to [`OutputSink`])
//! - [`Language`] fan-out: a multilanguage folder is replicated once per
//!   supported language, each copy published under its own language segment
//! - "Not documented" fallback pages linking to the languages that do have a
//!   source
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use polydoc_site::{FsOutput, Language, Languages, Site};
//! use polydoc_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let languages = Languages::new(vec![Language::DotNet, Language::Java], Language::DotNet)?;
//! let output = Arc::new(FsOutput::new(PathBuf::from("site")));
//!
//! let site = Site::builder(storage, languages).with_output(output).build()?;
//! let report = site.run()?;
//! println!("{} documents", report.documents);
//! # Ok(())
//! # }
//! ```

mod builder;
mod compiler;
mod error;
pub mod fallback;
mod language;
mod manifest;
mod output;
mod render;
mod settings;
mod site;
mod tree;

pub use error::SiteError;
pub use language::{Language, UnknownLanguage};
pub use manifest::{EntryKind, ManifestEntry, ManifestError, ManifestResolver, YamlManifestResolver};
pub use output::{
    CompilationMode, ContentType, FsOutput, MemoryOutput, OutputError, OutputSink, SavedDocument,
    SavedImage, image_path, page_path,
};
pub use render::{DocumentRenderer, MarkdownDocumentRenderer, RenderContext, RenderError};
pub use settings::{
    CodeSamples, DEFAULT_FALLBACK_TEMPLATE, DEFAULT_MANIFEST, Languages, Settings,
    UnregisteredLanguage,
};
pub use site::{BuildReport, Site, SiteBuilder};
pub use tree::{
    Node, NodeId, NodeKind, SiteTree, compose_trail, compose_virtual_trail, join_segments,
    with_language_segment,
};
