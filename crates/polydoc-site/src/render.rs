//! Document rendering.
//!
//! Provides the [`DocumentRenderer`] trait the compile pass renders through,
//! and [`MarkdownDocumentRenderer`], which reads markdown sources from
//! [`Storage`], expands code sample includes and renders HTML.
//!
//! # Code samples
//!
//! A line consisting of `::sample[file]` is replaced by a fenced code block
//! holding `file` from the code sample directory of the document's language:
//!
//! ```markdown
//! Create a client:
//!
//! ::sample[CreateClient.java]
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use polydoc_renderer::{MarkdownRenderer, fill_template};
use polydoc_storage::{Storage, StorageError};
use regex::Regex;

use crate::settings::{Settings, UnregisteredLanguage};
use crate::tree::Node;

/// `::sample[file]` on its own line.
static SAMPLE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^::sample\[([^\]\r\n]+)\][ \t]*\r?$").unwrap());

/// Error returned when rendering a document fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Source or code sample could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: StorageError,
    },
    /// Code sample requested for a language without a sample directory.
    #[error(transparent)]
    UnregisteredLanguage(#[from] UnregisteredLanguage),
}

/// Shared, read-only state available while rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Compiler settings.
    pub settings: &'a Settings,
    /// Root URL absolute links resolve against.
    pub root_url: &'a str,
}

/// Renders document sources and fallback templates into final content.
pub trait DocumentRenderer: Send + Sync {
    /// Render `source` for `document`.
    ///
    /// `owner` is the folder the document belongs to. Relative links resolve
    /// against `link_trail`.
    fn render(
        &self,
        ctx: &RenderContext<'_>,
        owner: Option<&Node>,
        document: &Node,
        source: &Path,
        link_trail: &str,
    ) -> Result<String, RenderError>;

    /// Substitute `vars` into `template` and render the result.
    fn render_template(
        &self,
        ctx: &RenderContext<'_>,
        template: &str,
        vars: &[(&str, &str)],
    ) -> Result<String, RenderError>;
}

/// Markdown renderer reading sources through [`Storage`].
pub struct MarkdownDocumentRenderer {
    storage: Arc<dyn Storage>,
}

impl MarkdownDocumentRenderer {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    fn read(&self, path: &Path) -> Result<String, RenderError> {
        self.storage.read(path).map_err(|source| RenderError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace `::sample[file]` lines with fenced code blocks.
    fn expand_samples(
        &self,
        ctx: &RenderContext<'_>,
        document: &Node,
        link_trail: &str,
        markdown: &str,
    ) -> Result<String, RenderError> {
        if !SAMPLE_DIRECTIVE.is_match(markdown) {
            return Ok(markdown.to_owned());
        }

        let dir = ctx.settings.samples.sample_dir(
            document.language,
            link_trail,
            ctx.settings.languages.primary(),
        )?;

        let mut result = String::with_capacity(markdown.len());
        let mut last = 0;
        for caps in SAMPLE_DIRECTIVE.captures_iter(markdown) {
            let (Some(whole), Some(file)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            result.push_str(&markdown[last..whole.start()]);
            let path = dir.join(file.as_str().trim());
            tracing::debug!(sample = %path.display(), "Including code sample");
            result.push_str(&fenced(&self.read(&path)?, &path));
            last = whole.end();
        }
        result.push_str(&markdown[last..]);
        Ok(result)
    }
}

/// Wrap code in a fence longer than any backtick run it contains.
fn fenced(code: &str, path: &Path) -> String {
    let longest_run = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    let info = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{fence}{info}\n{}\n{fence}", code.trim_end_matches(['\r', '\n']))
}

impl DocumentRenderer for MarkdownDocumentRenderer {
    fn render(
        &self,
        ctx: &RenderContext<'_>,
        _owner: Option<&Node>,
        document: &Node,
        source: &Path,
        link_trail: &str,
    ) -> Result<String, RenderError> {
        let markdown = self.read(source)?;
        let markdown = self.expand_samples(ctx, document, link_trail, &markdown)?;
        Ok(MarkdownRenderer::new()
            .with_base_path(link_trail)
            .with_root_url(ctx.root_url)
            .render_markdown(&markdown))
    }

    fn render_template(
        &self,
        ctx: &RenderContext<'_>,
        template: &str,
        vars: &[(&str, &str)],
    ) -> Result<String, RenderError> {
        Ok(MarkdownRenderer::new()
            .with_root_url(ctx.root_url)
            .render_markdown(&fill_template(template, vars)))
    }
}
