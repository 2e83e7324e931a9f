//! Markdown rendering for polydoc.
//!
//! This crate provides:
//! - [`MarkdownRenderer`]: markdown to HTML with GFM extensions and
//!   rewriting of links between markdown sources into links between pages
//! - [`escape_html`]: escaping for text interpolated into HTML
//! - [`join_url`] and [`collapse_slashes`]: URL composition against a root URL
//! - [`fill_template`]: named `{placeholder}` substitution
//!
//! # Example
//!
//! ```
//! use polydoc_renderer::MarkdownRenderer;
//!
//! let html = MarkdownRenderer::new()
//!     .with_base_path("guide/Java")
//!     .render_markdown("See [setup](setup.md).");
//! assert!(html.contains(r#"href="/guide/Java/setup.html""#));
//! ```

mod html;
mod renderer;
mod template;
mod url;

pub use html::escape_html;
pub use renderer::MarkdownRenderer;
pub use template::fill_template;
pub use url::{collapse_slashes, join_url};
