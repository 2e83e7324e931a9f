//! Markdown to HTML rendering.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag};

use crate::url::join_url;

/// Source extensions whose links are rewritten to compiled pages.
const MARKDOWN_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

/// Markdown renderer producing HTML fragments.
///
/// Links to other markdown sources are rewritten into links to their
/// compiled `.html` pages:
/// - relative links resolve against the base path (the page's virtual trail)
/// - root-absolute links resolve against the root URL only
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    base_path: Option<String>,
    root_url: String,
    gfm: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled and root URL `/`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_path: None,
            root_url: "/".to_owned(),
            gfm: true,
        }
    }

    /// Set base path for resolving relative links.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Set the root URL rewritten links are prefixed with.
    #[must_use]
    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into();
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown text to an HTML fragment.
    #[must_use]
    pub fn render_markdown(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.parser_options());
        let events = parser.map(|event| match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Link {
                link_type,
                dest_url: self.transform_link(dest_url),
                title,
                id,
            }),
            other => other,
        });

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events);
        html
    }

    fn transform_link<'a>(&self, url: CowStr<'a>) -> CowStr<'a> {
        match resolve_link(&url, self.base_path.as_deref().unwrap_or(""), &self.root_url) {
            Some(resolved) => CowStr::from(resolved),
            None => url,
        }
    }
}

/// Resolve a link between markdown sources into a page URL.
///
/// Returns `None` for links that are left untouched: external URLs,
/// fragment-only links and links to anything other than markdown sources.
fn resolve_link(url: &str, base_path: &str, root_url: &str) -> Option<String> {
    if url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with('#')
    {
        return None;
    }

    let (path_part, fragment) = match url.find('#') {
        Some(hash_pos) => url.split_at(hash_pos),
        None => (url, ""),
    };

    let stem = MARKDOWN_EXTENSIONS
        .iter()
        .find_map(|ext| path_part.strip_suffix(ext))?;

    let resolved = if let Some(absolute) = stem.strip_prefix('/') {
        absolute.to_owned()
    } else {
        resolve_relative_path(stem, base_path)
    };

    Some(format!("{}.html{fragment}", join_url(root_url, &resolved)))
}

/// Resolve a relative path against a base path.
///
/// Handles `.` (current), `..` (parent), and plain relative paths.
/// `..` never climbs above the root.
fn resolve_relative_path(relative: &str, base: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_paragraph() {
        let html = MarkdownRenderer::new().render_markdown("Hello **world**");
        assert_eq!(html, "<p>Hello <strong>world</strong></p>\n");
    }

    #[test]
    fn test_render_gfm_table() {
        let html = MarkdownRenderer::new().render_markdown("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_render_without_gfm() {
        let html = MarkdownRenderer::new()
            .with_gfm(false)
            .render_markdown("~~gone~~");
        assert!(!html.contains("<del>"));
    }

    #[test]
    fn test_render_raw_html_passthrough() {
        let html = MarkdownRenderer::new().render_markdown("<ul>\n<li>x</li>\n</ul>");
        assert!(html.contains("<ul>\n<li>x</li>\n</ul>"));
    }

    #[test]
    fn test_render_rewrites_relative_link() {
        let html = MarkdownRenderer::new()
            .with_base_path("guide/DotNet")
            .render_markdown("[Setup](setup.markdown)");
        assert!(html.contains(r#"<a href="/guide/DotNet/setup.html">Setup</a>"#));
    }

    #[test]
    fn test_render_keeps_external_link() {
        let html = MarkdownRenderer::new()
            .with_base_path("guide")
            .render_markdown("[Site](https://example.com/readme.md)");
        assert!(html.contains(r#"href="https://example.com/readme.md""#));
    }

    #[test]
    fn test_resolve_link_parent() {
        assert_eq!(
            resolve_link("../faq.md", "guide/Java", "/"),
            Some("/guide/faq.html".to_owned())
        );
    }

    #[test]
    fn test_resolve_link_absolute_with_root() {
        assert_eq!(
            resolve_link("/api/index.md#auth", "guide/Java", "https://docs.example.com/sdk/"),
            Some("https://docs.example.com/sdk/api/index.html#auth".to_owned())
        );
    }

    #[test]
    fn test_resolve_link_fragment_only() {
        assert_eq!(resolve_link("#section", "guide", "/"), None);
    }

    #[test]
    fn test_resolve_link_non_markdown() {
        assert_eq!(resolve_link("images/logo.png", "guide", "/"), None);
    }

    #[test]
    fn test_resolve_link_traversal_clamped() {
        assert_eq!(
            resolve_link("../../../etc/passwd.md", "a/b", "/"),
            Some("/etc/passwd.html".to_owned())
        );
    }
}
