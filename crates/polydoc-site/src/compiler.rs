//! Compile pass: renders the parsed tree through the output sink.

use std::path::Path;

use polydoc_storage::Storage;

use crate::error::SiteError;
use crate::fallback::{cross_link_url, documented_languages, link_list, qualified_source};
use crate::language::Language;
use crate::output::{CompilationMode, ContentType, OutputSink};
use crate::render::{DocumentRenderer, RenderContext};
use crate::settings::Settings;
use crate::site::BuildReport;
use crate::tree::{Node, NodeId, NodeKind, SiteTree, compose_trail, compose_virtual_trail};

/// Slug of the generated legacy index page.
const INDEX_SLUG: &str = "index";

/// Extension assumed for slugs that have none.
const DEFAULT_EXTENSION: &str = "md";

/// Tree renderer.
///
/// Walks the tree in manifest order, one language at a time, and hands every
/// compiled document and image to the output sink.
pub(crate) struct Compiler<'a> {
    storage: &'a dyn Storage,
    renderer: &'a dyn DocumentRenderer,
    output: &'a dyn OutputSink,
    settings: &'a Settings,
    pub(crate) report: BuildReport,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(
        storage: &'a dyn Storage,
        renderer: &'a dyn DocumentRenderer,
        output: &'a dyn OutputSink,
        settings: &'a Settings,
    ) -> Self {
        Self {
            storage,
            renderer,
            output,
            settings,
            report: BuildReport::default(),
        }
    }

    fn context(&self) -> RenderContext<'a> {
        RenderContext {
            settings: self.settings,
            root_url: self.output.root_url(),
        }
    }

    /// Compile the subtree of `folder` for `current`.
    pub(crate) fn render_tree(
        &mut self,
        tree: &mut SiteTree,
        folder: NodeId,
        current: Language,
    ) -> Result<(), SiteError> {
        let node = tree.get(folder);
        let dir = node.physical_path();
        if !self.storage.is_file(&self.settings.manifest_path(&dir)) {
            return Ok(());
        }
        if self.output.content_type() != ContentType::Html {
            return Ok(());
        }

        let languages = self
            .settings
            .languages
            .fan_out(node.is_multilanguage(), current);

        for language in languages {
            let children: Vec<NodeId> = tree
                .children(folder)
                .iter()
                .copied()
                .filter(|&id| {
                    let child = tree.get(id);
                    child.language == language && !child.is_synthetic()
                })
                .collect();

            for id in children {
                if tree.get(id).is_folder() {
                    self.render_tree(tree, id, language)?;
                } else {
                    self.render_document(tree, id, &dir, language)?;
                }
            }
        }

        if self.output.compilation_mode() == CompilationMode::Legacy {
            let index = self.legacy_index(tree, folder);
            self.render_document(tree, index, &dir, self.settings.languages.primary())?;
        }

        self.copy_images(tree.get(folder), &dir)
    }

    /// Generated index document of `folder`, appended on first visit.
    ///
    /// The index is written for the primary language but published under the
    /// folder's own public path.
    fn legacy_index(&self, tree: &mut SiteTree, folder: NodeId) -> NodeId {
        if let Some(&existing) = tree
            .children(folder)
            .iter()
            .find(|&&id| tree.get(id).is_synthetic())
        {
            return existing;
        }

        let primary = self.settings.languages.primary();
        let parent = tree.get(folder);
        let mut index = Node::document(parent.title.clone(), INDEX_SLUG);
        index.kind = NodeKind::Document {
            source_slug: format!("{INDEX_SLUG}.{DEFAULT_EXTENSION}"),
            content: None,
            synthetic: true,
        };
        index.language = primary;
        index.trail = compose_trail(parent);
        index.virtual_trail = compose_virtual_trail(parent, parent.language);
        tree.add_child(folder, index)
    }

    /// Render one document, or its fallback page, and persist it.
    pub(crate) fn render_document(
        &mut self,
        tree: &mut SiteTree,
        id: NodeId,
        folder_path: &Path,
        language: Language,
    ) -> Result<String, SiteError> {
        let ctx = self.context();
        let document = tree.get(id);
        let (canonical, extension) = split_slug(document.source_slug());
        let effective = language.resolve(&document.virtual_trail, ctx.settings.languages.primary());

        let candidates = [
            folder_path.join(qualified_source(&canonical, effective, &extension)),
            folder_path.join(document.source_slug()),
        ];
        let source = candidates.iter().find(|path| self.storage.is_file(path));

        let content = if let Some(source) = source {
            tracing::debug!(source = %source.display(), language = %effective, "Rendering document");
            self.renderer.render(
                &ctx,
                tree.parent(id),
                document,
                source,
                &document.virtual_trail,
            )?
        } else {
            let own_url = cross_link_url(
                &document.virtual_trail,
                effective,
                effective,
                &canonical,
                ctx.root_url,
            );
            let links: Vec<(Language, String)> = documented_languages(
                self.storage,
                &ctx.settings.languages,
                folder_path,
                &canonical,
                &extension,
                effective,
            )
            .into_iter()
            .map(|target| {
                let url = cross_link_url(
                    &document.virtual_trail,
                    effective,
                    target,
                    &canonical,
                    ctx.root_url,
                );
                (target, url)
            })
            .filter(|(_, url)| *url != own_url)
            .collect();
            tracing::debug!(
                document = %document.public_path(),
                language = %effective,
                alternatives = links.len(),
                "No source, rendering fallback page"
            );
            self.report.fallbacks += 1;
            self.renderer.render_template(
                &ctx,
                &ctx.settings.fallback_template,
                &[("language", effective.label()), ("links", &link_list(&links))],
            )?
        };

        tree.set_compiled(id, canonical, content.clone());
        self.output.save_document(tree.get(id))?;
        self.report.documents += 1;
        Ok(content)
    }

    /// Copy every file of the folder's `images/` directory once.
    fn copy_images(&mut self, folder: &Node, dir: &Path) -> Result<(), SiteError> {
        for image in self.storage.list_files(&dir.join("images"))? {
            let data = self.storage.read_bytes(&image)?;
            self.output.save_image(folder, &image, &data)?;
            self.report.images += 1;
        }
        Ok(())
    }
}

/// Split a slug into canonical name and extension.
///
/// A slug without an extension gets [`DEFAULT_EXTENSION`].
fn split_slug(slug: &str) -> (String, String) {
    match slug.rsplit_once('.') {
        Some((canonical, extension)) if !canonical.is_empty() && !extension.is_empty() => {
            (canonical.to_owned(), extension.to_owned())
        }
        _ => (slug.to_owned(), DEFAULT_EXTENSION.to_owned()),
    }
}
