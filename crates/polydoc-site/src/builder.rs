//! Parse pass: builds the documentation tree from manifests.

use polydoc_storage::Storage;

use crate::language::Language;
use crate::manifest::{EntryKind, ManifestError, ManifestResolver};
use crate::settings::Settings;
use crate::tree::{Node, NodeId, SiteTree, compose_trail, compose_virtual_trail};

/// Recursive tree builder.
///
/// Every language variant of a multilanguage folder becomes a separate set of
/// sibling children, each stamped with its language and trails.
pub(crate) struct TreeBuilder<'a> {
    storage: &'a dyn Storage,
    resolver: &'a dyn ManifestResolver,
    settings: &'a Settings,
    /// Folders without a manifest.
    pub(crate) skipped_folders: usize,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(
        storage: &'a dyn Storage,
        resolver: &'a dyn ManifestResolver,
        settings: &'a Settings,
    ) -> Self {
        Self {
            storage,
            resolver,
            settings,
            skipped_folders: 0,
        }
    }

    /// Populate the children of `folder` and recurse into sub-folders.
    ///
    /// A folder without a manifest is left empty.
    pub(crate) fn build_tree(
        &mut self,
        tree: &mut SiteTree,
        folder: NodeId,
        inherited: Language,
    ) -> Result<(), ManifestError> {
        let node = tree.get(folder);
        let dir = node.physical_path();
        let manifest = self.settings.manifest_path(&dir);
        if !self.storage.is_file(&manifest) {
            tracing::debug!(path = %dir.display(), "No manifest, skipping folder");
            self.skipped_folders += 1;
            return Ok(());
        }

        let languages = self
            .settings
            .languages
            .fan_out(node.is_multilanguage(), inherited);

        for language in languages {
            let entries = self.resolver.resolve(&manifest, tree.get(folder))?;
            tracing::debug!(
                path = %manifest.display(),
                language = %language,
                entries = entries.len(),
                "Resolved manifest"
            );

            for entry in entries {
                let slug = normalize_slug(&entry.slug);
                let mut child = match entry.kind {
                    EntryKind::Folder { multilanguage } => {
                        Node::folder(entry.title, slug, multilanguage)
                    }
                    EntryKind::Document => Node::document(entry.title, slug),
                };

                let parent = tree.get(folder);
                child.language = language;
                child.trail = compose_trail(parent);
                child.virtual_trail = compose_virtual_trail(parent, language);

                let is_folder = child.is_folder();
                let id = tree.add_child(folder, child);
                if is_folder {
                    self.build_tree(tree, id, language)?;
                }
            }
        }

        Ok(())
    }
}

/// Strip leading path separators from a manifest slug.
fn normalize_slug(slug: &str) -> String {
    slug.trim_start_matches(['/', '\\']).to_owned()
}
