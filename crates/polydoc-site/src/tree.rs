//! Documentation tree and path composition.
//!
//! The tree is an arena: nodes live in a flat `Vec` and refer to each other by
//! [`NodeId`]. A folder owns the ordered list of its children; the parent link
//! is a plain index used to reconstruct paths and never to drop a subtree.
//!
//! # Trails
//!
//! - `trail` is the physical container path of a node: its parent's trail
//!   joined with its parent's slug, never its own slug.
//! - `virtual_trail` is the public URL path of that container. It follows the
//!   same composition and additionally carries the node's language segment
//!   once the language is resolved.

use std::path::PathBuf;

use crate::language::Language;

/// Index of a node in a [`SiteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Node payload: exactly one of the two tree item shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Directory with a manifest.
    Folder {
        /// Whether the folder's content is replicated once per supported language.
        multilanguage: bool,
        /// Children in manifest order.
        children: Vec<NodeId>,
    },
    /// Leaf page.
    Document {
        /// Slug as listed in the manifest; kept after the slug is canonicalized.
        source_slug: String,
        /// Rendered content, set by the compile pass.
        content: Option<String>,
        /// Generated by legacy compilation rather than listed in a manifest.
        synthetic: bool,
    },
}

/// Tree item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Display title.
    pub title: String,
    /// Directory name (folders) or source file name (documents).
    pub slug: String,
    /// Physical container path.
    pub trail: String,
    /// Public container path, including the language segment.
    pub virtual_trail: String,
    /// Resolved language of this node.
    pub language: Language,
    parent: Option<NodeId>,
    /// Folder or document payload.
    pub kind: NodeKind,
}

impl Node {
    /// Create a detached folder node.
    #[must_use]
    pub fn folder(title: impl Into<String>, slug: impl Into<String>, multilanguage: bool) -> Self {
        Self::new(
            title.into(),
            slug.into(),
            NodeKind::Folder {
                multilanguage,
                children: Vec::new(),
            },
        )
    }

    /// Create a detached document node.
    #[must_use]
    pub fn document(title: impl Into<String>, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self::new(
            title.into(),
            slug.clone(),
            NodeKind::Document {
                source_slug: slug,
                content: None,
                synthetic: false,
            },
        )
    }

    fn new(title: String, slug: String, kind: NodeKind) -> Self {
        Self {
            title,
            slug,
            trail: String::new(),
            virtual_trail: String::new(),
            language: Language::None,
            parent: None,
            kind,
        }
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Whether this is a multilanguage folder.
    #[must_use]
    pub fn is_multilanguage(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Folder {
                multilanguage: true,
                ..
            }
        )
    }

    /// Whether this is a document generated by legacy compilation.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Document {
                synthetic: true,
                ..
            }
        )
    }

    /// Children in manifest order; empty for documents.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Folder { children, .. } => children,
            NodeKind::Document { .. } => &[],
        }
    }

    /// Manifest slug of a document, the current slug for folders.
    #[must_use]
    pub fn source_slug(&self) -> &str {
        match &self.kind {
            NodeKind::Document { source_slug, .. } => source_slug,
            NodeKind::Folder { .. } => &self.slug,
        }
    }

    /// Rendered content of a compiled document.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Document { content, .. } => content.as_deref(),
            NodeKind::Folder { .. } => None,
        }
    }

    /// Physical path of the node itself: `trail` joined with `slug`.
    #[must_use]
    pub fn physical_path(&self) -> PathBuf {
        PathBuf::from(join_segments(&self.trail, &self.slug))
    }

    /// Public path of the node itself: `virtual_trail` joined with `slug`.
    #[must_use]
    pub fn public_path(&self) -> String {
        join_segments(&self.virtual_trail, &self.slug)
    }
}

/// Arena-backed documentation tree.
#[derive(Debug, Clone)]
pub struct SiteTree {
    nodes: Vec<Node>,
}

impl SiteTree {
    /// Create a tree with a root folder at the source root.
    ///
    /// The root has an empty slug and empty trails.
    #[must_use]
    pub fn new(title: impl Into<String>, multilanguage: bool) -> Self {
        Self {
            nodes: vec![Node::folder(title, "", multilanguage)],
        }
    }

    /// Root folder.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Children of a node in manifest order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).children()
    }

    /// Parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        self.get(id).parent.map(|p| self.get(p))
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `node` to the children of `parent` and return its id.
    ///
    /// The parent link is set here and never changes afterwards. Appending to
    /// a document leaves the node detached from any children list.
    pub(crate) fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        if let NodeKind::Folder { children, .. } = &mut self.nodes[parent.0].kind {
            children.push(id);
        }
        id
    }

    /// Store rendered content and the canonical slug of a document.
    pub(crate) fn set_compiled(&mut self, id: NodeId, slug: String, rendered: String) {
        let node = &mut self.nodes[id.0];
        node.slug = slug;
        if let NodeKind::Document { content, .. } = &mut node.kind {
            *content = Some(rendered);
        }
    }
}

/// Join two path fragments with `/`, skipping empty ones.
#[must_use]
pub fn join_segments(base: &str, segment: &str) -> String {
    let base = base.trim_end_matches('/');
    let segment = segment.trim_start_matches('/');
    match (base.is_empty(), segment.is_empty()) {
        (true, _) => segment.to_owned(),
        (false, true) => base.to_owned(),
        (false, false) => format!("{base}/{segment}"),
    }
}

/// Trail for a child of `parent`: the parent's trail joined with the parent's slug.
#[must_use]
pub fn compose_trail(parent: &Node) -> String {
    join_segments(&parent.trail, &parent.slug)
}

/// Virtual trail for a child of `parent` resolved to `language`.
#[must_use]
pub fn compose_virtual_trail(parent: &Node, language: Language) -> String {
    with_language_segment(&join_segments(&parent.virtual_trail, &parent.slug), language)
}

/// Append the language segment to a public path unless it is redundant.
///
/// Nothing is appended for [`Language::None`] or when the path already holds a
/// language segment (any language), so repeated application is a no-op and
/// nested fan-out never stacks a second segment.
#[must_use]
pub fn with_language_segment(path: &str, language: Language) -> String {
    let has_language = path
        .split(['/', '\\'])
        .any(|segment| Language::ALL.iter().any(|l| l.name() == segment));
    if language.is_none() || has_language {
        path.to_owned()
    } else {
        join_segments(path, language.name())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn guide_folder() -> Node {
        let mut guide = Node::folder("Guide", "guide", true);
        guide.trail = String::new();
        guide.virtual_trail = String::new();
        guide
    }

    #[test]
    fn test_join_segments() {
        assert_eq!(join_segments("", ""), "");
        assert_eq!(join_segments("", "guide"), "guide");
        assert_eq!(join_segments("guide", ""), "guide");
        assert_eq!(join_segments("guide/", "/Java"), "guide/Java");
    }

    #[test]
    fn test_compose_trail_excludes_child_slug() {
        let mut api = Node::folder("API", "api", false);
        api.trail = "guide".to_owned();

        let trail = compose_trail(&api);
        assert_eq!(trail, "guide/api");
        assert!(!trail.ends_with("intro.markdown"));
    }

    #[test]
    fn test_compose_trail_under_root() {
        let root = Node::folder("", "", false);
        assert_eq!(compose_trail(&root), "");
    }

    #[test]
    fn test_compose_virtual_trail_injects_language() {
        let guide = guide_folder();
        assert_eq!(compose_virtual_trail(&guide, Language::Java), "guide/Java");
        assert_eq!(compose_virtual_trail(&guide, Language::None), "guide");
    }

    #[test]
    fn test_with_language_segment_idempotent() {
        let once = with_language_segment("guide", Language::Http);
        let twice = with_language_segment(&once, Language::Http);
        assert_eq!(once, "guide/Http");
        assert_eq!(twice, once);
    }

    #[test]
    fn test_with_language_segment_no_second_language() {
        assert_eq!(
            with_language_segment("guide/Java/api", Language::DotNet),
            "guide/Java/api"
        );
    }

    #[test]
    fn test_with_language_segment_matches_whole_segments() {
        assert_eq!(
            with_language_segment("javadoc", Language::Java),
            "javadoc/Java"
        );
    }

    #[test]
    fn test_tree_parent_links() {
        let mut tree = SiteTree::new("Docs", false);
        let root = tree.root();
        let guide = tree.add_child(root, guide_folder());
        let intro = tree.add_child(guide, Node::document("Intro", "intro.markdown"));

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.children(root), &[guide]);
        assert_eq!(tree.children(guide), &[intro]);
        assert_eq!(tree.get(intro).parent(), Some(guide));
        assert_eq!(tree.parent(intro).map(|n| n.slug.as_str()), Some("guide"));
        assert!(tree.parent(root).is_none());
    }

    #[test]
    fn test_set_compiled() {
        let mut tree = SiteTree::new("Docs", false);
        let root = tree.root();
        let intro = tree.add_child(root, Node::document("Intro", "intro.markdown"));

        tree.set_compiled(intro, "intro".to_owned(), "<p>Hi</p>".to_owned());

        assert_eq!(tree.get(intro).slug, "intro");
        assert_eq!(tree.get(intro).source_slug(), "intro.markdown");
        assert_eq!(tree.get(intro).content(), Some("<p>Hi</p>"));
    }

    #[test]
    fn test_physical_and_public_paths() {
        let mut doc = Node::document("Intro", "intro");
        doc.trail = "guide".to_owned();
        doc.virtual_trail = "guide/Java".to_owned();

        assert_eq!(doc.physical_path(), PathBuf::from("guide/intro"));
        assert_eq!(doc.public_path(), "guide/Java/intro");
    }
}
