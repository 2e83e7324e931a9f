//! Site facade running the parse and compile passes.
//!
//! [`Site`] wires storage, manifest resolver, renderer and output sink
//! together. The parse pass always completes for the whole tree before the
//! compile pass starts.

use std::sync::Arc;

use polydoc_storage::Storage;

use crate::builder::TreeBuilder;
use crate::compiler::Compiler;
use crate::error::SiteError;
use crate::language::Language;
use crate::manifest::{ManifestResolver, YamlManifestResolver};
use crate::output::OutputSink;
use crate::render::{DocumentRenderer, MarkdownDocumentRenderer};
use crate::settings::{CodeSamples, Languages, Settings};
use crate::tree::SiteTree;

/// Summary of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Nodes in the parsed tree, root included.
    pub nodes: usize,
    /// Documents handed to the output sink, fallback pages included.
    pub documents: usize,
    /// Fallback pages among `documents`.
    pub fallbacks: usize,
    /// Images handed to the output sink.
    pub images: usize,
    /// Folders skipped for lack of a manifest.
    pub skipped_folders: usize,
}

/// Documentation site.
///
/// Immutable once built; every run re-parses the source tree.
pub struct Site {
    storage: Arc<dyn Storage>,
    resolver: Arc<dyn ManifestResolver>,
    renderer: Arc<dyn DocumentRenderer>,
    output: Arc<dyn OutputSink>,
    settings: Settings,
    title: String,
    multilanguage_root: bool,
}

impl Site {
    /// Start configuring a site reading sources from `storage`.
    #[must_use]
    pub fn builder(storage: Arc<dyn Storage>, languages: Languages) -> SiteBuilder {
        SiteBuilder {
            storage,
            settings: Settings::new(languages),
            resolver: None,
            renderer: None,
            output: None,
            title: "Documentation".to_owned(),
            multilanguage_root: false,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the parse pass over the whole source tree.
    ///
    /// Returns the tree and the number of folders skipped for lack of a
    /// manifest.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Manifest`] if a manifest cannot be resolved.
    pub fn parse(&self) -> Result<(SiteTree, usize), SiteError> {
        let mut tree = SiteTree::new(self.title.clone(), self.multilanguage_root);
        let root = tree.root();
        let mut builder = TreeBuilder::new(
            self.storage.as_ref(),
            self.resolver.as_ref(),
            &self.settings,
        );
        builder.build_tree(&mut tree, root, Language::None)?;
        tracing::info!(
            nodes = tree.len(),
            skipped = builder.skipped_folders,
            "Parsed documentation tree"
        );
        Ok((tree, builder.skipped_folders))
    }

    /// Run the compile pass over a parsed tree.
    ///
    /// In legacy mode this appends generated index documents to `tree`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering, reading an image or persisting output fails.
    pub fn compile(&self, tree: &mut SiteTree) -> Result<BuildReport, SiteError> {
        let mut compiler = Compiler::new(
            self.storage.as_ref(),
            self.renderer.as_ref(),
            self.output.as_ref(),
            &self.settings,
        );
        let root = tree.root();
        compiler.render_tree(tree, root, Language::None)?;

        let mut report = compiler.report;
        report.nodes = tree.len();
        tracing::info!(
            documents = report.documents,
            fallbacks = report.fallbacks,
            images = report.images,
            "Compiled documentation tree"
        );
        Ok(report)
    }

    /// Parse, then compile.
    ///
    /// # Errors
    ///
    /// Returns the first error of either pass.
    pub fn run(&self) -> Result<BuildReport, SiteError> {
        let (mut tree, skipped_folders) = self.parse()?;
        let report = self.compile(&mut tree)?;
        Ok(BuildReport {
            skipped_folders,
            ..report
        })
    }
}

/// Builder for [`Site`].
pub struct SiteBuilder {
    storage: Arc<dyn Storage>,
    settings: Settings,
    resolver: Option<Arc<dyn ManifestResolver>>,
    renderer: Option<Arc<dyn DocumentRenderer>>,
    output: Option<Arc<dyn OutputSink>>,
    title: String,
    multilanguage_root: bool,
}

impl SiteBuilder {
    #[must_use]
    pub fn with_samples(mut self, samples: CodeSamples) -> Self {
        self.settings.samples = samples;
        self
    }

    /// Per-folder manifest filename (default `toc.yaml`).
    #[must_use]
    pub fn with_manifest_name(mut self, manifest: impl Into<String>) -> Self {
        self.settings.manifest = manifest.into();
        self
    }

    /// Markdown template of "not documented" pages.
    #[must_use]
    pub fn with_fallback_template(mut self, template: impl Into<String>) -> Self {
        self.settings.fallback_template = template.into();
        self
    }

    /// Replace the YAML manifest resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn ManifestResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replace the markdown renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: Arc<dyn OutputSink>) -> Self {
        self.output = Some(output);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Fan the root folder out over every supported language.
    #[must_use]
    pub fn with_multilanguage_root(mut self, multilanguage: bool) -> Self {
        self.multilanguage_root = multilanguage;
        self
    }

    /// Build the site.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::OutputNotConfigured`] if no output sink was given.
    pub fn build(self) -> Result<Site, SiteError> {
        let output = self.output.ok_or(SiteError::OutputNotConfigured)?;
        let resolver: Arc<dyn ManifestResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(YamlManifestResolver::new(Arc::clone(&self.storage))),
        };
        let renderer: Arc<dyn DocumentRenderer> = match self.renderer {
            Some(renderer) => renderer,
            None => Arc::new(MarkdownDocumentRenderer::new(Arc::clone(&self.storage))),
        };
        Ok(Site {
            storage: self.storage,
            resolver,
            renderer,
            output,
            settings: self.settings,
            title: self.title,
            multilanguage_root: self.multilanguage_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use polydoc_storage::{FsStorage, MockStorage};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::output::{CompilationMode, ContentType, FsOutput, MemoryOutput};

    static_assertions::assert_impl_all!(Site: Send, Sync);

    const GUIDE_MANIFEST: &str = "- title: Guide\n  folder: guide\n  multilanguage: true\n";

    fn languages() -> Languages {
        Languages::new(
            vec![Language::DotNet, Language::Java, Language::Http],
            Language::DotNet,
        )
        .unwrap()
    }

    fn guide_storage() -> MockStorage {
        MockStorage::new()
            .with_file("toc.yaml", GUIDE_MANIFEST)
            .with_file("guide/toc.yaml", "- document: intro.markdown\n")
            .with_file("guide/intro.Java.markdown", "# Java intro\n")
            .with_file("guide/intro.DotNet.markdown", "# .NET intro\n")
    }

    fn run(storage: MockStorage, output: MemoryOutput) -> (BuildReport, Arc<MemoryOutput>) {
        let output = Arc::new(output);
        let site = Site::builder(Arc::new(storage), languages())
            .with_output(Arc::clone(&output) as Arc<dyn OutputSink>)
            .build()
            .unwrap();
        let report = site.run().unwrap();
        (report, output)
    }

    fn paths(output: &MemoryOutput) -> Vec<String> {
        output.documents().into_iter().map(|doc| doc.path).collect()
    }

    #[test]
    fn test_round_trip_with_fallback() {
        let (report, output) = run(guide_storage(), MemoryOutput::new());

        assert_eq!(
            paths(&output),
            vec![
                "guide/DotNet/intro.html",
                "guide/Java/intro.html",
                "guide/Http/intro.html",
            ]
        );
        let java = output.document("guide/Java/intro.html").unwrap();
        assert_eq!(java.content, "<h1>Java intro</h1>\n");
        let dotnet = output.document("guide/DotNet/intro.html").unwrap();
        assert_eq!(dotnet.content, "<h1>.NET intro</h1>\n");

        let http = output.document("guide/Http/intro.html").unwrap();
        assert_eq!(http.language, Language::Http);
        assert!(http.content.contains("not documented for HTTP yet"));
        assert!(http.content.contains(r#"<a href="/guide/DotNet/intro.html">.NET</a>"#));
        assert!(http.content.contains(r#"<a href="/guide/Java/intro.html">Java</a>"#));

        assert_eq!(
            report,
            BuildReport {
                nodes: 5,
                documents: 3,
                fallbacks: 1,
                images: 0,
                skipped_folders: 0,
            }
        );
    }

    #[test]
    fn test_compile_twice_keeps_sources() {
        let output = Arc::new(MemoryOutput::new());
        let site = Site::builder(Arc::new(guide_storage()), languages())
            .with_output(Arc::clone(&output) as Arc<dyn OutputSink>)
            .build()
            .unwrap();
        let (mut tree, _) = site.parse().unwrap();

        let first = site.compile(&mut tree).unwrap();
        let second = site.compile(&mut tree).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.fallbacks, 1);
        let java = output.document("guide/Java/intro.html").unwrap();
        assert_eq!(java.content, "<h1>Java intro</h1>\n");
        assert_eq!(output.documents().len(), 6);
    }

    #[test]
    fn test_slug_without_extension_reads_plain_file() {
        let storage = MockStorage::new()
            .with_file("toc.yaml", "- document: README\n")
            .with_file("README", "Readme body");

        let (report, output) = run(storage, MemoryOutput::new());

        assert_eq!(report.fallbacks, 0);
        let readme = output.document("README.html").unwrap();
        assert_eq!(readme.content, "<p>Readme body</p>\n");
    }

    #[test]
    fn test_fallback_links_only_documented_languages() {
        let storage = MockStorage::new()
            .with_file("toc.yaml", GUIDE_MANIFEST)
            .with_file("guide/toc.yaml", "- document: setup.md\n")
            .with_file("guide/setup.Java.md", "Java setup");

        let (report, output) = run(storage, MemoryOutput::new());

        assert_eq!(report.fallbacks, 2);
        for path in ["guide/DotNet/setup.html", "guide/Http/setup.html"] {
            let content = output.document(path).unwrap().content;
            assert_eq!(content.matches("<a ").count(), 1);
            assert!(content.contains(r#"href="/guide/Java/setup.html""#));
        }
    }

    #[test]
    fn test_fallback_links_use_root_url() {
        let (_, output) = run(
            guide_storage(),
            MemoryOutput::new().with_root_url("https://docs.example.com/sdk/"),
        );

        let http = output.document("guide/Http/intro.html").unwrap();
        assert!(
            http.content
                .contains(r#"href="https://docs.example.com/sdk/guide/Java/intro.html""#)
        );
    }

    #[test]
    fn test_no_root_manifest_produces_nothing() {
        let storage = MockStorage::new().with_file("guide/intro.md", "Intro");

        let (report, output) = run(storage, MemoryOutput::new());

        assert!(output.documents().is_empty());
        assert!(output.images().is_empty());
        assert_eq!(report.nodes, 1);
        assert_eq!(report.skipped_folders, 1);
    }

    #[test]
    fn test_strict_language_filter_in_nested_folders() {
        let storage = guide_storage()
            .with_file("guide/toc.yaml", "- folder: api\n")
            .with_file("guide/api/toc.yaml", "- document: auth.md\n")
            .with_file("guide/api/auth.md", "Auth");

        let (_, output) = run(storage, MemoryOutput::new());

        let docs = output.documents();
        assert_eq!(docs.len(), 3);
        for (doc, language) in docs
            .iter()
            .zip([Language::DotNet, Language::Java, Language::Http])
        {
            assert_eq!(doc.language, language);
            assert_eq!(doc.path, format!("guide/{language}/api/auth.html"));
        }
    }

    #[test]
    fn test_images_copied_once_per_folder() {
        let storage = guide_storage()
            .with_bytes("guide/images/logo.png", vec![0x89, 0x50, 0x4e, 0x47])
            .with_bytes("guide/images/arch.svg", b"<svg/>".to_vec());

        let (report, output) = run(storage, MemoryOutput::new());

        let images: Vec<_> = output.images().into_iter().map(|i| i.path).collect();
        assert_eq!(images, vec!["guide/images/arch.svg", "guide/images/logo.png"]);
        assert_eq!(report.images, 2);
    }

    #[test]
    fn test_legacy_mode_adds_index_per_folder() {
        let storage = guide_storage().with_file("guide/index.md", "# Guide home\n");

        let (report, output) = run(
            storage,
            MemoryOutput::new().with_mode(CompilationMode::Legacy),
        );

        let index = output.document("guide/index.html").unwrap();
        assert_eq!(index.content, "<h1>Guide home</h1>\n");
        assert_eq!(index.language, Language::DotNet);
        // Root has no index source and gets a fallback page.
        assert!(output.document("index.html").is_some());
        assert_eq!(report.documents, 5);
    }

    #[test]
    fn test_markdown_content_type_is_noop() {
        let (report, output) = run(
            guide_storage(),
            MemoryOutput::new().with_content_type(ContentType::Markdown),
        );

        assert!(output.documents().is_empty());
        assert_eq!(report.documents, 0);
        assert_eq!(report.nodes, 5);
    }

    #[test]
    fn test_build_without_output_fails() {
        let result = Site::builder(Arc::new(MockStorage::new()), languages()).build();

        assert!(matches!(result, Err(SiteError::OutputNotConfigured)));
    }

    #[test]
    fn test_invalid_manifest_aborts_run() {
        let storage = MockStorage::new().with_file("toc.yaml", "- folder: [broken");
        let site = Site::builder(Arc::new(storage), languages())
            .with_output(Arc::new(MemoryOutput::new()))
            .build()
            .unwrap();

        let err = site.run().unwrap_err();
        assert!(matches!(err, SiteError::Manifest(_)));
    }

    #[test]
    fn test_custom_manifest_name() {
        let storage = MockStorage::new()
            .with_file("index.yml", "- document: intro.md\n")
            .with_file("intro.md", "Intro");
        let output = Arc::new(MemoryOutput::new());
        let site = Site::builder(Arc::new(storage), languages())
            .with_manifest_name("index.yml")
            .with_output(Arc::clone(&output) as Arc<dyn OutputSink>)
            .build()
            .unwrap();

        site.run().unwrap();

        assert_eq!(paths(&output), vec!["intro.html"]);
    }

    #[test]
    fn test_multilanguage_root() {
        let storage = MockStorage::new()
            .with_file("toc.yaml", "- document: intro.md\n")
            .with_file("intro.md", "Intro");
        let output = Arc::new(MemoryOutput::new());
        let site = Site::builder(Arc::new(storage), languages())
            .with_multilanguage_root(true)
            .with_output(Arc::clone(&output) as Arc<dyn OutputSink>)
            .build()
            .unwrap();

        site.run().unwrap();

        assert_eq!(
            paths(&output),
            vec!["DotNet/intro.html", "Java/intro.html", "Http/intro.html"]
        );
    }

    #[test]
    fn test_end_to_end_on_disk() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let write = |relative: &str, content: &[u8]| {
            let path = source.path().join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        };
        write("toc.yaml", GUIDE_MANIFEST.as_bytes());
        write("guide/toc.yaml", b"- document: intro.markdown\n");
        write("guide/intro.Java.markdown", b"See [setup](setup.md).\n");
        write("guide/images/logo.png", &[1, 2, 3]);

        let site = Site::builder(
            Arc::new(FsStorage::new(source.path().to_path_buf())),
            languages(),
        )
        .with_output(Arc::new(FsOutput::new(target.path().to_path_buf())))
        .build()
        .unwrap();
        let report = site.run().unwrap();

        let java = fs::read_to_string(target.path().join("guide/Java/intro.html")).unwrap();
        assert_eq!(
            java,
            "<p>See <a href=\"/guide/Java/setup.html\">setup</a>.</p>\n"
        );
        let dotnet = fs::read_to_string(target.path().join("guide/DotNet/intro.html")).unwrap();
        assert!(dotnet.contains(r#"href="/guide/Java/intro.html""#));
        assert_eq!(
            fs::read(target.path().join(PathBuf::from("guide/images/logo.png"))).unwrap(),
            vec![1, 2, 3]
        );
        assert_eq!(report.fallbacks, 2);
    }

    #[test]
    fn test_directory_named_like_source_is_ignored() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        fs::write(source.path().join("toc.yaml"), "- document: intro.md\n").unwrap();
        fs::create_dir_all(source.path().join("intro.md")).unwrap();

        let site = Site::builder(
            Arc::new(FsStorage::new(source.path().to_path_buf())),
            languages(),
        )
        .with_output(Arc::new(FsOutput::new(target.path().to_path_buf())))
        .build()
        .unwrap();
        let report = site.run().unwrap();

        assert_eq!(report.fallbacks, 1);
        let intro = fs::read_to_string(target.path().join("intro.html")).unwrap();
        assert!(intro.contains("not documented for .NET yet"));
    }
}
