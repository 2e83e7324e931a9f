//! Immutable compiler settings shared by both passes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::SiteError;
use crate::language::Language;

/// Supported languages and the primary one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Languages {
    supported: Vec<Language>,
    primary: Language,
}

impl Languages {
    /// Create a language set.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidLanguages`] if `supported` is empty, lists
    /// `None` or a duplicate, or does not contain `primary`.
    pub fn new(supported: Vec<Language>, primary: Language) -> Result<Self, SiteError> {
        if supported.is_empty() {
            return Err(SiteError::InvalidLanguages(
                "at least one language must be supported".to_owned(),
            ));
        }
        for (index, language) in supported.iter().enumerate() {
            if language.is_none() {
                return Err(SiteError::InvalidLanguages(
                    "None cannot be a supported language".to_owned(),
                ));
            }
            if supported[..index].contains(language) {
                return Err(SiteError::InvalidLanguages(format!(
                    "{language} is listed more than once"
                )));
            }
        }
        if !supported.contains(&primary) {
            return Err(SiteError::InvalidLanguages(format!(
                "primary language {primary} is not supported"
            )));
        }
        Ok(Self { supported, primary })
    }

    /// Supported languages in fan-out order.
    #[must_use]
    pub fn supported(&self) -> &[Language] {
        &self.supported
    }

    #[must_use]
    pub fn primary(&self) -> Language {
        self.primary
    }

    /// Languages a folder is processed for.
    ///
    /// Multilanguage folders fan out over every supported language; any other
    /// folder is processed once for the inherited language, `None` included.
    #[must_use]
    pub fn fan_out(&self, multilanguage: bool, inherited: Language) -> Vec<Language> {
        if multilanguage {
            self.supported.clone()
        } else {
            vec![inherited]
        }
    }
}

/// Error returned when no code sample directory is registered for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("No code sample directory registered for language {0}")]
pub struct UnregisteredLanguage(pub Language);

/// Code sample directory per language.
///
/// Built once before traversal and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSamples {
    dirs: BTreeMap<Language, PathBuf>,
}

impl CodeSamples {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the sample directory of a language (relative to the source root).
    #[must_use]
    pub fn with_dir(mut self, language: Language, dir: impl Into<PathBuf>) -> Self {
        self.dirs.insert(language, dir.into());
        self
    }

    /// Sample directory for `language`.
    ///
    /// `None` is first resolved from `context` by path suffix, else to
    /// `primary`. The lookup itself is exact.
    ///
    /// # Errors
    ///
    /// Returns [`UnregisteredLanguage`] when no directory is registered for
    /// the resolved language.
    pub fn sample_dir(
        &self,
        language: Language,
        context: &str,
        primary: Language,
    ) -> Result<&Path, UnregisteredLanguage> {
        let resolved = language.resolve(context, primary);
        self.dirs
            .get(&resolved)
            .map(PathBuf::as_path)
            .ok_or(UnregisteredLanguage(resolved))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

/// Built-in "not documented" page.
///
/// Placeholders: `{language}` (label of the requested language) and
/// `{links}` (list of links to the languages that are documented).
pub const DEFAULT_FALLBACK_TEMPLATE: &str = "\
# Not documented

This page is not documented for {language} yet.

{links}
";

/// Default per-folder manifest filename.
pub const DEFAULT_MANIFEST: &str = "toc.yaml";

/// Configuration passed down through both traversal passes.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Supported and primary languages.
    pub languages: Languages,
    /// Code sample directories.
    pub samples: CodeSamples,
    /// Per-folder manifest filename.
    pub manifest: String,
    /// Markdown template of fallback pages.
    pub fallback_template: String,
}

impl Settings {
    /// Settings with default manifest name and fallback template.
    #[must_use]
    pub fn new(languages: Languages) -> Self {
        Self {
            languages,
            samples: CodeSamples::new(),
            manifest: DEFAULT_MANIFEST.to_owned(),
            fallback_template: DEFAULT_FALLBACK_TEMPLATE.to_owned(),
        }
    }

    /// Manifest path of a folder at `dir`.
    #[must_use]
    pub fn manifest_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.manifest)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn languages() -> Languages {
        Languages::new(
            vec![Language::DotNet, Language::Java, Language::Http],
            Language::DotNet,
        )
        .unwrap()
    }

    #[test]
    fn test_languages_fan_out() {
        let languages = languages();
        assert_eq!(
            languages.fan_out(true, Language::None),
            vec![Language::DotNet, Language::Java, Language::Http]
        );
        assert_eq!(languages.fan_out(false, Language::Java), vec![Language::Java]);
        assert_eq!(languages.fan_out(false, Language::None), vec![Language::None]);
    }

    #[test]
    fn test_languages_rejects_invalid() {
        assert!(Languages::new(vec![], Language::Java).is_err());
        assert!(Languages::new(vec![Language::None], Language::None).is_err());
        assert!(Languages::new(vec![Language::Java, Language::Java], Language::Java).is_err());

        let err = Languages::new(vec![Language::Java], Language::Http).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid language configuration: primary language Http is not supported"
        );
    }

    #[test]
    fn test_sample_dir_exact_lookup() {
        let samples = CodeSamples::new()
            .with_dir(Language::Java, "samples/java")
            .with_dir(Language::DotNet, "samples/dotnet");

        assert_eq!(
            samples
                .sample_dir(Language::Java, "guide/DotNet", Language::DotNet)
                .unwrap(),
            Path::new("samples/java")
        );
    }

    #[test]
    fn test_sample_dir_resolves_none() {
        let samples = CodeSamples::new()
            .with_dir(Language::Java, "samples/java")
            .with_dir(Language::DotNet, "samples/dotnet");

        assert_eq!(
            samples
                .sample_dir(Language::None, "guide/Java", Language::DotNet)
                .unwrap(),
            Path::new("samples/java")
        );
        assert_eq!(
            samples
                .sample_dir(Language::None, "guide", Language::DotNet)
                .unwrap(),
            Path::new("samples/dotnet")
        );
    }

    #[test]
    fn test_sample_dir_unregistered_fails() {
        let samples = CodeSamples::new().with_dir(Language::Java, "samples/java");

        let err = samples
            .sample_dir(Language::Http, "guide/Http", Language::Java)
            .unwrap_err();
        assert_eq!(err, UnregisteredLanguage(Language::Http));
        assert_eq!(
            err.to_string(),
            "No code sample directory registered for language Http"
        );
    }

    #[test]
    fn test_manifest_path() {
        let settings = Settings::new(languages());
        assert_eq!(
            settings.manifest_path(Path::new("guide")),
            PathBuf::from("guide/toc.yaml")
        );
    }
}
