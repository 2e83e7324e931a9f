//! Configuration management for polydoc.
//!
//! Parses `polydoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.root_url`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override root URL used for absolute links.
    pub root_url: Option<String>,
    /// Override compilation mode.
    pub mode: Option<CompilationMode>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "polydoc.toml";

/// Default per-folder manifest filename.
const DEFAULT_MANIFEST: &str = "toc.yaml";

/// Languages enabled when the config does not list any.
const DEFAULT_LANGUAGES: [&str; 3] = ["DotNet", "Java", "Http"];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation paths (relative strings from TOML).
    docs: DocsConfigRaw,
    /// Site output settings.
    site: SiteConfigRaw,
    /// Language settings.
    languages: LanguagesConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Resolved language configuration (set after loading).
    #[serde(skip)]
    pub languages_resolved: LanguagesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    manifest: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory holding manifests and documents.
    pub source_dir: PathBuf,
    /// Directory the compiled site is written to.
    pub output_dir: PathBuf,
    /// Per-folder manifest filename.
    pub manifest: String,
}

/// Output content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// HTML pages.
    #[default]
    Html,
    /// Markdown passthrough.
    Markdown,
}

/// Compilation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilationMode {
    /// Only documents listed in manifests are compiled.
    #[default]
    Normal,
    /// Every folder additionally gets a generated `index` page.
    Legacy,
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    root_url: Option<String>,
    content_type: Option<ContentType>,
    mode: Option<CompilationMode>,
    fallback_template: Option<String>,
}

/// Resolved site configuration.
#[derive(Debug)]
pub struct SiteConfig {
    /// Root URL that absolute links are resolved against.
    pub root_url: String,
    /// Output content type.
    pub content_type: ContentType,
    /// Compilation mode.
    pub mode: CompilationMode,
    /// Custom "not documented" template, if configured.
    pub fallback_template: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: "/".to_owned(),
            content_type: ContentType::Html,
            mode: CompilationMode::Normal,
            fallback_template: None,
        }
    }
}

/// Raw language configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LanguagesConfigRaw {
    supported: Option<Vec<String>>,
    primary: Option<String>,
    samples: BTreeMap<String, String>,
}

/// Resolved language configuration.
///
/// Language names are kept as strings; the site crate parses them.
#[derive(Debug, Default)]
pub struct LanguagesConfig {
    /// Supported languages in fan-out order.
    pub supported: Vec<String>,
    /// Primary language, used when a language cannot be inferred.
    pub primary: String,
    /// Code sample directories keyed by language, relative to `source_dir`.
    pub samples: BTreeMap<String, PathBuf>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    /// IO error reading config file.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.root_url`").
        field: String,
        /// Error message (e.g., "${`DOCS_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `polydoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(root_url) = &settings.root_url {
            self.site_resolved.root_url.clone_from(root_url);
        }
        if let Some(mode) = settings.mode {
            self.site_resolved.mode = mode;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            site: SiteConfigRaw::default(),
            languages: LanguagesConfigRaw::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("site"),
                manifest: DEFAULT_MANIFEST.to_owned(),
            },
            site_resolved: SiteConfig::default(),
            languages_resolved: LanguagesConfig {
                supported: DEFAULT_LANGUAGES.iter().map(|&l| l.to_owned()).collect(),
                primary: DEFAULT_LANGUAGES[0].to_owned(),
                samples: BTreeMap::new(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.docs_resolved.manifest, "docs.manifest")?;
        require_non_empty(&self.site_resolved.root_url, "site.root_url")?;
        self.validate_languages()
    }

    /// Validate language configuration.
    fn validate_languages(&self) -> Result<(), ConfigError> {
        let languages = &self.languages_resolved;
        if languages.supported.is_empty() {
            return Err(ConfigError::Validation(
                "languages.supported cannot be empty".to_owned(),
            ));
        }
        for (index, name) in languages.supported.iter().enumerate() {
            require_non_empty(name, "languages.supported")?;
            if languages.supported[..index].contains(name) {
                return Err(ConfigError::Validation(format!(
                    "languages.supported lists {name} more than once"
                )));
            }
        }
        if !languages.supported.contains(&languages.primary) {
            return Err(ConfigError::Validation(format!(
                "languages.primary ({}) must be listed in languages.supported",
                languages.primary
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.site.root_url {
            self.site.root_url = Some(expand::expand_env(url, "site.root_url")?);
        }
        Ok(())
    }

    /// Resolve raw sections relative to the config directory.
    fn resolve(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "site"),
            manifest: self
                .docs
                .manifest
                .clone()
                .unwrap_or_else(|| DEFAULT_MANIFEST.to_owned()),
        };

        self.site_resolved = SiteConfig {
            root_url: self.site.root_url.clone().unwrap_or_else(|| "/".to_owned()),
            content_type: self.site.content_type.unwrap_or_default(),
            mode: self.site.mode.unwrap_or_default(),
            fallback_template: self
                .site
                .fallback_template
                .as_deref()
                .map(|p| config_dir.join(p)),
        };

        let supported = self.languages.supported.clone().unwrap_or_else(|| {
            DEFAULT_LANGUAGES.iter().map(|&l| l.to_owned()).collect()
        });
        let primary = self
            .languages
            .primary
            .clone()
            .or_else(|| supported.first().cloned())
            .unwrap_or_default();
        self.languages_resolved = LanguagesConfig {
            supported,
            primary,
            samples: self
                .languages
                .samples
                .iter()
                .map(|(lang, dir)| (lang.clone(), PathBuf::from(dir)))
                .collect(),
        };
    }
}
