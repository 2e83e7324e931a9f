//! Client languages and the language resolution heuristic.

use std::fmt;
use std::str::FromStr;

/// Client language a document is written for.
///
/// `None` means "not yet resolved". It is never the final language of a
/// rendered document; see [`Language::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    /// Language-agnostic or not yet resolved.
    #[default]
    None,
    /// .NET client.
    DotNet,
    /// Java client.
    Java,
    /// Raw HTTP API.
    Http,
    /// Python client.
    Python,
    /// Node.js client.
    NodeJs,
}

/// Error returned when parsing an unknown language name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown language: {0}")]
pub struct UnknownLanguage(pub String);

impl Language {
    /// Every concrete language, in heuristic match order.
    pub const ALL: [Self; 5] = [
        Self::DotNet,
        Self::Java,
        Self::Http,
        Self::Python,
        Self::NodeJs,
    ];

    /// Path segment and file qualifier (`intro.Java.markdown`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::DotNet => "DotNet",
            Self::Java => "Java",
            Self::Http => "Http",
            Self::Python => "Python",
            Self::NodeJs => "NodeJs",
        }
    }

    /// Human-readable label used as link text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "Any language",
            Self::DotNet => ".NET",
            Self::Java => "Java",
            Self::Http => "HTTP",
            Self::Python => "Python",
            Self::NodeJs => "Node.js",
        }
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }

    /// Language whose name the path ends with (case-insensitive).
    ///
    /// Trailing separators are ignored. First match in [`Language::ALL`] wins.
    #[must_use]
    pub fn from_path_suffix(path: &str) -> Option<Self> {
        let path = path.trim_end_matches(['/', '\\']).to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| path.ends_with(&language.name().to_ascii_lowercase()))
    }

    /// Resolve `None` from a contextual path, falling back to `primary`.
    ///
    /// This is a suffix check on the path string and nothing more: `guide/Java`
    /// and `samples/nodejs` resolve, `Java/guide` does not.
    #[must_use]
    pub fn resolve(self, context: &str, primary: Self) -> Self {
        if !self.is_none() {
            return self;
        }
        Self::from_path_suffix(context).unwrap_or(primary)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Parse a concrete language name, case-insensitively.
    ///
    /// `None` is not accepted: it cannot be configured.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|language| language.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLanguage(s.to_owned()))
    }
}
