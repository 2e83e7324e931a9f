//! "Not documented" pages.
//!
//! When a document has no source for the requested language, the compile pass
//! renders the fallback template instead. The page links to every other
//! supported language that does have a language-qualified source.

use std::fmt::Write;
use std::path::Path;

use polydoc_renderer::{escape_html, join_url};
use polydoc_storage::Storage;

use crate::language::Language;
use crate::settings::Languages;

/// Source file name of `canonical` qualified with `language` (`intro.Java.markdown`).
#[must_use]
pub fn qualified_source(canonical: &str, language: Language, extension: &str) -> String {
    format!("{canonical}.{}.{extension}", language.name())
}

/// Other supported languages with a qualified source in `folder`, in
/// supported-language order.
pub fn documented_languages(
    storage: &dyn Storage,
    languages: &Languages,
    folder: &Path,
    canonical: &str,
    extension: &str,
    current: Language,
) -> Vec<Language> {
    languages
        .supported()
        .iter()
        .copied()
        .filter(|&language| language != current)
        .filter(|&language| {
            storage.is_file(&folder.join(qualified_source(canonical, language, extension)))
        })
        .collect()
}

/// URL of the `target` language variant of a page.
///
/// Path segments of `virtual_trail` equal to the `current` language name are
/// replaced with the `target` name. The result is resolved against `root_url`.
///
/// A trail without a `current` segment (a document whose language was
/// resolved from [`Language::None`]) is left as is, so the result is the
/// page's own URL. Callers drop such links.
#[must_use]
pub fn cross_link_url(
    virtual_trail: &str,
    current: Language,
    target: Language,
    canonical: &str,
    root_url: &str,
) -> String {
    let trail = virtual_trail
        .split(['/', '\\'])
        .map(|segment| {
            if segment == current.name() {
                target.name()
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/");
    join_url(root_url, &format!("{trail}/{canonical}.html"))
}

/// HTML list of links to the documented variants, empty when there are none.
#[must_use]
pub fn link_list(links: &[(Language, String)]) -> String {
    if links.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"languages\">\n");
    for (language, url) in links {
        // Writing to a String cannot fail.
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(url),
            escape_html(language.label())
        );
    }
    html.push_str("</ul>");
    html
}

#[cfg(test)]
mod tests {
    use polydoc_storage::MockStorage;
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
    fn test_qualified_source() {
        assert_eq!(
            qualified_source("intro", Language::Java, "markdown"),
            "intro.Java.markdown"
        );
    }

    #[test]
    fn test_documented_languages_excludes_current_and_missing() {
        let storage = MockStorage::new()
            .with_file("guide/intro.Java.markdown", "")
            .with_file("guide/intro.Http.markdown", "");

        let found = documented_languages(
            &storage,
            &languages(),
            Path::new("guide"),
            "intro",
            "markdown",
            Language::Http,
        );

        assert_eq!(found, vec![Language::Java]);
    }

    #[test]
    fn test_cross_link_url() {
        assert_eq!(
            cross_link_url("guide/Http", Language::Http, Language::Java, "intro", "/"),
            "/guide/Java/intro.html"
        );
    }

    #[test]
    fn test_cross_link_url_normalizes_separators_and_root() {
        assert_eq!(
            cross_link_url(
                "guide\\Http\\api",
                Language::Http,
                Language::DotNet,
                "auth",
                "https://docs.example.com/sdk/"
            ),
            "https://docs.example.com/sdk/guide/DotNet/api/auth.html"
        );
    }

    #[test]
    fn test_cross_link_url_only_replaces_whole_segments() {
        assert_eq!(
            cross_link_url("Httpd/Http", Language::Http, Language::Java, "setup", "/"),
            "/Httpd/Java/setup.html"
        );
    }

    #[test]
    fn test_link_list() {
        let html = link_list(&[
            (Language::Java, "/guide/Java/intro.html".to_owned()),
            (Language::DotNet, "/guide/DotNet/intro.html".to_owned()),
        ]);
        assert_eq!(
            html,
            "<ul class=\"languages\">\n\
             <li><a href=\"/guide/Java/intro.html\">Java</a></li>\n\
             <li><a href=\"/guide/DotNet/intro.html\">.NET</a></li>\n\
             </ul>"
        );
    }

    #[test]
    fn test_link_list_empty() {
        assert_eq!(link_list(&[]), "");
    }
}
