//! URL composition helpers.

/// Collapse runs of `/` into a single separator.
///
/// The `//` following a URL scheme (`https://`) is preserved.
///
/// # Examples
///
/// ```
/// use polydoc_renderer::collapse_slashes;
///
/// assert_eq!(collapse_slashes("//guide//Java/intro.html"), "/guide/Java/intro.html");
/// assert_eq!(collapse_slashes("https://example.com//docs"), "https://example.com/docs");
/// ```
#[must_use]
pub fn collapse_slashes(url: &str) -> String {
    let (scheme, rest) = match url.find("://") {
        Some(pos) if url[..pos].chars().all(|c| c.is_ascii_alphanumeric() || c == '+') => {
            url.split_at(pos + 3)
        }
        _ => ("", url),
    };

    let mut result = String::with_capacity(url.len());
    result.push_str(scheme);
    let mut previous_slash = false;
    for c in rest.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        result.push(c);
    }
    result
}

/// Join a path onto a root URL, collapsing doubled separators.
///
/// # Examples
///
/// ```
/// use polydoc_renderer::join_url;
///
/// assert_eq!(join_url("/", "guide/Java/intro.html"), "/guide/Java/intro.html");
/// assert_eq!(join_url("https://example.com/sdk/", "/intro.html"), "https://example.com/sdk/intro.html");
/// ```
#[must_use]
pub fn join_url(root: &str, path: &str) -> String {
    collapse_slashes(&format!("{root}/{path}"))
}
