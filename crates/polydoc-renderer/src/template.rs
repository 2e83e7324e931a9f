//! Named placeholder substitution.

/// Substitute `{name}` placeholders in a template.
///
/// Placeholders whose name is not in `vars` are kept verbatim. `{{` and `}}`
/// produce literal braces. Substituted values are not scanned again.
///
/// # Examples
///
/// ```
/// use polydoc_renderer::fill_template;
///
/// let text = fill_template("Not documented for {language}.", &[("language", "Java")]);
/// assert_eq!(text, "Not documented for Java.");
/// ```
#[must_use]
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        result.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            result.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('{')
            && let Some(end) = tail.find('}')
            && let Some((_, value)) = vars.iter().find(|(name, _)| *name == &tail[1..end])
        {
            result.push_str(value);
            rest = &tail[end + 1..];
            continue;
        }

        result.push_str(&tail[..1]);
        rest = &tail[1..];
    }

    result.push_str(rest);
    result
}
