//! Shared utilities for cleaning raw link targets.
//!
//! Used by the engine when it extracts wikilinks and embeds, and by the
//! resolver when it turns a raw target into an identity key.

/// Split `[[target|alias]]` content into its target part.
///
/// A backslash right before the pipe (the escaped form used inside
/// tables, `[[Note\|alias]]`) is dropped as well.
///
/// ```
/// use linkvault_parser::link_utils::strip_alias;
///
/// assert_eq!(strip_alias("Note|Shown text"), "Note");
/// assert_eq!(strip_alias("Note\\|Shown text"), "Note");
/// assert_eq!(strip_alias("Note"), "Note");
/// ```
pub fn strip_alias(raw: &str) -> &str {
    match raw.find('|') {
        Some(idx) => raw[..idx].trim_end_matches('\\'),
        None => raw,
    }
}

/// Remove a heading or block suffix: `Note#Heading`, `Note#^block`.
///
/// ```
/// use linkvault_parser::link_utils::strip_section;
///
/// assert_eq!(strip_section("Note#Heading"), "Note");
/// assert_eq!(strip_section("Note#^abc123"), "Note");
/// assert_eq!(strip_section("#Heading"), "");
/// ```
pub fn strip_section(target: &str) -> &str {
    match target.find('#') {
        Some(idx) => target[..idx].trim_end(),
        None => target,
    }
}

/// Is this markdown link destination outside the vault?
///
/// ```
/// use linkvault_parser::link_utils::is_external_url;
///
/// assert!(is_external_url("https://example.com"));
/// assert!(is_external_url("mailto:someone@example.com"));
/// assert!(is_external_url("obsidian://open?vault=x"));
/// assert!(!is_external_url("notes/Other.md"));
/// ```
pub fn is_external_url(url: &str) -> bool {
    url.starts_with("mailto:") || url.contains("://")
}

/// Clean a wikilink/embed body into a raw target, or `None` if nothing
/// file-like is referenced (empty body, same-document anchor).
pub(crate) fn clean_link_body(raw: &str) -> Option<String> {
    let target = strip_alias(raw).trim();
    if strip_section(target).is_empty() {
        return None;
    }
    Some(target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_link_body() {
        assert_eq!(clean_link_body("Note"), Some("Note".to_string()));
        assert_eq!(clean_link_body(" Note#Heading |alias"), Some("Note#Heading".to_string()));
        assert_eq!(clean_link_body("#Heading"), None);
        assert_eq!(clean_link_body("#^block"), None);
        assert_eq!(clean_link_body("   "), None);
        assert_eq!(clean_link_body("|alias only"), None);
    }

    #[test]
    fn test_strip_section_keeps_folder() {
        assert_eq!(strip_section("lipsum/Ne fuit#Part 2"), "lipsum/Ne fuit");
        assert_eq!(strip_section("Note #Heading"), "Note");
    }
}
