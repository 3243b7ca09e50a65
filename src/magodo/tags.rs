//! Tag word classification.
//!
//! A description is split into words on single spaces. Each word is either
//! plain text or one of four kinds of tag:
//! - Context: `@home`
//! - Project: `+garden`
//! - Epic: `#spring`
//! - Metadata: `due:2022-12-31`
//!
//! A doubled prefix (`@@home`) escapes the tag and is kept as plain text.
//!
//! Metadata keys are restricted to ASCII alphanumerics, underscores, and
//! hyphens, so quoted or prefixed words (`'key:value'`, `@foo:bar`) are never
//! metadata.

pub const CONTEXT_PREFIX: char = '@';
pub const PROJECT_PREFIX: char = '+';
pub const EPIC_PREFIX: char = '#';

/// Characters stripped from the right side of a tag value.
pub const PUNCTUATION: &str = ",.?!;";

/// Returns true if `word` has the shape `key:value`.
///
/// # Examples
/// ```
/// use magodo::tags::is_metadata_tag;
///
/// assert!(is_metadata_tag("key:value"));
/// assert!(is_metadata_tag("due:2022-12-31"));
///
/// assert!(!is_metadata_tag("key::value"));
/// assert!(!is_metadata_tag("'key:value'"));
/// assert!(!is_metadata_tag("key:"));
/// assert!(!is_metadata_tag(":value"));
/// ```
pub fn is_metadata_tag(word: &str) -> bool {
    let Some((key, value)) = word.split_once(':') else {
        return false;
    };

    !key.is_empty()
        && !value.is_empty()
        && !value.starts_with(':')
        && key.chars().all(is_valid_key_char)
}

fn is_valid_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Returns true if `word` is prefixed by `prefix` (but not by a doubled `prefix`).
pub fn is_prefix_tag(prefix: char, word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) => first == prefix && second != prefix,
        _ => false,
    }
}

pub fn is_context_tag(word: &str) -> bool {
    is_prefix_tag(CONTEXT_PREFIX, word)
}

pub fn is_project_tag(word: &str) -> bool {
    is_prefix_tag(PROJECT_PREFIX, word)
}

pub fn is_epic_tag(word: &str) -> bool {
    is_prefix_tag(EPIC_PREFIX, word)
}

/// Returns true if `word` is an epic, context, or project tag.
pub fn is_any_prefix_tag(word: &str) -> bool {
    is_epic_tag(word) || is_context_tag(word) || is_project_tag(word)
}

/// Returns true if `word` is any kind of tag, metadata included.
pub fn is_any_tag(word: &str) -> bool {
    is_any_prefix_tag(word) || is_metadata_tag(word)
}

/// Returns true if the last character of `word` is in [`PUNCTUATION`].
pub fn ends_with_punctuation(word: &str) -> bool {
    word.chars().last().is_some_and(|ch| PUNCTUATION.contains(ch))
}

/// Cleans up a context, project, epic, or metadata value.
///
/// Strips trailing [`PUNCTUATION`] (unless the value is nothing but
/// punctuation), then cuts the value at the first apostrophe so possessives
/// like `@bob's` yield `bob`.
pub fn clean_value(value: &str) -> &str {
    let stripped = value.trim_end_matches(|ch| PUNCTUATION.contains(ch));
    let stripped = if stripped.is_empty() { value } else { stripped };

    match stripped.split_once('\'') {
        Some((head, _)) => head,
        None => stripped,
    }
}
