//! Tail-grouping: move edge tag words into a canonical tail.
//!
//! ```text
//! @home buy milk due:2022-01-01 +groceries
//! buy milk | @home +groceries due:2022-01-01
//! ```
//!
//! Tag words may lead or trail the description. After grouping they follow a
//! `|` separator, contexts first, then projects, then epics (each sorted and
//! deduplicated), then metadata words sorted by key. Metadata words sharing a
//! key keep their relative order, so the first one still wins on re-parse.
//!
//! The description is left alone when any of these hold:
//!
//! - it has no tag words, or no plain words;
//! - a tag word sits between two plain words;
//! - a tag word ends in punctuation (it is prose, e.g. `a @context.`);
//! - the regrouped text would not start with a character the grammar accepts,
//!   or would start with a date-shaped word.
//!
//! Re-grouping an already grouped description yields the same description.

use super::SpellContext;
use crate::error::Result;
use crate::grammar::{is_valid_desc_start, starts_with_date};
use crate::model::Todo;
use crate::tags::{self, ends_with_punctuation};
use std::collections::BTreeSet;

const SEPARATOR: &str = "|";

pub fn group_tags(todo: Todo, _ctx: &SpellContext<'_>) -> Result<Todo> {
    match regroup(todo.desc()) {
        Some(desc) if desc != todo.desc() => Ok(todo.with_desc(desc)),
        _ => Ok(todo),
    }
}

/// Returns the grouped form of `desc`, or `None` if it must be left alone.
pub fn regroup(desc: &str) -> Option<String> {
    let words: Vec<&str> = desc
        .split(' ')
        .filter(|word| !word.is_empty() && *word != SEPARATOR)
        .collect();

    let is_tag: Vec<bool> = words.iter().map(|word| tags::is_any_tag(word)).collect();
    let first_text = is_tag.iter().position(|tag| !tag)?;
    let last_text = is_tag.iter().rposition(|tag| !tag)?;

    if is_tag[first_text..=last_text].iter().any(|tag| *tag) {
        return None;
    }

    let tag_words: Vec<&str> = words
        .iter()
        .zip(&is_tag)
        .filter(|(_, tag)| **tag)
        .map(|(word, _)| *word)
        .collect();

    if tag_words.is_empty() || tag_words.iter().any(|word| ends_with_punctuation(word)) {
        return None;
    }

    let text = words[first_text..=last_text].join(" ");
    let grouped = format!("{} {} {}", text, SEPARATOR, tail(&tag_words).join(" "));

    (is_valid_desc_start(&grouped) && !starts_with_date(&grouped)).then_some(grouped)
}

fn tail<'a>(tag_words: &[&'a str]) -> Vec<&'a str> {
    let sorted_prefix_tags = |matches: fn(&str) -> bool| {
        tag_words
            .iter()
            .copied()
            .filter(|word| matches(word))
            .collect::<BTreeSet<&str>>()
    };

    let mut out: Vec<&str> = Vec::with_capacity(tag_words.len());
    out.extend(sorted_prefix_tags(tags::is_context_tag));
    out.extend(sorted_prefix_tags(tags::is_project_tag));
    out.extend(sorted_prefix_tags(tags::is_epic_tag));

    let mut metadata: Vec<&str> = tag_words
        .iter()
        .copied()
        .filter(|word| !tags::is_any_prefix_tag(word))
        .collect();
    metadata.sort_by(|a, b| metadata_key(a).cmp(metadata_key(b)));

    let mut seen = BTreeSet::new();
    out.extend(metadata.into_iter().filter(|word| seen.insert(*word)));
    out
}

fn metadata_key(word: &str) -> &str {
    word.split_once(':').map_or(word, |(key, _)| key)
}
