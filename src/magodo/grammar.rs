//! # The todo.txt line grammar
//!
//! A line (after trimming) is made of these fields, in order:
//!
//! ```text
//! [x ]  [(P) ]  [DONE_DATE ]  [CREATE_DATE ]  DESCRIPTION
//! ```
//!
//! - `x ` marks the todo done.
//! - `(P)` is a single upper-case letter. When absent, [`Priority::DEFAULT`]
//!   is assigned.
//! - One date token is the creation date. Two date tokens are the completion
//!   date followed by the creation date.
//! - The description must start with a letter, a digit, `+`, or `@`.
//!
//! Tag words are extracted from the description into the todo's structured
//! fields but are left in the description itself. Serialization writes the
//! hoisted fields back in front of the untouched description.
//!
//! ## Modes
//!
//! [`ParseMode::Strict`] requires every line to state its status: an explicit
//! priority, an `x ` done marker, or an `o ` open marker. It also accepts two
//! shorthands, rewritten before matching:
//!
//! - `o rest` becomes `(O) rest` (open, default priority).
//! - `x:HHMM rest` becomes `x rest dtime:HHMM` (done at `HHMM`).
//!
//! [`ParseMode::Permissive`] accepts any grammar-valid line and applies no
//! rewrites.

use crate::dates::{from_date, to_date, RE_DATE};
use crate::error::{MagodoError, Result};
use crate::model::{Metadata, Priority, Todo};
use crate::tags::{self, clean_value};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const DONE_PREFIX: &str = "x ";
pub const OPEN_PREFIX: &str = "o ";

/// Metadata key recording the completion time (`HHMM`).
pub const DTIME_KEY: &str = "dtime";
/// Metadata key recording the creation time (`HHMM`).
pub const CTIME_KEY: &str = "ctime";

const RE_PRIORITY: &str = r"\((?P<priority>[A-Z])\)[ ]+";

static STRICT_TODO_REGEX: Lazy<Regex> = Lazy::new(|| todo_regex(RE_PRIORITY));

static PERMISSIVE_TODO_REGEX: Lazy<Regex> =
    Lazy::new(|| todo_regex(&format!("(?:{RE_PRIORITY})?")));

static LEADING_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{RE_DATE}[ ]")).expect("leading date pattern must compile")
});

fn todo_regex(priority: &str) -> Regex {
    let pattern = format!(
        r"^(?P<x>x[ ]+)?{priority}(?:(?:(?P<done_date>{date})[ ]+)?(?P<create_date>{date})[ ]+)?(?P<desc>[A-Za-z0-9+@].*)",
        date = RE_DATE,
    );
    Regex::new(&pattern).expect("todo grammar pattern must compile")
}

/// How much a line must say about itself to be accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    #[default]
    Permissive,
    Strict,
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMode::Permissive => write!(f, "permissive"),
            ParseMode::Strict => write!(f, "strict"),
        }
    }
}

/// Parses one todo.txt line into a [`Todo`].
pub fn parse(line: &str, mode: ParseMode) -> Result<Todo> {
    let original = line.trim();
    let mut line = original.to_string();

    if mode == ParseMode::Strict {
        if let Some(expanded) = expand_completion_shorthand(&line) {
            line = expanded;
        }
        if let Some(rest) = line.strip_prefix(OPEN_PREFIX) {
            line = format!("({}) {}", Priority::DEFAULT, rest);
        }
    }

    let regex = if mode == ParseMode::Strict && !line.starts_with(DONE_PREFIX) {
        &STRICT_TODO_REGEX
    } else {
        &PERMISSIVE_TODO_REGEX
    };

    let caps = regex
        .captures(&line)
        .ok_or_else(|| MagodoError::GrammarMismatch {
            line: original.to_string(),
            mode,
        })?;

    let priority = match caps.name("priority").and_then(|m| m.as_str().chars().next()) {
        Some(letter) => Priority::new(letter)?,
        None => Priority::DEFAULT,
    };
    let create_date = caps
        .name("create_date")
        .map(|m| to_date(m.as_str()))
        .transpose()?;
    let done_date = caps
        .name("done_date")
        .map(|m| to_date(m.as_str()))
        .transpose()?;
    let desc = caps.name("desc").map_or("", |m| m.as_str());

    let found = extract_tags(desc);

    Ok(Todo::new(desc)
        .with_done(caps.name("x").is_some())
        .with_priority(priority)
        .with_create_date(create_date)
        .with_done_date(done_date)
        .with_contexts(found.contexts)
        .with_projects(found.projects)
        .with_epics(found.epics)
        .with_metadata(found.metadata))
}

/// Serializes a [`Todo`] back into a line that [`parse`] accepts in
/// permissive mode. Same as [`serialize_with`] with [`ParseMode::Permissive`].
pub fn serialize(todo: &Todo) -> String {
    serialize_with(todo, ParseMode::Permissive)
}

/// Serializes a [`Todo`] back into a line that [`parse`] accepts in `mode`.
///
/// The default priority is omitted for permissive output unless the
/// description starts with something that reads as a status marker (`x `,
/// `o `, `x:HHMM `). Strict output always states the status of an open todo,
/// so `(O)` is written whenever the todo is not done.
///
/// The completion date is only written when a creation date is also present,
/// since a single date token always reads back as the creation date.
pub fn serialize_with(todo: &Todo, mode: ParseMode) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(5);

    if todo.done() {
        parts.push("x".to_string());
    }

    let needs_priority = match mode {
        ParseMode::Permissive => reads_as_marker(todo),
        ParseMode::Strict => !todo.done(),
    };
    if !todo.priority().is_default() || needs_priority {
        parts.push(format!("({})", todo.priority()));
    }

    if let Some(create_date) = todo.create_date() {
        if let Some(done_date) = todo.done_date() {
            parts.push(from_date(done_date));
        }
        parts.push(from_date(create_date));
    }

    parts.push(todo.desc().to_string());
    parts.join(" ")
}

/// True if an open, undated todo's text would be taken for a status marker
/// when written without a priority.
fn reads_as_marker(todo: &Todo) -> bool {
    let desc = todo.desc();
    !todo.done()
        && todo.create_date().is_none()
        && (desc.starts_with(DONE_PREFIX)
            || desc.starts_with(OPEN_PREFIX)
            || expand_completion_shorthand(desc).is_some())
}

/// Rewrites `x:HHMM rest` into `x rest dtime:HHMM`.
///
/// Returns `None` unless the first word is exactly `x:` followed by four
/// digits and more text follows it after whitespace.
pub fn expand_completion_shorthand(line: &str) -> Option<String> {
    let (hhmm, rest) = split_completion_word(line)?;

    Some(format!("x {} {}:{}", rest, DTIME_KEY, hhmm))
}

/// Splits `x:HHMM rest` into `HHMM` and `rest`.
pub fn split_completion_word(text: &str) -> Option<(&str, &str)> {
    let (head, rest) = text.split_once(char::is_whitespace)?;
    let hhmm = head.strip_prefix("x:").filter(|hhmm| is_hhmm(hhmm))?;
    let rest = rest.trim_start();

    (!rest.is_empty()).then_some((hhmm, rest))
}

/// True for exactly four ASCII digits.
pub fn is_hhmm(text: &str) -> bool {
    text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit())
}

/// True if `desc` starts with a character the grammar accepts for a description.
pub fn is_valid_desc_start(desc: &str) -> bool {
    desc.chars()
        .next()
        .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '+' || ch == '@')
}

/// True if `desc` opens with a date-shaped word, which the grammar would
/// take for a leading date field once written after the priority.
pub fn starts_with_date(desc: &str) -> bool {
    LEADING_DATE_REGEX.is_match(desc)
}

/// Tag values found in a description.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tags {
    pub contexts: BTreeSet<String>,
    pub projects: BTreeSet<String>,
    pub epics: BTreeSet<String>,
    pub metadata: Metadata,
}

/// Collects the tag words of `desc`. Empty values (after cleanup) are dropped.
pub fn extract_tags(desc: &str) -> Tags {
    let mut found = Tags::default();

    for word in desc.split(' ') {
        let bucket = if tags::is_context_tag(word) {
            Some(&mut found.contexts)
        } else if tags::is_project_tag(word) {
            Some(&mut found.projects)
        } else if tags::is_epic_tag(word) {
            Some(&mut found.epics)
        } else {
            None
        };

        if let Some(bucket) = bucket {
            // Every prefix is a single ASCII character.
            let value = clean_value(&word[1..]);
            if !value.is_empty() {
                bucket.insert(value.to_string());
            }
        }

        if tags::is_metadata_tag(word) {
            if let Some((key, value)) = word.split_once(':') {
                let value = clean_value(value);
                if !value.is_empty() {
                    found
                        .metadata
                        .entry(key.to_string())
                        .or_insert_with(|| value.to_string());
                }
            }
        }
    }

    found
}
