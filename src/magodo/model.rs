use crate::error::{MagodoError, Result};
use crate::grammar::{self, ParseMode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Parsed `key:value` words, keyed by tag name. The first occurrence of a key wins.
pub type Metadata = BTreeMap<String, String>;

/// A todo's priority: a single letter between `A` (highest) and `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Priority(char);

impl Priority {
    /// The sentinel meaning "no priority was set".
    pub const DEFAULT: Priority = Priority('O');

    pub fn new(letter: char) -> Result<Self> {
        if letter.is_ascii_uppercase() {
            Ok(Self(letter))
        } else {
            Err(MagodoError::InvalidPriority(letter))
        }
    }

    pub fn letter(self) -> char {
        self.0
    }

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<char> for Priority {
    type Error = MagodoError;

    fn try_from(letter: char) -> Result<Self> {
        Self::new(letter)
    }
}

impl From<Priority> for char {
    fn from(priority: Priority) -> char {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single task in a todo list.
///
/// `desc` is the authoritative text: tag words stay embedded in it and are
/// mirrored into `contexts`, `projects`, `epics`, and `metadata`. The leading
/// done marker, priority, and dates are hoisted out of it.
///
/// A `Todo` is never mutated in place. The `with_*` methods each return a new
/// value with one field replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    desc: String,
    priority: Priority,
    create_date: Option<NaiveDate>,
    done_date: Option<NaiveDate>,
    done: bool,
    contexts: BTreeSet<String>,
    projects: BTreeSet<String>,
    epics: BTreeSet<String>,
    metadata: Metadata,
}

impl Todo {
    /// Creates an open todo with the default priority and no tags.
    ///
    /// The description is taken verbatim; use [`Todo::from_line`] to have tag
    /// words extracted.
    pub fn new(desc: impl Into<String>) -> Self {
        Self {
            desc: desc.into(),
            priority: Priority::DEFAULT,
            create_date: None,
            done_date: None,
            done: false,
            contexts: BTreeSet::new(),
            projects: BTreeSet::new(),
            epics: BTreeSet::new(),
            metadata: Metadata::new(),
        }
    }

    /// Parses a todo.txt line. See [`grammar::parse`].
    pub fn from_line(line: &str, mode: ParseMode) -> Result<Self> {
        grammar::parse(line, mode)
    }

    /// Serializes this todo back into a todo.txt line. See [`grammar::serialize`].
    pub fn to_line(&self) -> String {
        grammar::serialize(self)
    }

    /// Serializes this todo into a line that parses back in `mode`.
    pub fn to_line_in(&self, mode: ParseMode) -> String {
        grammar::serialize_with(self, mode)
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn create_date(&self) -> Option<NaiveDate> {
        self.create_date
    }

    pub fn done_date(&self) -> Option<NaiveDate> {
        self.done_date
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn contexts(&self) -> &BTreeSet<String> {
        &self.contexts
    }

    pub fn projects(&self) -> &BTreeSet<String> {
        &self.projects
    }

    pub fn epics(&self) -> &BTreeSet<String> {
        &self.epics
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// True if any context, project, epic, or metadata tag was parsed.
    pub fn has_tags(&self) -> bool {
        !(self.contexts.is_empty()
            && self.projects.is_empty()
            && self.epics.is_empty()
            && self.metadata.is_empty())
    }

    pub fn with_desc(self, desc: impl Into<String>) -> Self {
        Self {
            desc: desc.into(),
            ..self
        }
    }

    pub fn with_priority(self, priority: Priority) -> Self {
        Self { priority, ..self }
    }

    pub fn with_create_date(self, create_date: Option<NaiveDate>) -> Self {
        Self {
            create_date,
            ..self
        }
    }

    pub fn with_done_date(self, done_date: Option<NaiveDate>) -> Self {
        Self { done_date, ..self }
    }

    pub fn with_done(self, done: bool) -> Self {
        Self { done, ..self }
    }

    pub fn with_contexts<I, S>(self, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contexts: contexts.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_projects<I, S>(self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            projects: projects.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_epics<I, S>(self, epics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            epics: epics.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_metadata(self, metadata: Metadata) -> Self {
        Self { metadata, ..self }
    }

    /// Appends a `key:value` word to the description and records it in `metadata`.
    ///
    /// Mirrors parsing: if `key` is already present, the existing value wins.
    pub fn with_metadata_tag(self, key: &str, value: &str) -> Self {
        let mut metadata = self.metadata;
        metadata
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());

        Self {
            desc: format!("{} {}:{}", self.desc, key, value),
            metadata,
            ..self
        }
    }
}

impl fmt::Display for Todo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

impl AsRef<Todo> for Todo {
    fn as_ref(&self) -> &Todo {
        self
    }
}
