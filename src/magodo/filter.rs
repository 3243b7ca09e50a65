//! Todo filtering.
//!
//! A [`TodoFilter`] is a conjunction of conditions: a todo passes only if it
//! satisfies every condition that was set. Empty condition lists are ignored.
//!
//! Tag conditions (contexts, projects, epics) accept two extra forms:
//! - `-name` requires the tag to be absent.
//! - `name.*` matches `name` itself and any dotted child such as `name.sub`.

use crate::dates::DateRange;
use crate::model::{Priority, Todo};
use std::collections::BTreeSet;

/// How a [`MetadataFilter`] compares the metadata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataOp {
    /// The key is present, with any value.
    Exists,
    Eq(String),
    Ne(String),
    /// The value contains the given text.
    Contains(String),
}

/// A condition on one metadata key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFilter {
    pub key: String,
    pub op: MetadataOp,
    /// When false, a todo without the key passes.
    pub required: bool,
}

impl MetadataFilter {
    pub fn new(key: impl Into<String>, op: MetadataOp) -> Self {
        Self {
            key: key.into(),
            op,
            required: true,
        }
    }

    pub fn exists(key: impl Into<String>) -> Self {
        Self::new(key, MetadataOp::Exists)
    }

    pub fn eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, MetadataOp::Eq(value.into()))
    }

    pub fn ne(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, MetadataOp::Ne(value.into()))
    }

    pub fn contains(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, MetadataOp::Contains(value.into()))
    }

    pub fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    /// Parses the command line form: `key`, `key=value`, `key!=value`, or `key~value`.
    pub fn parse(text: &str) -> Self {
        if let Some((key, value)) = text.split_once("!=") {
            Self::ne(key, value)
        } else if let Some((key, value)) = text.split_once('=') {
            Self::eq(key, value)
        } else if let Some((key, value)) = text.split_once('~') {
            Self::contains(key, value)
        } else {
            Self::exists(text)
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        let Some(value) = todo.metadata_value(&self.key) else {
            return !self.required;
        };

        match &self.op {
            MetadataOp::Exists => true,
            MetadataOp::Eq(expected) => value == expected,
            MetadataOp::Ne(expected) => value != expected,
            MetadataOp::Contains(needle) => value.contains(needle.as_str()),
        }
    }
}

/// A substring condition on the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescFilter {
    pub value: String,
    /// `None` means case-insensitive exactly when `value` is all lower-case.
    pub case_sensitive: Option<bool>,
}

impl DescFilter {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            case_sensitive: None,
        }
    }

    pub fn case_sensitive(self, case_sensitive: bool) -> Self {
        Self {
            case_sensitive: Some(case_sensitive),
            ..self
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        let case_sensitive = self
            .case_sensitive
            .unwrap_or_else(|| !is_lowercase(&self.value));

        if case_sensitive {
            todo.desc().contains(self.value.as_str())
        } else {
            todo.desc()
                .to_lowercase()
                .contains(&self.value.to_lowercase())
        }
    }
}

/// Has at least one cased character and no upper-case ones.
fn is_lowercase(text: &str) -> bool {
    text.chars().any(char::is_lowercase) && !text.chars().any(char::is_uppercase)
}

#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    pub contexts: Vec<String>,
    pub projects: Vec<String>,
    pub epics: Vec<String>,
    pub priorities: Vec<Priority>,
    pub create_date_ranges: Vec<DateRange>,
    pub done_date_ranges: Vec<DateRange>,
    pub desc_filters: Vec<DescFilter>,
    pub done: Option<bool>,
    pub metadata_filters: Vec<MetadataFilter>,
}

impl TodoFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
            && self.projects.is_empty()
            && self.epics.is_empty()
            && self.priorities.is_empty()
            && self.create_date_ranges.is_empty()
            && self.done_date_ranges.is_empty()
            && self.desc_filters.is_empty()
            && self.done.is_none()
            && self.metadata_filters.is_empty()
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        tags_match(&self.contexts, todo.contexts())
            && tags_match(&self.projects, todo.projects())
            && tags_match(&self.epics, todo.epics())
            && (self.priorities.is_empty() || self.priorities.contains(&todo.priority()))
            && dates_match(&self.create_date_ranges, todo.create_date())
            && dates_match(&self.done_date_ranges, todo.done_date())
            && self.desc_filters.iter().all(|filter| filter.matches(todo))
            && self.done.map_or(true, |done| todo.done() == done)
            && self.metadata_filters.iter().all(|filter| filter.matches(todo))
    }
}

fn tags_match(wanted: &[String], present: &BTreeSet<String>) -> bool {
    wanted.iter().all(|tag| match tag.strip_prefix('-') {
        Some(excluded) => !has_tag(present, excluded),
        None => has_tag(present, tag),
    })
}

fn has_tag(present: &BTreeSet<String>, tag: &str) -> bool {
    match tag.strip_suffix(".*") {
        Some(parent) => present.iter().any(|name| {
            name == parent
                || name
                    .strip_prefix(parent)
                    .is_some_and(|rest| rest.starts_with('.'))
        }),
        None => present.contains(tag),
    }
}

fn dates_match(ranges: &[DateRange], date: Option<chrono::NaiveDate>) -> bool {
    if ranges.is_empty() {
        return true;
    }

    date.is_some_and(|date| ranges.iter().any(|range| range.contains(date)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::to_date;
    use crate::grammar::ParseMode;
    use rstest::rstest;

    fn todo(line: &str) -> Todo {
        Todo::from_line(line, ParseMode::Permissive).unwrap()
    }

    #[rstest]
    #[case(&["home"], true)]
    #[case(&["-home"], false)]
    #[case(&["work"], false)]
    #[case(&["-work"], true)]
    #[case(&["home", "-work"], true)]
    fn test_context_filter(#[case] wanted: &[&str], #[case] expected: bool) {
        let filter = TodoFilter {
            contexts: wanted.iter().map(|s| s.to_string()).collect(),
            ..TodoFilter::default()
        };
        assert_eq!(filter.matches(&todo("call mom @home")), expected);
    }

    #[test]
    fn test_hierarchical_wildcard() {
        let filter = TodoFilter {
            projects: vec!["garden.*".into()],
            ..TodoFilter::default()
        };
        assert!(filter.matches(&todo("dig +garden.beds")));
        assert!(filter.matches(&todo("plan +garden")));
        assert!(!filter.matches(&todo("water +gardening")));
    }

    #[test]
    fn test_priority_filter() {
        let filter = TodoFilter {
            priorities: vec![Priority::new('A').unwrap(), Priority::new('B').unwrap()],
            ..TodoFilter::default()
        };
        assert!(filter.matches(&todo("(B) second")));
        assert!(!filter.matches(&todo("(C) third")));
        assert!(!filter.matches(&todo("unprioritized")));
    }

    #[test]
    fn test_date_ranges() {
        let filter = TodoFilter {
            create_date_ranges: vec![DateRange::from_strings("2022-01-01", Some("2022-01-31")).unwrap()],
            ..TodoFilter::default()
        };
        assert!(filter.matches(&todo("2022-01-31 last day")));
        assert!(!filter.matches(&todo("2022-02-01 too late")));
        assert!(!filter.matches(&todo("no date")));

        let filter = TodoFilter {
            done_date_ranges: vec![DateRange::day(to_date("2022-03-04").unwrap())],
            ..TodoFilter::default()
        };
        assert!(filter.matches(&todo("x 2022-03-04 2022-03-01 task")));
        assert!(!filter.matches(&todo("x 2022-03-05 2022-03-01 task")));
    }

    #[test]
    fn test_desc_filter_case_heuristic() {
        let t = todo("Call Mom about dinner");
        assert!(DescFilter::new("mom").matches(&t));
        assert!(DescFilter::new("Mom").matches(&t));
        assert!(!DescFilter::new("MOM").matches(&t));
        assert!(!DescFilter::new("mom").case_sensitive(true).matches(&t));
    }

    #[test]
    fn test_done_filter() {
        let filter = TodoFilter {
            done: Some(false),
            ..TodoFilter::default()
        };
        assert!(filter.matches(&todo("open")));
        assert!(!filter.matches(&todo("x closed")));
    }

    #[rstest]
    #[case("due", true)]
    #[case("due=2022-02-01", true)]
    #[case("due!=2022-02-01", false)]
    #[case("due~02", true)]
    #[case("id", false)]
    fn test_metadata_filter_parse(#[case] text: &str, #[case] expected: bool) {
        let filter = MetadataFilter::parse(text);
        assert_eq!(filter.matches(&todo("pay rent due:2022-02-01")), expected);
    }

    #[test]
    fn test_optional_metadata_filter() {
        let filter = MetadataFilter::eq("id", "7").optional();
        assert!(filter.matches(&todo("no id here")));
        assert!(filter.matches(&todo("task id:7")));
        assert!(!filter.matches(&todo("task id:8")));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = TodoFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&todo("anything")));
    }
}
