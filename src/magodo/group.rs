use crate::error::{MagodoError, Result};
use crate::filter::TodoFilter;
use crate::model::Todo;

/// A todo together with the 1-based number of the line it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub line_number: usize,
    pub todo: T,
}

/// An in-memory collection of todos read from a sequence of lines.
///
/// Lines that are blank or are rejected by the parser (see
/// [`MagodoError::is_rejection`](crate::error::MagodoError::is_rejection)) are
/// skipped and counted. Any other error aborts the read.
#[derive(Debug, Clone)]
pub struct TodoGroup<T> {
    entries: Vec<Entry<T>>,
    skipped: usize,
}

impl<T> Default for TodoGroup<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            skipped: 0,
        }
    }
}

impl<T: AsRef<Todo>> TodoGroup<T> {
    pub fn from_lines<I, S, F>(lines: I, mut parse: F) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> Result<T>,
    {
        let mut group = Self::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            match parse(line) {
                Ok(todo) => group.entries.push(Entry {
                    line_number: index + 1,
                    todo,
                }),
                Err(err @ MagodoError::InvalidDate(_)) => {
                    log::warn!("skipping line {}: {}", index + 1, err);
                    group.skipped += 1;
                }
                Err(err) if err.is_rejection() => {
                    log::debug!("skipping line {}: {}", index + 1, err.chain());
                    group.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        log::debug!(
            "read {} todos ({} lines skipped)",
            group.entries.len(),
            group.skipped
        );
        Ok(group)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-blank lines that were rejected.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.todo)
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    /// Keeps the todos matching `filter`. Line numbers are preserved.
    pub fn filter(self, filter: &TodoFilter) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .filter(|entry| filter.matches(entry.todo.as_ref()))
                .collect(),
            skipped: self.skipped,
        }
    }
}

impl<T: AsRef<Todo> + Ord> TodoGroup<T> {
    /// Sorts by the todo ordering. Equal todos keep their line order.
    pub fn sorted(mut self) -> Self {
        self.entries.sort_by(|a, b| a.todo.cmp(&b.todo));
        self
    }
}

impl<T> IntoIterator for TodoGroup<T> {
    type Item = Entry<T>;
    type IntoIter = std::vec::IntoIter<Entry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ParseMode;

    const LINES: &[&str] = &[
        "(B) second @work",
        "",
        "(A) first @home",
        "-- not a todo",
        "x done @home",
    ];

    fn parse(line: &str) -> Result<Todo> {
        Todo::from_line(line, ParseMode::Permissive)
    }

    #[test]
    fn test_from_lines_skips_rejections() {
        let group = TodoGroup::from_lines(LINES, parse).unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.skipped(), 1);
        let numbers: Vec<_> = group.entries().iter().map(|e| e.line_number).collect();
        assert_eq!(numbers, vec![1, 3, 5]);
    }

    #[test]
    fn test_non_rejection_error_aborts() {
        let result = TodoGroup::from_lines(["(A) fine", "boom"], |line: &str| {
            if line == "boom" {
                Err(MagodoError::UnknownSpell {
                    kind: "transform",
                    name: "boom".into(),
                })
            } else {
                parse(line)
            }
        });
        assert!(matches!(result, Err(MagodoError::UnknownSpell { .. })));
    }

    #[test]
    fn test_sorted_then_filtered() {
        let filter = TodoFilter {
            contexts: vec!["home".into()],
            ..TodoFilter::default()
        };
        let group = TodoGroup::from_lines(LINES, parse)
            .unwrap()
            .sorted()
            .filter(&filter);

        let descs: Vec<_> = group.iter().map(|todo| todo.desc()).collect();
        assert_eq!(descs, vec!["first @home", "done @home"]);
        assert_eq!(group.entries()[0].line_number, 3);
    }
}
