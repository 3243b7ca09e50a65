use crate::error::Result;
use crate::grammar::ParseMode;
use crate::model::{Metadata, Priority, Todo};
use crate::spells::Spellbook;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A [`Todo`] read through a [`Spellbook`].
///
/// Holds both the todo as the grammar parsed it and the enchanted result.
/// Accessors, equality, and ordering all refer to the enchanted todo;
/// [`MagicTodo::to_line`] writes it back through the spellbook's line-post
/// spells.
#[derive(Debug, Clone)]
pub struct MagicTodo {
    original: Todo,
    todo: Todo,
    spellbook: Arc<Spellbook>,
}

impl MagicTodo {
    pub fn from_line(line: &str, spellbook: Arc<Spellbook>) -> Result<Self> {
        let original = spellbook.read_base(line)?;
        Self::from_todo(original, spellbook)
    }

    /// Casts the transform spells on an already parsed todo.
    pub fn from_todo(todo: Todo, spellbook: Arc<Spellbook>) -> Result<Self> {
        let enchanted = spellbook.enchant(todo.clone())?;
        Ok(Self {
            original: todo,
            todo: enchanted,
            spellbook,
        })
    }

    pub fn to_line(&self) -> String {
        self.spellbook.write(&self.todo)
    }

    pub fn todo(&self) -> &Todo {
        &self.todo
    }

    /// The todo before any transform spell was cast.
    pub fn original(&self) -> &Todo {
        &self.original
    }

    pub fn into_todo(self) -> Todo {
        self.todo
    }

    pub fn spellbook(&self) -> &Spellbook {
        &self.spellbook
    }

    pub fn mode(&self) -> ParseMode {
        self.spellbook.mode()
    }

    pub fn desc(&self) -> &str {
        self.todo.desc()
    }

    pub fn priority(&self) -> Priority {
        self.todo.priority()
    }

    pub fn create_date(&self) -> Option<NaiveDate> {
        self.todo.create_date()
    }

    pub fn done_date(&self) -> Option<NaiveDate> {
        self.todo.done_date()
    }

    pub fn done(&self) -> bool {
        self.todo.done()
    }

    pub fn contexts(&self) -> &BTreeSet<String> {
        self.todo.contexts()
    }

    pub fn projects(&self) -> &BTreeSet<String> {
        self.todo.projects()
    }

    pub fn epics(&self) -> &BTreeSet<String> {
        self.todo.epics()
    }

    pub fn metadata(&self) -> &Metadata {
        self.todo.metadata()
    }

    /// A serializable snapshot: both todos and the configured spell names.
    pub fn summary(&self) -> MagicSummary<'_> {
        fn names<F>(spells: &[crate::spells::Spell<F>]) -> Vec<&'static str> {
            spells.iter().map(|spell| spell.name).collect()
        }

        MagicSummary {
            original: &self.original,
            todo: &self.todo,
            line: self.to_line(),
            validate_spells: names(self.spellbook.validate_spells()),
            line_pre_spells: names(self.spellbook.line_pre_spells()),
            transform_spells: names(self.spellbook.transform_spells()),
            line_post_spells: names(self.spellbook.line_post_spells()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MagicSummary<'a> {
    pub original: &'a Todo,
    pub todo: &'a Todo,
    pub line: String,
    pub validate_spells: Vec<&'static str>,
    pub line_pre_spells: Vec<&'static str>,
    pub transform_spells: Vec<&'static str>,
    pub line_post_spells: Vec<&'static str>,
}

impl fmt::Display for MagicTodo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

impl AsRef<Todo> for MagicTodo {
    fn as_ref(&self) -> &Todo {
        &self.todo
    }
}

impl PartialEq for MagicTodo {
    fn eq(&self, other: &Self) -> bool {
        self.todo == other.todo
    }
}

impl Eq for MagicTodo {}

impl Ord for MagicTodo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.todo.cmp(&other.todo)
    }
}

impl PartialOrd for MagicTodo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
