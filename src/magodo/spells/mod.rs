//! # Spells
//!
//! A spell is a named, pure function cast at a fixed point around the base
//! grammar. There are four kinds:
//!
//! | Kind | Signature | Cast |
//! |------|-----------|------|
//! | validate | `&str -> Result<()>` | on the raw (trimmed) line, before anything else |
//! | line-pre | `&str -> String` | on the line, before grammar parsing |
//! | transform | `Todo -> Result<Todo>` | on the parsed todo, in order |
//! | line-post | `&str -> String` | on the serialized line |
//!
//! A [`Spellbook`] holds one ordered list per kind plus the [`ParseMode`] and
//! [`Clock`] the spells run with. It is built once and then only read, so one
//! spellbook can be shared across threads.
//!
//! ## Reading a line
//!
//! 1. Validate spells, stopping at the first failure.
//! 2. Line-pre spells, each receiving the previous spell's output.
//! 3. Grammar parse.
//! 4. Transform spells, stopping at the first failure.
//!
//! Errors from steps 1 and 4 are wrapped with the name of the failing spell
//! (see [`MagodoError::ValidateSpellFailed`] and
//! [`MagodoError::TransformSpellFailed`]). Nothing is partially applied: a
//! failed read returns no todo at all.
//!
//! ## Writing a todo
//!
//! The todo is serialized by the grammar for the spellbook's [`ParseMode`]
//! and the line-post spells are cast on the result. Strict spellbooks always
//! write an open todo's priority, so their output reads back in strict mode.
//!
//! See [`builtin`] for the spells that ship with magodo.

pub mod builtin;
pub mod group_tags;

use crate::clock::{Clock, SystemClock};
use crate::error::{MagodoError, Result};
use crate::grammar::{self, ParseMode};
use crate::model::Todo;
use std::fmt;
use std::sync::Arc;

/// What a spell gets to see besides its input.
#[derive(Debug, Clone, Copy)]
pub struct SpellContext<'a> {
    pub clock: &'a dyn Clock,
    pub mode: ParseMode,
}

pub type ValidateFn = fn(&str, &SpellContext<'_>) -> Result<()>;
pub type LineFn = fn(&str, &SpellContext<'_>) -> String;
pub type TodoFn = fn(Todo, &SpellContext<'_>) -> Result<Todo>;

/// A function paired with the name it is configured and reported by.
#[derive(Clone, Copy)]
pub struct Spell<F> {
    pub name: &'static str,
    pub cast: F,
}

impl<F> Spell<F> {
    pub const fn new(name: &'static str, cast: F) -> Self {
        Self { name, cast }
    }
}

impl<F> fmt::Debug for Spell<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Spell").field(&self.name).finish()
    }
}

pub type ValidateSpell = Spell<ValidateFn>;
pub type LineSpell = Spell<LineFn>;
pub type TodoSpell = Spell<TodoFn>;

/// The four ordered spell lists, plus the mode and clock they run with.
#[derive(Debug, Clone)]
pub struct Spellbook {
    mode: ParseMode,
    clock: Arc<dyn Clock>,
    validate: Vec<ValidateSpell>,
    line_pre: Vec<LineSpell>,
    transform: Vec<TodoSpell>,
    line_post: Vec<LineSpell>,
}

impl Default for Spellbook {
    fn default() -> Self {
        Self::magic()
    }
}

impl Spellbook {
    /// A spellbook with no spells: reading and writing are the bare grammar.
    pub fn plain(mode: ParseMode) -> Self {
        Self {
            mode,
            clock: Arc::new(SystemClock),
            validate: Vec::new(),
            line_pre: Vec::new(),
            transform: Vec::new(),
            line_post: Vec::new(),
        }
    }

    /// The default configuration: every built-in spell, in registry order.
    pub fn magic() -> Self {
        let book = builtin::VALIDATE_SPELLS
            .iter()
            .fold(Self::plain(ParseMode::Permissive), |book, spell| {
                book.validate(*spell)
            });
        let book = builtin::LINE_PRE_SPELLS
            .iter()
            .fold(book, |book, spell| book.line_pre(*spell));
        let book = builtin::TRANSFORM_SPELLS
            .iter()
            .fold(book, |book, spell| book.transform(*spell));
        builtin::LINE_POST_SPELLS
            .iter()
            .fold(book, |book, spell| book.line_post(*spell))
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn validate(mut self, spell: ValidateSpell) -> Self {
        self.validate.push(spell);
        self
    }

    pub fn line_pre(mut self, spell: LineSpell) -> Self {
        self.line_pre.push(spell);
        self
    }

    pub fn transform(mut self, spell: TodoSpell) -> Self {
        self.transform.push(spell);
        self
    }

    pub fn line_post(mut self, spell: LineSpell) -> Self {
        self.line_post.push(spell);
        self
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn validate_spells(&self) -> &[ValidateSpell] {
        &self.validate
    }

    pub fn line_pre_spells(&self) -> &[LineSpell] {
        &self.line_pre
    }

    pub fn transform_spells(&self) -> &[TodoSpell] {
        &self.transform
    }

    pub fn line_post_spells(&self) -> &[LineSpell] {
        &self.line_post
    }

    pub fn context(&self) -> SpellContext<'_> {
        SpellContext {
            clock: self.clock.as_ref(),
            mode: self.mode,
        }
    }

    /// Validates, pre-processes, and parses `line` without casting transform spells.
    pub fn read_base(&self, line: &str) -> Result<Todo> {
        let ctx = self.context();
        let line = line.trim();

        for spell in &self.validate {
            (spell.cast)(line, &ctx).map_err(|source| MagodoError::ValidateSpellFailed {
                spell: spell.name,
                line: line.to_string(),
                source: Box::new(source),
            })?;
        }

        let line = self
            .line_pre
            .iter()
            .fold(line.to_string(), |line, spell| (spell.cast)(&line, &ctx));

        grammar::parse(&line, self.mode)
    }

    /// Casts the transform spells on `todo`, in order.
    pub fn enchant(&self, todo: Todo) -> Result<Todo> {
        let ctx = self.context();
        let mut todo = todo;

        for spell in &self.transform {
            let input = todo.clone();
            todo = (spell.cast)(todo, &ctx).map_err(|source| {
                MagodoError::TransformSpellFailed {
                    spell: spell.name,
                    todo: Box::new(input.clone()),
                    source: Box::new(source),
                }
            })?;

            if todo != input {
                log::debug!(
                    "{} spell changed todo: {:?} -> {:?}",
                    spell.name,
                    input.to_line(),
                    todo.to_line()
                );
            }
        }

        Ok(todo)
    }

    /// Reads a line through the whole pipeline.
    pub fn read(&self, line: &str) -> Result<Todo> {
        let todo = self.read_base(line)?;
        self.enchant(todo)
    }

    /// Serializes `todo` and casts the line-post spells on the result.
    pub fn write(&self, todo: &Todo) -> String {
        let ctx = self.context();
        self.line_post
            .iter()
            .fold(todo.to_line_in(self.mode), |line, spell| {
                (spell.cast)(&line, &ctx)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock::at(NaiveDate::from_ymd_opt(2022, 1, 10).unwrap(), 9, 30).unwrap()
    }

    fn reject_everything(_line: &str, _ctx: &SpellContext<'_>) -> Result<()> {
        Err(MagodoError::Rejected("no lines allowed".into()))
    }

    fn shout(line: &str, _ctx: &SpellContext<'_>) -> String {
        line.to_uppercase()
    }

    fn append_a(line: &str, _ctx: &SpellContext<'_>) -> String {
        format!("{line} a")
    }

    fn append_b(line: &str, _ctx: &SpellContext<'_>) -> String {
        format!("{line} b")
    }

    fn mark_done(todo: Todo, _ctx: &SpellContext<'_>) -> Result<Todo> {
        Ok(todo.with_done(true))
    }

    fn fail(_todo: Todo, _ctx: &SpellContext<'_>) -> Result<Todo> {
        Err(MagodoError::Rejected("broken spell".into()))
    }

    #[test]
    fn plain_spellbook_is_bare_grammar() {
        let book = Spellbook::plain(ParseMode::Permissive);
        let todo = book.read("(A) task @home").unwrap();
        assert_eq!(todo, Todo::from_line("(A) task @home", ParseMode::Permissive).unwrap());
        assert_eq!(book.write(&todo), "(A) task @home");
    }

    #[test]
    fn validate_failure_is_wrapped() {
        let book = Spellbook::plain(ParseMode::Permissive)
            .validate(Spell::new("reject_everything", reject_everything));
        let err = book.read("  task  ").unwrap_err();
        match err {
            MagodoError::ValidateSpellFailed { spell, line, source } => {
                assert_eq!(spell, "reject_everything");
                assert_eq!(line, "task");
                assert!(matches!(*source, MagodoError::Rejected(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn line_spells_run_in_order() {
        let book = Spellbook::plain(ParseMode::Permissive)
            .line_post(Spell::new("append_a", append_a))
            .line_post(Spell::new("append_b", append_b));
        assert_eq!(book.write(&Todo::new("task")), "task a b");

        let reversed = Spellbook::plain(ParseMode::Permissive)
            .line_post(Spell::new("append_b", append_b))
            .line_post(Spell::new("append_a", append_a));
        assert_eq!(reversed.write(&Todo::new("task")), "task b a");
    }

    #[test]
    fn line_pre_spells_run_before_parse() {
        let book = Spellbook::plain(ParseMode::Permissive).line_pre(Spell::new("shout", shout));
        let todo = book.read("task @home").unwrap();
        assert_eq!(todo.desc(), "TASK @HOME");
        assert!(todo.contexts().contains("HOME"));
    }

    #[test]
    fn transform_failure_short_circuits() {
        let book = Spellbook::plain(ParseMode::Permissive)
            .transform(Spell::new("fail", fail))
            .transform(Spell::new("mark_done", mark_done));
        let err = book.read("task").unwrap_err();
        match err {
            MagodoError::TransformSpellFailed { spell, todo, .. } => {
                assert_eq!(spell, "fail");
                assert_eq!(*todo, Todo::new("task"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn grammar_mismatch_passes_through_unwrapped() {
        let book = Spellbook::magic().with_clock(clock());
        let err = book.read("o !!!").unwrap_err();
        assert!(matches!(err, MagodoError::GrammarMismatch { .. }));
    }

    #[test]
    fn magic_spellbook_registers_every_builtin() {
        let book = Spellbook::magic();
        let names: Vec<_> = book.transform_spells().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["x_tag", "add_create_date", "add_done_date", "add_ctime", "group_tags"]
        );
        assert_eq!(book.validate_spells().len(), 1);
        assert_eq!(book.line_pre_spells().len(), 2);
        assert_eq!(book.line_post_spells().len(), 2);
        assert_eq!(book.mode(), ParseMode::Permissive);
    }

    #[test]
    fn spellbook_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Spellbook>();
    }
}
