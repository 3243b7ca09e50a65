//! Built-in spells and the name registry used by configuration.
//!
//! | Name | Kind | Effect |
//! |------|------|--------|
//! | `validate_prefix` | validate | line must start with `x `, `o `, `x:HHMM ` or `(P) ` |
//! | `remove_o_prefix` | line-pre | drops a leading `o ` (strict: rewrites it to `(O) `) |
//! | `remove_x_prefix` | line-pre | `x:HHMM rest` → `x rest dtime:HHMM` |
//! | `x_tag` | transform | completes a todo whose description starts with `x:HHMM` |
//! | `add_create_date` | transform | stamps today's date when no creation date is set |
//! | `add_done_date` | transform | stamps today's date on done todos without a completion date |
//! | `add_ctime` | transform | appends `ctime:HHMM` when missing |
//! | `group_tags` | transform | moves edge tags into a sorted tail (see [`super::group_tags`]) |
//! | `add_o_prefix` | line-post | prefixes `o ` when the line has no status prefix |
//! | `add_x_prefix` | line-post | `x rest dtime:HHMM` → `x:HHMM rest` |

use super::group_tags::group_tags;
use super::{LineSpell, Spell, SpellContext, TodoSpell, ValidateSpell};
use crate::error::{MagodoError, Result};
use crate::grammar::{
    self, expand_completion_shorthand, is_hhmm, split_completion_word, ParseMode, CTIME_KEY,
    DONE_PREFIX, DTIME_KEY, OPEN_PREFIX,
};
use crate::model::{Priority, Todo};

pub const VALIDATE_PREFIX: ValidateSpell = Spell::new("validate_prefix", validate_prefix);
pub const REMOVE_O_PREFIX: LineSpell = Spell::new("remove_o_prefix", remove_o_prefix);
pub const REMOVE_X_PREFIX: LineSpell = Spell::new("remove_x_prefix", remove_x_prefix);
pub const X_TAG: TodoSpell = Spell::new("x_tag", x_tag);
pub const ADD_CREATE_DATE: TodoSpell = Spell::new("add_create_date", add_create_date);
pub const ADD_DONE_DATE: TodoSpell = Spell::new("add_done_date", add_done_date);
pub const ADD_CTIME: TodoSpell = Spell::new("add_ctime", add_ctime);
pub const GROUP_TAGS: TodoSpell = Spell::new("group_tags", group_tags);
pub const ADD_O_PREFIX: LineSpell = Spell::new("add_o_prefix", add_o_prefix);
pub const ADD_X_PREFIX: LineSpell = Spell::new("add_x_prefix", add_x_prefix);

pub const VALIDATE_SPELLS: &[ValidateSpell] = &[VALIDATE_PREFIX];
pub const LINE_PRE_SPELLS: &[LineSpell] = &[REMOVE_O_PREFIX, REMOVE_X_PREFIX];
pub const TRANSFORM_SPELLS: &[TodoSpell] = &[
    X_TAG,
    ADD_CREATE_DATE,
    ADD_DONE_DATE,
    ADD_CTIME,
    GROUP_TAGS,
];
pub const LINE_POST_SPELLS: &[LineSpell] = &[ADD_O_PREFIX, ADD_X_PREFIX];

pub fn find_validate_spell(name: &str) -> Result<ValidateSpell> {
    find("validate", VALIDATE_SPELLS, name)
}

pub fn find_line_pre_spell(name: &str) -> Result<LineSpell> {
    find("line-pre", LINE_PRE_SPELLS, name)
}

pub fn find_transform_spell(name: &str) -> Result<TodoSpell> {
    find("transform", TRANSFORM_SPELLS, name)
}

pub fn find_line_post_spell(name: &str) -> Result<LineSpell> {
    find("line-post", LINE_POST_SPELLS, name)
}

fn find<F: Copy>(kind: &'static str, registry: &[Spell<F>], name: &str) -> Result<Spell<F>> {
    registry
        .iter()
        .find(|spell| spell.name == name)
        .copied()
        .ok_or_else(|| MagodoError::UnknownSpell {
            kind,
            name: name.to_string(),
        })
}

/// True if `line` starts with a done, open, shorthand-done, or priority prefix.
pub fn has_status_prefix(line: &str) -> bool {
    line.starts_with(DONE_PREFIX)
        || line.starts_with(OPEN_PREFIX)
        || expand_completion_shorthand(line).is_some()
        || has_priority_prefix(line)
}

fn has_priority_prefix(line: &str) -> bool {
    matches!(
        line.as_bytes(),
        [b'(', letter, b')', b' ', ..] if letter.is_ascii_uppercase()
    )
}

fn validate_prefix(line: &str, _ctx: &SpellContext<'_>) -> Result<()> {
    if has_status_prefix(line) {
        return Ok(());
    }

    Err(MagodoError::Rejected(
        "magic todos must have an explicit priority, be marked done with an 'x' prefix, \
         or be marked open with an 'o' prefix"
            .to_string(),
    ))
}

/// Strict grammar needs the open status stated, so there the marker becomes
/// the default priority instead of being dropped.
fn remove_o_prefix(line: &str, ctx: &SpellContext<'_>) -> String {
    match (line.strip_prefix(OPEN_PREFIX), ctx.mode) {
        (Some(rest), ParseMode::Strict) => format!("({}) {}", Priority::DEFAULT, rest),
        (Some(rest), ParseMode::Permissive) => rest.to_string(),
        (None, _) => line.to_string(),
    }
}

/// Lines whose expansion would not read as a done todo are left as they are.
fn remove_x_prefix(line: &str, ctx: &SpellContext<'_>) -> String {
    expand_completion_shorthand(line)
        .filter(|expanded| grammar::parse(expanded, ctx.mode).is_ok_and(|todo| todo.done()))
        .unwrap_or_else(|| line.to_string())
}

/// A default priority may be replaced by one written after the `x:HHMM` word.
fn keeps_priority(before: &Todo, after: &Todo) -> bool {
    before.priority().is_default() || before.priority() == after.priority()
}

/// Completes a todo whose description opens with an `x:HHMM` word.
///
/// The word is replaced by a trailing `dtime:HHMM` tag, the todo is marked
/// done, and the result is parsed again so the leading fields land in place.
/// The todo is returned unchanged when the rebuilt line does not read back as
/// a done todo with its priority (e.g. the remaining text starts with
/// `--` or an out-of-calendar date).
fn x_tag(todo: Todo, ctx: &SpellContext<'_>) -> Result<Todo> {
    let Some((hhmm, rest)) = split_completion_word(todo.desc()) else {
        return Ok(todo);
    };

    let desc = format!("{} {}:{}", rest, DTIME_KEY, hhmm);
    let line = todo
        .clone()
        .with_desc(desc)
        .with_done(true)
        .to_line_in(ctx.mode);

    match grammar::parse(&line, ctx.mode) {
        Ok(done) if done.done() && keeps_priority(&todo, &done) => Ok(done),
        Ok(_) => {
            log::debug!("x_tag left {:?} alone: {:?} is not a done todo", todo.desc(), line);
            Ok(todo)
        }
        Err(err) if err.is_rejection() => {
            log::debug!("x_tag left {:?} alone: {}", todo.desc(), err);
            Ok(todo)
        }
        Err(err) => Err(err),
    }
}

fn add_create_date(todo: Todo, ctx: &SpellContext<'_>) -> Result<Todo> {
    if todo.create_date().is_some() {
        return Ok(todo);
    }

    Ok(todo.with_create_date(Some(ctx.clock.today())))
}

fn add_done_date(todo: Todo, ctx: &SpellContext<'_>) -> Result<Todo> {
    if todo.done_date().is_some() || !todo.done() {
        return Ok(todo);
    }

    Ok(todo.with_done_date(Some(ctx.clock.today())))
}

fn add_ctime(todo: Todo, ctx: &SpellContext<'_>) -> Result<Todo> {
    if todo.metadata().contains_key(CTIME_KEY) {
        return Ok(todo);
    }

    Ok(todo.with_metadata_tag(CTIME_KEY, &ctx.clock.hhmm()))
}

fn add_o_prefix(line: &str, _ctx: &SpellContext<'_>) -> String {
    if has_status_prefix(line) {
        return line.to_string();
    }

    format!("{OPEN_PREFIX}{line}")
}

/// Turns `x rest` into `x:HHMM rest`, taking `HHMM` from the first valid
/// `dtime` word (which is removed) or from the clock.
fn add_x_prefix(line: &str, ctx: &SpellContext<'_>) -> String {
    let Some(rest) = line.strip_prefix(DONE_PREFIX) else {
        return line.to_string();
    };

    let mut words: Vec<&str> = rest.split(' ').collect();
    let dtime = words.iter().position(|word| {
        word.strip_prefix("dtime:").is_some_and(is_hhmm)
    });

    let hhmm = match dtime {
        Some(i) if words.len() > 1 => words.remove(i)["dtime:".len()..].to_string(),
        _ => ctx.clock.hhmm(),
    };

    format!("x:{} {}", hhmm, words.join(" "))
}
