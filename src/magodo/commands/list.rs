use crate::commands::{CmdMessage, CmdResult, ListedTodo};
use crate::error::Result;
use crate::filter::TodoFilter;
use crate::group::TodoGroup;
use crate::magic::MagicTodo;
use crate::spells::Spellbook;
use std::sync::Arc;

/// Reads the lines, keeps the todos matching `filter`, and sorts them.
pub fn run<S: AsRef<str>>(
    spellbook: &Arc<Spellbook>,
    lines: &[S],
    filter: &TodoFilter,
) -> Result<CmdResult> {
    let group = TodoGroup::from_lines(lines, |line| {
        MagicTodo::from_line(line, spellbook.clone())
    })?;
    let skipped = group.skipped();

    let listed: Vec<_> = group
        .filter(filter)
        .sorted()
        .into_iter()
        .map(|entry| ListedTodo::new(entry.line_number, entry.todo))
        .collect();

    let mut result = CmdResult::default().with_rejected(skipped);
    if skipped > 0 {
        result.add_message(CmdMessage::info(format!(
            "{} line(s) skipped (run `magodo check` for details)",
            skipped
        )));
    }

    Ok(result.with_listed_todos(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ParseMode;

    fn plain() -> Arc<Spellbook> {
        Arc::new(Spellbook::plain(ParseMode::Permissive))
    }

    const LINES: &[&str] = &[
        "(C) water plants @home",
        "x (A) 2022-01-02 2022-01-01 file taxes @office",
        "(A) call mom @home +family",
        "-- notes --",
    ];

    #[test]
    fn lists_sorted() {
        let result = run(&plain(), LINES, &TodoFilter::default()).unwrap();
        let numbers: Vec<_> = result.listed_todos.iter().map(|t| t.line_number).collect();
        assert_eq!(numbers, vec![3, 1, 2]);
        assert_eq!(result.rejected, 1);
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn applies_filter() {
        let filter = TodoFilter {
            contexts: vec!["home".into()],
            done: Some(false),
            ..TodoFilter::default()
        };
        let result = run(&plain(), LINES, &filter).unwrap();
        let lines: Vec<_> = result.listed_todos.iter().map(|t| t.line.as_str()).collect();
        assert_eq!(lines, vec!["(A) call mom @home +family", "(C) water plants @home"]);
    }
}
