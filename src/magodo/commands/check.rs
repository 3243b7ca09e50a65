use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::magic::MagicTodo;
use crate::spells::Spellbook;
use std::sync::Arc;

/// Reports every non-blank line the spellbook cannot read.
pub fn run<S: AsRef<str>>(spellbook: &Arc<Spellbook>, lines: &[S]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut checked = 0;
    let mut rejected = 0;

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }

        checked += 1;
        if let Err(err) = MagicTodo::from_line(line, spellbook.clone()) {
            rejected += 1;
            result.add_message(CmdMessage::error(format!(
                "line {}: {}",
                index + 1,
                err.chain()
            )));
        }
    }

    if rejected == 0 {
        result.add_message(CmdMessage::success(format!("{} todo(s) OK", checked)));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "{} of {} todo(s) rejected",
            rejected, checked
        )));
    }

    Ok(result.with_rejected(rejected))
}
