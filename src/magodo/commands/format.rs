use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::magic::MagicTodo;
use crate::spells::Spellbook;
use std::sync::Arc;

/// Rewrites every line in canonical form.
///
/// Blank lines are kept blank. Rejected lines are kept verbatim with a
/// warning; any other error aborts.
pub fn run<S: AsRef<str>>(spellbook: &Arc<Spellbook>, lines: &[S]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut out = Vec::with_capacity(lines.len());
    let mut rejected = 0;

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            out.push(String::new());
            continue;
        }

        match MagicTodo::from_line(line, spellbook.clone()) {
            Ok(magic) => out.push(magic.to_line()),
            Err(err) if err.is_rejection() => {
                rejected += 1;
                result.add_message(CmdMessage::warning(format!(
                    "line {} left unchanged: {}",
                    index + 1,
                    err.chain()
                )));
                out.push(line.to_string());
            }
            Err(err) => return Err(err),
        }
    }

    Ok(result.with_lines(out).with_rejected(rejected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::commands::MessageLevel;
    use crate::grammar::ParseMode;
    use chrono::NaiveDate;

    fn magic() -> Arc<Spellbook> {
        let clock = FixedClock::at(NaiveDate::from_ymd_opt(2022, 1, 10).unwrap(), 9, 30).unwrap();
        Arc::new(Spellbook::magic().with_clock(clock))
    }

    #[test]
    fn formats_each_line() {
        let result = run(&magic(), &["o @home buy milk", "", "(A) 2022-01-01 pay rent"]).unwrap();
        assert_eq!(
            result.lines,
            vec![
                "o 2022-01-10 buy milk | @home ctime:0930",
                "",
                "(A) 2022-01-01 pay rent | ctime:0930",
            ]
        );
        assert_eq!(result.rejected, 0);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn keeps_rejected_lines_verbatim() {
        let result = run(&magic(), &["missing marker", "o fine"]).unwrap();
        assert_eq!(result.lines[0], "missing marker");
        assert_eq!(result.rejected, 1);
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert!(result.messages[0].content.starts_with("line 1 left unchanged"));
    }

    #[test]
    fn plain_spellbook_only_normalizes_spacing() {
        let plain = Arc::new(Spellbook::plain(ParseMode::Permissive));
        let result = run(&plain, &["  (B)   2022-01-01 call mom  "]).unwrap();
        assert_eq!(result.lines, vec!["(B) 2022-01-01 call mom"]);
    }
}
