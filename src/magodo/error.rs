use crate::grammar::ParseMode;
use crate::model::Todo;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MagodoError {
    #[error(
        "the provided string ({line:?}) does not adhere to the todo.txt format ({mode} mode)"
    )]
    GrammarMismatch { line: String, mode: ParseMode },

    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid priority {0:?}: expected a letter between 'A' and 'Z'")]
    InvalidPriority(char),

    #[error("the {spell:?} validate spell rejected this line: {line:?}")]
    ValidateSpellFailed {
        spell: &'static str,
        line: String,
        #[source]
        source: Box<MagodoError>,
    },

    #[error("the {spell:?} spell failed while processing this todo: {todo}")]
    TransformSpellFailed {
        spell: &'static str,
        todo: Box<Todo>,
        #[source]
        source: Box<MagodoError>,
    },

    #[error("{0}")]
    Rejected(String),

    #[error("unknown {kind} spell: {name:?}")]
    UnknownSpell { kind: &'static str, name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MagodoError {
    /// True for the line-level errors a collection skips over.
    ///
    /// Anything else coming out of the pipeline is a configuration or
    /// internal problem and should be surfaced to the caller.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            MagodoError::GrammarMismatch { .. }
                | MagodoError::InvalidDate(_)
                | MagodoError::ValidateSpellFailed { .. }
        )
    }

    /// Renders the error followed by every wrapped cause, outermost first.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str(": ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}

pub type Result<T> = std::result::Result<T, MagodoError>;
