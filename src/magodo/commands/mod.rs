use crate::magic::MagicTodo;
use crate::model::Todo;
use serde::Serialize;

pub mod check;
pub mod format;
pub mod list;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A todo selected for display, with the line it came from and its written form.
#[derive(Debug, Clone, Serialize)]
pub struct ListedTodo {
    pub line_number: usize,
    pub line: String,
    pub todo: Todo,
}

impl ListedTodo {
    pub fn new(line_number: usize, magic: MagicTodo) -> Self {
        Self {
            line_number,
            line: magic.to_line(),
            todo: magic.into_todo(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Output lines, one per input line.
    pub lines: Vec<String>,
    pub listed_todos: Vec<ListedTodo>,
    /// Number of non-blank input lines that could not be read.
    pub rejected: usize,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_listed_todos(mut self, todos: Vec<ListedTodo>) -> Self {
        self.listed_todos = todos;
        self
    }

    pub fn with_rejected(mut self, rejected: usize) -> Self {
        self.rejected = rejected;
        self
    }
}
