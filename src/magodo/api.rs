//! # API Facade
//!
//! The single entry point for magodo operations. Each method dispatches to a
//! function in `commands/*.rs` and returns its [`CmdResult`].
//!
//! The facade does no I/O and no formatting: callers hand it the input lines
//! and decide how to present the result.

use crate::clock::Clock;
use crate::commands;
use crate::config::MagodoConfig;
use crate::error::Result;
use crate::filter::TodoFilter;
use crate::spells::Spellbook;
use std::sync::Arc;

pub use crate::commands::{CmdMessage, CmdResult, ListedTodo, MessageLevel};

#[derive(Debug, Clone)]
pub struct MagodoApi {
    spellbook: Arc<Spellbook>,
}

impl MagodoApi {
    pub fn new(spellbook: Spellbook) -> Self {
        Self {
            spellbook: Arc::new(spellbook),
        }
    }

    pub fn from_config(config: MagodoConfig, clock: impl Clock + 'static) -> Result<Self> {
        Ok(Self::new(config.into_spellbook(clock)?))
    }

    pub fn spellbook(&self) -> &Spellbook {
        &self.spellbook
    }

    pub fn format<S: AsRef<str>>(&self, lines: &[S]) -> Result<CmdResult> {
        commands::format::run(&self.spellbook, lines)
    }

    pub fn list<S: AsRef<str>>(&self, lines: &[S], filter: &TodoFilter) -> Result<CmdResult> {
        commands::list::run(&self.spellbook, lines, filter)
    }

    pub fn check<S: AsRef<str>>(&self, lines: &[S]) -> Result<CmdResult> {
        commands::check::run(&self.spellbook, lines)
    }
}
