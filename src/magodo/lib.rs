//! # Magodo
//!
//! A library for [todo.txt](https://github.com/todotxt/todo.txt) lines, with a
//! configurable pipeline of "spells" layered on top of the base grammar. The
//! `magodo` binary is a thin client of this library.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Reads stdin, parses arguments, prints, sets exit codes   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs) and commands (commands/*.rs)                  │
//! │  - format / list / check over a slice of lines              │
//! │  - Return CmdResult, never print                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Magic (magic.rs, spells/)                                  │
//! │  - Spellbook: validate → line-pre → parse → transform       │
//! │  - MagicTodo: a todo read through a spellbook               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (model.rs, grammar.rs, ordering.rs, tags.rs, dates.rs)│
//! │  - Todo record, line grammar, sort order                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing below the CLI performs I/O, except [`config`] loading and saving
//! its own file. The current time reaches the spells only through the
//! [`clock::Clock`] trait.
//!
//! ## Quick start
//!
//! ```
//! use magodo::grammar::ParseMode;
//! use magodo::model::Todo;
//!
//! let todo = Todo::from_line("(A) 2022-01-10 call @mom +family due:friday", ParseMode::Permissive)?;
//! assert_eq!(todo.priority().letter(), 'A');
//! assert!(todo.contexts().contains("mom"));
//! assert_eq!(todo.metadata_value("due"), Some("friday"));
//! assert_eq!(todo.to_line(), "(A) 2022-01-10 call @mom +family due:friday");
//! # Ok::<(), magodo::error::MagodoError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`tags`]: Word classification (`@context`, `+project`, `#epic`, `key:value`)
//! - [`dates`]: `YYYY-MM-DD` codec and date ranges
//! - [`model`]: `Todo` and `Priority`
//! - [`grammar`]: Line parsing and serialization
//! - [`ordering`]: Sort order for todos
//! - [`clock`]: Injectable current time
//! - [`spells`]: The spell pipeline and the built-in spells
//! - [`magic`]: `MagicTodo`
//! - [`filter`], [`group`]: Selecting and collecting todos
//! - [`config`]: Spellbook configuration file
//! - [`api`], [`commands`]: Operations behind the CLI
//! - [`error`]: Error types

pub mod api;
pub mod clock;
pub mod commands;
pub mod config;
pub mod dates;
pub mod error;
pub mod filter;
pub mod grammar;
pub mod group;
pub mod magic;
pub mod model;
pub mod ordering;
pub mod spells;
pub mod tags;
