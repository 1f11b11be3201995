//! Built-in search providers and action factories for Beacon.

pub mod actions;
pub mod calc;
pub mod commands;
pub mod files;
pub mod snippets;
pub mod web;

pub use actions::{CopyActionFactory, OpenActionFactory};
pub use calc::CalcProvider;
pub use commands::{builtin_commands, CommandProvider, CommandSpec};
pub use files::FileProvider;
pub use snippets::{SnippetProvider, SnippetRunner};
pub use web::WikiProvider;
