//! Command interpreter and terminal subsystem.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name. Resolution is pure: a command
//! returns its output plus declared effects, and the [`Interpreter`] applies
//! them to the history log, the download simulator and the theme channel.

mod commands;
pub mod completion;
pub mod download;
mod executor;
pub mod file_commands;
pub mod history;
pub mod input_line;
mod interpreter;
pub mod skin_commands;

#[cfg(test)]
pub(crate) mod test_utils;

/// Register all built-in commands (profile, resume, theme, files) into a registry.
pub use commands::register_builtins;
/// Register the profile presentation commands into a registry.
pub use commands::register_profile_commands;
/// Welcome banner text for a profile.
pub use commands::welcome_banner;
/// Autocomplete outcome.
pub use completion::Completion;
/// Download simulator, its configuration and observable state.
pub use download::{DownloadConfig, DownloadSimulator, DownloadState, DownloadUpdate};
/// The stateful executor and what it reports per submission.
pub use executor::{BANNER_INPUT, Interpreter, InterpreterDeps, Submission};
/// Register ls/cat/echo/clear into a registry.
pub use file_commands::register_file_commands;
/// History log, records and recall navigation.
pub use history::{CommandRecord, HistoryNavigator, Recall, RecordKind, SessionHistory};
/// A single executable command trait.
pub use interpreter::Command;
/// Successful handler output (block + declared effects).
pub use interpreter::CommandOutput;
/// Registry of available commands with pure resolution.
pub use interpreter::CommandRegistry;
/// Side effect declared by a handler.
pub use interpreter::Effect;
/// Read-only context passed to every command.
pub use interpreter::Environment;
/// Output block of a record.
pub use interpreter::OutputBlock;
/// Line parsing and resolution results.
pub use interpreter::{ParsedLine, Resolution, parse_line};
/// Register the theme command into a registry.
pub use skin_commands::register_skin_commands;
