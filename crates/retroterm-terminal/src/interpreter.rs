//! Command trait, registry, and pure resolution.
//!
//! Resolving a line never touches session state. Handlers return an output
//! block plus the [`Effect`]s they want applied, and the executor in
//! [`crate::executor`] applies them. Help, completion and dispatch all read
//! the same registration list.

use std::collections::HashMap;
use std::fmt;

use retroterm_content::Profile;
use retroterm_skin::Theme;
use retroterm_types::error::{Result, RetroError};

use crate::completion::{Completion, complete};

/// Output block of a command record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBlock {
    /// Multi-line text.
    Text(String),
    /// Nothing to show.
    Empty,
}

impl OutputBlock {
    /// Text of the block; empty for `Empty`.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Empty => "",
        }
    }
}

impl fmt::Display for OutputBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Side effect declared by a handler and run by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Send a theme over the theme channel.
    BroadcastTheme(Theme),
    /// Hand off to the download simulator.
    StartDownload,
    /// Empty the history log; the submission itself is not recorded.
    ClearHistory,
}

/// Successful result of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub block: OutputBlock,
    pub effects: Vec<Effect>,
}

impl CommandOutput {
    /// Text output with no effects.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            block: OutputBlock::Text(text.into()),
            effects: Vec::new(),
        }
    }

    /// Output with nothing to show.
    pub fn empty() -> Self {
        Self {
            block: OutputBlock::Empty,
            effects: Vec::new(),
        }
    }

    /// Add an effect for the executor to run.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Read-only context passed to every command.
pub struct Environment<'a> {
    /// Content provider.
    pub profile: &'a Profile,
    /// Everything after the command keyword, case and spacing preserved.
    pub raw_args: &'a str,
    /// Whether a download is pending or active.
    pub download_busy: bool,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "cat <file>").
    fn usage(&self) -> &str;

    /// Category shown by `help <command>`.
    fn category(&self) -> &str {
        "general"
    }

    /// Run the command. Must not mutate anything; side effects are declared
    /// in the returned output.
    fn execute(&self, args: &[&str], env: &Environment<'_>) -> Result<CommandOutput>;
}

/// A normalized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// Lowercased keyword.
    pub base: String,
    /// Whitespace-separated arguments, case preserved.
    pub args: Vec<&'a str>,
    /// Argument text after the keyword.
    pub raw_args: &'a str,
}

/// Split a line into keyword and arguments. `None` for a blank line.
pub fn parse_line(line: &str) -> Option<ParsedLine<'_>> {
    let trimmed = line.trim();
    let keyword = trimmed.split_whitespace().next()?;
    let raw_args = trimmed[keyword.len()..].trim_start();
    Some(ParsedLine {
        base: keyword.to_lowercase(),
        args: raw_args.split_whitespace().collect(),
        raw_args,
    })
}

/// Outcome of resolving one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Lowercased keyword.
    pub base: String,
    pub block: OutputBlock,
    pub is_error: bool,
    pub effects: Vec<Effect>,
}

impl Resolution {
    /// Whether the resolution declares `effect`.
    pub fn has_effect(&self, effect: Effect) -> bool {
        self.effects.contains(&effect)
    }
}

/// Ordered registry of commands.
///
/// `help` is built in: it is always the first vocabulary entry and its text
/// is generated from the registrations.
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Name of the built-in help command.
    pub const HELP: &'static str = "help";

    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a command. Replaces an existing command with the same name
    /// in place, keeping its position in the listing.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let name = cmd.name().to_lowercase();
        match self.index.get(&name) {
            Some(&i) => self.commands[i] = cmd,
            None => {
                self.index.insert(name, self.commands.len());
                self.commands.push(cmd);
            },
        }
    }

    /// Number of registered commands, `help` excluded.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every dispatchable name, `help` first, then registration order.
    pub fn command_names(&self) -> Vec<&str> {
        std::iter::once(Self::HELP)
            .chain(self.commands.iter().map(|c| c.name()))
            .collect()
    }

    /// Names starting with `partial` (case-insensitive).
    pub fn completions(&self, partial: &str) -> Vec<String> {
        match complete(&self.command_names(), partial) {
            Completion::Unique(name) => vec![name],
            Completion::Ambiguous(names) => names,
            Completion::NoMatch => Vec::new(),
        }
    }

    /// Complete a whole input line against the vocabulary.
    pub fn complete(&self, input: &str) -> Completion {
        complete(&self.command_names(), input)
    }

    /// Resolve a line without side effects. `None` for a blank line.
    pub fn resolve(&self, line: &str, env: &Environment<'_>) -> Option<Resolution> {
        let parsed = parse_line(line)?;
        let env = Environment {
            profile: env.profile,
            raw_args: parsed.raw_args,
            download_busy: env.download_busy,
        };
        let result = self.dispatch(&parsed, &env);
        log::debug!(
            "Resolved '{}' ({} arg(s)): {}",
            parsed.base,
            parsed.args.len(),
            if result.is_ok() { "ok" } else { "error" }
        );
        Some(match result {
            Ok(output) => Resolution {
                base: parsed.base,
                block: output.block,
                is_error: false,
                effects: output.effects,
            },
            Err(e) => Resolution {
                base: parsed.base,
                block: OutputBlock::Text(e.to_string()),
                is_error: true,
                effects: Vec::new(),
            },
        })
    }

    fn dispatch(&self, parsed: &ParsedLine<'_>, env: &Environment<'_>) -> Result<CommandOutput> {
        if parsed.base == Self::HELP {
            return Ok(self.execute_help(&parsed.args));
        }
        match self.index.get(parsed.base.as_str()) {
            Some(&i) => self.commands[i].execute(&parsed.args, env),
            None => Err(RetroError::NotFound(format!(
                "Command not found: {}. Type 'help' for available commands.",
                parsed.base
            ))),
        }
    }

    /// Built-in help. Never fails: an unknown topic falls back to the
    /// full listing.
    fn execute_help(&self, args: &[&str]) -> CommandOutput {
        if let Some(topic) = args.first() {
            if let Some(&i) = self.index.get(topic.to_lowercase().as_str()) {
                let cmd = &self.commands[i];
                return CommandOutput::text(format!(
                    "{} ({})\n  {}\n  Usage: {}",
                    cmd.name(),
                    cmd.category(),
                    cmd.description(),
                    cmd.usage()
                ));
            }
        }
        let mut out = String::from("Available commands:\n\n");
        for cmd in &self.commands {
            out.push_str(&format!("  {:<12}- {}\n", cmd.usage(), cmd.description()));
        }
        out.push_str("\nType any command to get started!");
        CommandOutput::text(out)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
