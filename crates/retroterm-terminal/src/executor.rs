//! Interpreter: owns the session's command state and runs declared effects.
//!
//! The [`Interpreter`] is the single writer of the history log, the input
//! line, the recall cursor and the download state. Each submission resolves
//! through the registry, applies the resolution's effects, appends a record
//! (unless the history was cleared) and emits exactly one sound cue.

use std::rc::Rc;

use retroterm_content::Profile;
use retroterm_platform::{ArtifactSink, SoundCue, SoundNotifier};
use retroterm_skin::ThemeChannel;
use retroterm_types::rng::RandomSource;

use crate::commands::{register_builtins, welcome_banner};
use crate::completion::Completion;
use crate::download::{DownloadConfig, DownloadSimulator, DownloadState, DownloadUpdate};
use crate::history::{CommandRecord, HistoryNavigator, Recall, SessionHistory};
use crate::input_line::InputLine;
use crate::interpreter::{CommandRegistry, Effect, Environment, Resolution};

/// Input recorded for the welcome banner.
pub const BANNER_INPUT: &str = "init";

/// What a non-blank submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Lowercased keyword.
    pub base: String,
    pub is_error: bool,
    /// The one cue played for this submission.
    pub cue: SoundCue,
    /// Whether a record was appended.
    pub recorded: bool,
}

/// Collaborators an [`Interpreter`] is built from.
pub struct InterpreterDeps {
    pub channel: Rc<ThemeChannel>,
    pub sound: SoundNotifier,
    pub download: DownloadConfig,
    pub rng: Box<dyn RandomSource>,
    pub sink: Box<dyn ArtifactSink>,
}

/// Runs submissions and owns all mutable command state.
pub struct Interpreter {
    registry: CommandRegistry,
    profile: Profile,
    history: SessionHistory,
    navigator: HistoryNavigator,
    input: InputLine,
    download: DownloadSimulator,
    channel: Rc<ThemeChannel>,
    sound: SoundNotifier,
    torn_down: bool,
}

impl Interpreter {
    /// Build an interpreter with every built-in command and the welcome
    /// banner as its first record.
    pub fn new(profile: Profile, deps: InterpreterDeps) -> Self {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        Self::with_registry(registry, profile, deps)
    }

    /// Build an interpreter around a caller-assembled registry.
    pub fn with_registry(registry: CommandRegistry, profile: Profile, deps: InterpreterDeps) -> Self {
        let download = DownloadSimulator::new(
            deps.download,
            deps.rng,
            deps.sink,
            profile.resume_file_name(),
        );
        let mut history = SessionHistory::new();
        history.push(CommandRecord::banner(BANNER_INPUT, welcome_banner(&profile), 0));
        log::info!(
            "Interpreter ready for '{}' with {} command(s)",
            profile.name,
            registry.len() + 1
        );
        Self {
            registry,
            profile,
            history,
            navigator: HistoryNavigator::new(),
            input: InputLine::new(),
            download,
            channel: deps.channel,
            sound: deps.sound,
            torn_down: false,
        }
    }

    // -- Submission --

    /// Submit a line. Blank lines are ignored and return `None`.
    pub fn submit(&mut self, line: &str, now_ms: u64) -> Option<Submission> {
        if self.torn_down {
            return None;
        }
        let env = Environment {
            profile: &self.profile,
            raw_args: "",
            download_busy: self.download.is_busy(),
        };
        let resolution = self.registry.resolve(line, &env)?;
        self.apply_effects(&resolution, now_ms);

        let cue = cue_for(&resolution);
        let recorded = !resolution.has_effect(Effect::ClearHistory);
        if recorded {
            self.history.push(CommandRecord::command(
                line.trim(),
                resolution.block,
                resolution.is_error,
                now_ms,
            ));
        }
        self.navigator.reset();
        self.sound.notify(cue);

        Some(Submission {
            base: resolution.base,
            is_error: resolution.is_error,
            cue,
            recorded,
        })
    }

    /// Submit the current input line. A blank line is left as typed.
    pub fn submit_input(&mut self, now_ms: u64) -> Option<Submission> {
        if self.torn_down || self.input.is_blank() {
            return None;
        }
        let line = self.input.take();
        self.submit(&line, now_ms)
    }

    fn apply_effects(&mut self, resolution: &Resolution, now_ms: u64) {
        for effect in &resolution.effects {
            match effect {
                Effect::BroadcastTheme(theme) => {
                    self.channel.broadcast(*theme);
                },
                Effect::StartDownload => {
                    if let Err(e) = self.download.request_start(now_ms) {
                        log::warn!("Download not started: {e}");
                    }
                },
                Effect::ClearHistory => {
                    self.history.clear();
                    log::debug!("History cleared at {now_ms}ms");
                },
            }
        }
    }

    // -- Input line editing --

    /// Append a character to the input line.
    pub fn type_char(&mut self, ch: char) {
        if self.torn_down {
            return;
        }
        self.input.push(ch);
        self.sound.notify(SoundCue::Keystroke);
    }

    /// Delete the last character of the input line.
    pub fn backspace(&mut self) {
        if self.torn_down {
            return;
        }
        self.input.backspace();
        self.sound.notify(SoundCue::Keystroke);
    }

    /// Replace the input line with an older entry.
    pub fn recall_previous(&mut self) {
        if self.torn_down {
            return;
        }
        let recall = self.navigator.previous(&self.history);
        self.apply_recall(recall);
    }

    /// Replace the input line with a newer entry, or empty it.
    pub fn recall_next(&mut self) {
        if self.torn_down {
            return;
        }
        let recall = self.navigator.next(&self.history);
        self.apply_recall(recall);
    }

    fn apply_recall(&mut self, recall: Recall) {
        if let Recall::Replace(text) = recall {
            self.input.set(&text);
        }
    }

    /// Complete the input line; only a unique match changes it.
    pub fn complete(&mut self) -> Completion {
        let completion = self.registry.complete(self.input.as_str());
        if self.torn_down {
            return completion;
        }
        if let Some(name) = completion.replacement() {
            self.input.set(name);
        }
        completion
    }

    // -- Clock --

    /// Drive the download simulator to `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> Vec<DownloadUpdate> {
        if self.torn_down {
            return Vec::new();
        }
        self.download.advance(now_ms)
    }

    /// Cancel the download's timers and refuse further input. Returns the
    /// number of cancelled timers.
    pub fn teardown(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        self.torn_down = true;
        self.download.cancel_all()
    }

    // -- Accessors --

    /// History log, banner first.
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Current input line.
    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    /// Recall cursor, `None` when nothing is selected.
    pub fn recall_cursor(&self) -> Option<usize> {
        self.navigator.cursor()
    }

    /// Download state.
    pub fn download_state(&self) -> DownloadState {
        self.download.state()
    }

    /// Download simulator.
    pub fn download(&self) -> &DownloadSimulator {
        &self.download
    }

    /// Loaded profile.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Command registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Prompt prefix, e.g. `ada@portfolio:~`.
    pub fn prompt(&self) -> String {
        self.profile.prompt()
    }

    /// Theme channel effects are broadcast on.
    pub fn channel(&self) -> &Rc<ThemeChannel> {
        &self.channel
    }

    /// Time of the next download event.
    pub fn next_deadline(&self) -> Option<u64> {
        self.download.next_deadline()
    }

    /// Whether [`teardown`](Self::teardown) has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("profile", &self.profile.name)
            .field("records", &self.history.len())
            .field("input", &self.input.as_str())
            .field("download", &self.download)
            .finish_non_exhaustive()
    }
}

/// The single cue for a resolution.
fn cue_for(resolution: &Resolution) -> SoundCue {
    if resolution.is_error {
        SoundCue::CommandError
    } else if resolution.has_effect(Effect::StartDownload) {
        SoundCue::Modem
    } else if resolution.has_effect(Effect::ClearHistory) {
        SoundCue::Static
    } else {
        SoundCue::CommandSuccess
    }
}
