//! A single terminal session.
//!
//! [`Session`] wires the boot sequencer, the interpreter, the glitch
//! scheduler and the theme channel to one virtual clock. The host feeds it
//! key events and elapsed time; everything else is derived.

use std::rc::Rc;

use retroterm_content::Profile;
use retroterm_platform::{ArtifactSink, LogArtifactSink, SoundNotifier, TimerQueue};
use retroterm_skin::{ActiveTheme, GlitchScheduler, GlitchState, Palette, Theme, ThemeChannel};
use retroterm_terminal::{DownloadUpdate, Interpreter, InterpreterDeps, Submission};
use retroterm_types::input::KeyEvent;
use retroterm_types::rng::{RandomSource, SimpleRng};

use crate::boot::{BootSequencer, BootStage};
use crate::config::{RevealPoint, SessionConfig};

/// Usage hints shown under the input line.
pub const HINTS: [&str; 3] = [
    "💡 Tip: Use Tab for auto-completion, ↑↓ for command history",
    "🚀 Try commands: whoami, skills, projects, theme, help",
    "🎨 Change themes: theme blue | theme amber | theme purple | theme red",
];

/// Host-provided collaborators.
pub struct SessionDeps {
    pub sound: SoundNotifier,
    pub sink: Box<dyn ArtifactSink>,
    pub glitch_rng: Box<dyn RandomSource>,
    pub download_rng: Box<dyn RandomSource>,
}

impl SessionDeps {
    /// No audio, artifacts only logged. Random sources derive from `seed`, or
    /// from the clock when `None`.
    pub fn silent(seed: Option<u64>) -> Self {
        let (glitch_rng, download_rng) = match seed {
            Some(seed) => (
                SimpleRng::new(seed),
                SimpleRng::new(seed.rotate_left(32) ^ 0xD1B5_4A32_D192_ED03),
            ),
            None => (SimpleRng::from_time(), SimpleRng::from_time()),
        };
        Self {
            sound: SoundNotifier::silent(),
            sink: Box::new(LogArtifactSink),
            glitch_rng: Box::new(glitch_rng),
            download_rng: Box::new(download_rng),
        }
    }
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Dropped: wrong phase, torn down, or nothing to do.
    Ignored,
    Handled,
    Submitted(Submission),
}

/// What changed while the clock advanced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tick {
    pub stages: Vec<BootStage>,
    pub downloads: Vec<DownloadUpdate>,
    /// The interpreter became visible during this advance.
    pub revealed: bool,
}

impl Tick {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty() && self.downloads.is_empty() && !self.revealed
    }
}

/// One visitor session: boot, interpreter, glitches and theme on one clock.
pub struct Session {
    clock_ms: u64,
    reveal: RevealPoint,
    typing_indicator_ms: u64,
    boot: BootSequencer,
    interpreter: Interpreter,
    glitch: GlitchScheduler,
    channel: Rc<ThemeChannel>,
    active_theme: ActiveTheme,
    typing_timer: TimerQueue<()>,
    typing: bool,
    started: bool,
    torn_down: bool,
}

impl Session {
    /// Assemble a session. Nothing runs until [`start`](Self::start).
    pub fn new(config: SessionConfig, profile: Profile, deps: SessionDeps) -> Self {
        let SessionConfig {
            boot,
            download,
            glitch,
            session,
        } = config;
        let channel = Rc::new(ThemeChannel::new(&session.channel_name));
        let active_theme = ActiveTheme::attach_with(&channel, session.initial_theme);
        let interpreter = Interpreter::new(
            profile,
            InterpreterDeps {
                channel: Rc::clone(&channel),
                sound: deps.sound,
                download,
                rng: deps.download_rng,
                sink: deps.sink,
            },
        );
        Self {
            clock_ms: 0,
            reveal: session.reveal,
            typing_indicator_ms: session.typing_indicator_ms,
            boot: BootSequencer::new(boot),
            interpreter,
            glitch: GlitchScheduler::new(glitch, deps.glitch_rng),
            channel,
            active_theme,
            typing_timer: TimerQueue::new(),
            typing: false,
            started: false,
            torn_down: false,
        }
    }

    /// Start the boot animation and the ambient glitch timers at time zero.
    pub fn start(&mut self) {
        if self.started || self.torn_down {
            return;
        }
        self.started = true;
        self.boot.start(self.clock_ms);
        self.glitch.start(self.clock_ms);
        log::info!(
            "Session started for '{}' (theme {} {}, reveal at {})",
            self.interpreter.profile().name,
            self.active_theme.current(),
            self.active_theme.palette().primary.to_hex(),
            self.reveal.stage()
        );
    }

    /// Move the clock forward by `dt_ms` and fire everything that came due.
    pub fn advance(&mut self, dt_ms: u64) -> Tick {
        let mut tick = Tick::default();
        if self.torn_down {
            return tick;
        }
        let was_interactive = self.is_interactive();
        self.clock_ms += dt_ms;
        let now = self.clock_ms;

        tick.stages = self.boot.advance(now);
        self.glitch.advance(now);
        tick.downloads = self.interpreter.advance(now);
        while self.typing_timer.pop_due(now).is_some() {
            self.typing = false;
        }

        tick.revealed = !was_interactive && self.is_interactive();
        if tick.revealed {
            log::info!("Interpreter revealed at {now}ms");
        }
        tick
    }

    /// Route one key. Before the reveal only Escape (skip) does anything.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if self.torn_down || !self.started {
            return KeyOutcome::Ignored;
        }
        if !self.is_interactive() {
            if key == KeyEvent::Escape && !self.boot.skip().is_empty() {
                return KeyOutcome::Handled;
            }
            return KeyOutcome::Ignored;
        }

        let now = self.clock_ms;
        match key {
            KeyEvent::Char(ch) => {
                self.interpreter.type_char(ch);
                self.glitch.on_keystroke(now);
            },
            KeyEvent::Backspace => {
                self.interpreter.backspace();
                self.glitch.on_keystroke(now);
            },
            KeyEvent::Enter => {
                let Some(submission) = self.interpreter.submit_input(now) else {
                    return KeyOutcome::Ignored;
                };
                self.glitch.on_command(now);
                self.raise_typing(now);
                return KeyOutcome::Submitted(submission);
            },
            KeyEvent::Up => self.interpreter.recall_previous(),
            KeyEvent::Down => self.interpreter.recall_next(),
            KeyEvent::Tab => {
                self.interpreter.complete();
            },
            KeyEvent::Escape => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    fn raise_typing(&mut self, now: u64) {
        self.typing_timer.cancel_all();
        if self.typing_indicator_ms == 0 {
            return;
        }
        self.typing = true;
        self.typing_timer
            .schedule_at(now + self.typing_indicator_ms, ());
    }

    /// Cancel every timer the session owns. Further keys and clock advances
    /// are ignored. Returns the number of cancelled timers.
    pub fn teardown(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        self.torn_down = true;
        self.typing = false;
        let cancelled = self.boot.teardown()
            + self.glitch.cancel_all()
            + self.interpreter.teardown()
            + self.typing_timer.cancel_all();
        log::info!(
            "Session torn down at {}ms ({cancelled} timer(s) cancelled)",
            self.clock_ms
        );
        cancelled
    }

    // -- Accessors --

    /// Whether the interpreter is visible and accepting keys.
    pub fn is_interactive(&self) -> bool {
        self.started && !self.torn_down && self.boot.stage() >= self.reveal.stage()
    }

    /// Whether the typing indicator is up after a submission.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Whether [`teardown`](Self::teardown) has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Session clock in milliseconds.
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Boot animation.
    pub fn boot(&self) -> &BootSequencer {
        &self.boot
    }

    /// Command interpreter.
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Current glitch flags.
    pub fn glitch_state(&self) -> GlitchState {
        self.glitch.state()
    }

    /// Theme last broadcast on the channel.
    pub fn theme(&self) -> Theme {
        self.active_theme.current()
    }

    /// Palette of the current theme.
    pub fn palette(&self) -> Palette {
        self.active_theme.palette()
    }

    /// Theme channel shared with the interpreter.
    pub fn channel(&self) -> &Rc<ThemeChannel> {
        &self.channel
    }

    /// Prompt prefix for the loaded profile.
    pub fn prompt(&self) -> String {
        self.interpreter.prompt()
    }

    /// Hint lines shown above the prompt.
    pub fn hints(&self) -> &'static [&'static str] {
        &HINTS
    }

    /// Earliest pending deadline across every component.
    pub fn next_deadline(&self) -> Option<u64> {
        [
            self.boot.next_deadline(),
            self.glitch.next_deadline(),
            self.interpreter.next_deadline(),
            self.typing_timer.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("clock_ms", &self.clock_ms)
            .field("stage", &self.boot.stage())
            .field("theme", &self.active_theme.current())
            .field("interpreter", &self.interpreter)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::{BootConfig, BootLine};
    use retroterm_content::builtin_profile;
    use retroterm_platform::{MemoryArtifactSink, RecordingSound, SoundCue};
    use retroterm_types::rng::SequenceRng;

    /// Boot with one 100ms line: loading at 1800, complete at 4900.
    fn quick_config() -> SessionConfig {
        SessionConfig {
            boot: BootConfig {
                lines: vec![BootLine::new("READY", 100)],
                ..BootConfig::default()
            },
            ..SessionConfig::default()
        }
    }

    const COMPLETE_AT: u64 = 1800 + 100 + 3000;

    struct Harness {
        session: Session,
        sound: RecordingSound,
        sink: MemoryArtifactSink,
    }

    fn harness_with(config: SessionConfig, glitch_roll: f32) -> Harness {
        let sound = RecordingSound::new();
        let sink = MemoryArtifactSink::new();
        let deps = SessionDeps {
            sound: SoundNotifier::new(Box::new(sound.clone())),
            sink: Box::new(sink.clone()),
            glitch_rng: Box::new(SequenceRng::constant(glitch_roll)),
            download_rng: Box::new(SequenceRng::constant(0.5)),
        };
        let mut session = Session::new(config, builtin_profile().unwrap(), deps);
        session.start();
        Harness {
            session,
            sound,
            sink,
        }
    }

    /// A booted session whose glitch trials never succeed.
    fn booted() -> Harness {
        let mut h = harness_with(quick_config(), 0.99);
        h.session.advance(COMPLETE_AT);
        assert!(h.session.is_interactive());
        h
    }

    fn type_line(session: &mut Session, line: &str) -> KeyOutcome {
        for ch in line.chars() {
            session.handle_key(KeyEvent::Char(ch));
        }
        session.handle_key(KeyEvent::Enter)
    }

    #[test]
    fn keys_are_ignored_while_booting() {
        let mut h = harness_with(quick_config(), 0.99);
        assert!(!h.session.is_interactive());
        assert_eq!(h.session.handle_key(KeyEvent::Char('a')), KeyOutcome::Ignored);
        assert_eq!(h.session.handle_key(KeyEvent::Enter), KeyOutcome::Ignored);
        assert_eq!(h.session.interpreter().input(), "");
        assert!(h.sound.played().is_empty());
    }

    #[test]
    fn reveal_happens_on_complete_by_default() {
        let mut h = harness_with(quick_config(), 0.99);
        let tick = h.session.advance(COMPLETE_AT - 1);
        assert!(!tick.revealed);
        let tick = h.session.advance(1);
        assert!(tick.revealed);
        assert_eq!(tick.stages, [BootStage::Complete]);
        assert!(h.session.is_interactive());
    }

    #[test]
    fn transition_reveal_opens_during_fade() {
        let mut config = quick_config();
        config.session.reveal = RevealPoint::Transition;
        let mut h = harness_with(config, 0.99);
        let tick = h.session.advance(1800 + 100 + 500);
        assert!(tick.revealed);
        assert_eq!(h.session.boot().stage(), BootStage::Transition);
        assert_eq!(h.session.handle_key(KeyEvent::Char('h')), KeyOutcome::Handled);
    }

    #[test]
    fn escape_skips_boot() {
        let mut h = harness_with(quick_config(), 0.99);
        h.session.advance(10);
        assert_eq!(h.session.handle_key(KeyEvent::Escape), KeyOutcome::Handled);
        assert!(h.session.boot().is_complete());
        assert!(h.session.is_interactive());
        assert_eq!(h.session.boot().displayed_lines().len(), 1);
        assert_eq!(h.session.handle_key(KeyEvent::Escape), KeyOutcome::Ignored);
    }

    #[test]
    fn enter_submits_and_raises_typing_indicator() {
        let mut h = booted();
        let outcome = type_line(&mut h.session, "whoami");
        match outcome {
            KeyOutcome::Submitted(sub) => {
                assert_eq!(sub.base, "whoami");
                assert!(!sub.is_error);
            },
            other => panic!("expected submission, got {other:?}"),
        }
        assert!(h.session.is_typing());
        h.session.advance(99);
        assert!(h.session.is_typing());
        h.session.advance(1);
        assert!(!h.session.is_typing());
        assert_eq!(h.session.interpreter().history().len(), 2);
    }

    #[test]
    fn blank_enter_is_ignored() {
        let mut h = booted();
        assert_eq!(type_line(&mut h.session, "   "), KeyOutcome::Ignored);
        assert!(!h.session.is_typing());
        assert_eq!(h.session.interpreter().input(), "   ");
    }

    #[test]
    fn typing_plays_keystroke_cues() {
        let mut h = booted();
        h.session.handle_key(KeyEvent::Char('l'));
        h.session.handle_key(KeyEvent::Backspace);
        assert_eq!(h.sound.played(), [SoundCue::Keystroke, SoundCue::Keystroke]);
    }

    #[test]
    fn theme_command_reaches_the_palette() {
        let mut h = booted();
        assert_eq!(h.session.theme(), Theme::Green);
        type_line(&mut h.session, "theme amber");
        assert_eq!(h.session.theme(), Theme::Amber);
        assert_eq!(h.session.palette(), Theme::Amber.palette());
    }

    #[test]
    fn initial_theme_comes_from_config() {
        let mut config = quick_config();
        config.session.initial_theme = Theme::Red;
        let h = harness_with(config, 0.99);
        assert_eq!(h.session.theme(), Theme::Red);
    }

    #[test]
    fn recall_and_completion_edit_the_input() {
        let mut h = booted();
        type_line(&mut h.session, "skills");
        h.session.handle_key(KeyEvent::Up);
        assert_eq!(h.session.interpreter().input(), "skills");
        h.session.handle_key(KeyEvent::Down);
        assert_eq!(h.session.interpreter().input(), "");
        h.session.handle_key(KeyEvent::Char('w'));
        h.session.handle_key(KeyEvent::Char('h'));
        h.session.handle_key(KeyEvent::Tab);
        assert_eq!(h.session.interpreter().input(), "whoami");
    }

    #[test]
    fn resume_download_runs_on_the_session_clock() {
        let mut h = booted();
        type_line(&mut h.session, "resume");
        let mut updates = Vec::new();
        for _ in 0..50 {
            updates.extend(h.session.advance(100).downloads);
        }
        assert_eq!(updates.first(), Some(&DownloadUpdate::Started));
        assert!(matches!(updates.last(), Some(DownloadUpdate::Completed(_))));
        assert_eq!(h.sink.count(), 1);
        assert!(!h.session.interpreter().download_state().active);
    }

    #[test]
    fn keystroke_glitch_pulses_flicker() {
        let mut h = harness_with(quick_config(), 0.0);
        h.session.handle_key(KeyEvent::Escape);
        h.session.handle_key(KeyEvent::Char('x'));
        assert!(h.session.glitch_state().flickering);
    }

    #[test]
    fn disabled_glitch_never_pulses() {
        let mut config = quick_config();
        config.glitch.enabled = false;
        let mut h = harness_with(config, 0.0);
        h.session.advance(60_000);
        h.session.handle_key(KeyEvent::Char('x'));
        assert!(!h.session.glitch_state().any());
    }

    #[test]
    fn teardown_stops_everything() {
        let mut h = booted();
        type_line(&mut h.session, "resume");
        assert!(h.session.teardown() > 0);
        assert!(h.session.is_torn_down());
        assert_eq!(h.session.next_deadline(), None);
        assert!(h.session.advance(10_000).is_empty());
        assert_eq!(h.session.handle_key(KeyEvent::Char('a')), KeyOutcome::Ignored);
        assert_eq!(h.sink.count(), 0);
        assert_eq!(h.session.teardown(), 0);
    }

    #[test]
    fn next_deadline_tracks_boot_before_reveal() {
        let h = harness_with(quick_config(), 0.99);
        assert_eq!(h.session.next_deadline(), Some(500));
    }

    #[test]
    fn silent_deps_are_reproducible() {
        let mut a = SessionDeps::silent(Some(9));
        let mut b = SessionDeps::silent(Some(9));
        assert_eq!(a.glitch_rng.next_f32(), b.glitch_rng.next_f32());
        assert_eq!(a.download_rng.next_f32(), b.download_rng.next_f32());
    }

    #[test]
    fn hints_are_three_lines() {
        let h = booted();
        assert_eq!(h.session.hints().len(), 3);
        assert!(h.session.hints()[2].contains("theme amber"));
    }
}
