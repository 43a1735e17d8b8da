//! Boot sequencer.
//!
//! Drives the fixed `power-on -> system-check -> loading -> transition ->
//! fade-out -> complete` animation on the session clock. Entering `loading`
//! schedules one display event per script line; the later stages follow at
//! fixed offsets from the last line. A cursor-blink timer runs until the boot
//! completes.

use serde::{Deserialize, Serialize};

use retroterm_platform::TimerQueue;

/// Built-in boot script as `(text, delay_ms)` pairs.
const BUILTIN_SCRIPT: &[(&str, u64)] = &[
    ("BIOS Version 2.1.4 - Copyright (C) 1985-2024 RetroTech Corp.", 100),
    ("Memory Test: 640K OK", 200),
    ("Extended Memory: 15360K OK", 150),
    ("", 100),
    ("Detecting Hardware...", 300),
    ("  CPU: Intel 80486DX-33MHz", 150),
    ("  RAM: 16MB", 100),
    ("  VGA: Compatible Display Adapter", 150),
    ("  HDD: 540MB IDE Drive", 200),
    ("", 100),
    ("Loading Operating System...", 400),
    ("████████████████████████████████ 100%", 800),
    ("", 200),
    ("RetroOS v3.11 Ready", 300),
    ("Initializing Terminal Interface...", 500),
    ("", 200),
    ("Welcome to Portfolio Terminal", 300),
    ("", 200),
    ("Starting terminal session...", 400),
    ("Loading user interface...", 300),
    ("", 100),
    ("Terminal ready.", 200),
];

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Boot stages in the only order they can occur.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BootStage {
    PowerOn,
    SystemCheck,
    Loading,
    Transition,
    FadeOut,
    Complete,
}

impl BootStage {
    /// The stage after this one; `None` once complete.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PowerOn => Some(Self::SystemCheck),
            Self::SystemCheck => Some(Self::Loading),
            Self::Loading => Some(Self::Transition),
            Self::Transition => Some(Self::FadeOut),
            Self::FadeOut => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    /// Kebab-case name, as used in config and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::PowerOn => "power-on",
            Self::SystemCheck => "system-check",
            Self::Loading => "loading",
            Self::Transition => "transition",
            Self::FadeOut => "fade-out",
            Self::Complete => "complete",
        }
    }

    /// Whether this is the last stage.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl std::fmt::Display for BootStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Observable boot state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Booting {
        stage: BootStage,
        /// Index of the newest displayed line, `None` before the first.
        current_line: Option<usize>,
        cursor_visible: bool,
    },
    /// Terminal; the cursor is hidden and every line has been shown.
    Finished,
}

impl BootState {
    /// Stage this state belongs to; `Finished` reports `complete`.
    pub fn stage(&self) -> BootStage {
        match self {
            Self::Booting { stage, .. } => *stage,
            Self::Finished => BootStage::Complete,
        }
    }

    /// Whether the animation is still running.
    pub fn is_booting(&self) -> bool {
        matches!(self, Self::Booting { .. })
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// One line of the boot script, shown `delay_ms` after its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootLine {
    pub text: String,
    pub delay_ms: u64,
}

impl BootLine {
    /// Script line shown `delay_ms` after the previous one.
    pub fn new(text: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            text: text.into(),
            delay_ms,
        }
    }
}

/// `[boot]` configuration table.
///
/// The three `*_after_ms` offsets are measured from the last line's display
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    pub power_on_ms: u64,
    pub system_check_ms: u64,
    pub transition_after_ms: u64,
    pub fade_out_after_ms: u64,
    pub complete_after_ms: u64,
    pub cursor_blink_ms: u64,
    pub lines: Vec<BootLine>,
}

impl BootConfig {
    /// Offset of the last line from entering `loading`.
    pub fn script_duration_ms(&self) -> u64 {
        self.lines.iter().map(|l| l.delay_ms).sum()
    }

    /// Time from start to `complete` when nothing is skipped.
    pub fn total_duration_ms(&self) -> u64 {
        self.power_on_ms + self.system_check_ms + self.script_duration_ms() + self.complete_after_ms
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            power_on_ms: 1500,
            system_check_ms: 300,
            transition_after_ms: 500,
            fade_out_after_ms: 2000,
            complete_after_ms: 3000,
            cursor_blink_ms: 500,
            lines: BUILTIN_SCRIPT
                .iter()
                .map(|&(text, delay)| BootLine::new(text, delay))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BootEvent {
    /// Step to the next stage.
    Advance,
    /// Display script line `i`.
    Line(usize),
    Blink,
}

/// Drives the boot animation on its own timer queue.
#[derive(Debug)]
pub struct BootSequencer {
    config: BootConfig,
    stage: BootStage,
    shown: usize,
    cursor_visible: bool,
    timers: TimerQueue<BootEvent>,
    started: bool,
    torn_down: bool,
}

impl BootSequencer {
    /// Sequencer in `power-on`; nothing runs until [`start`](Self::start).
    pub fn new(config: BootConfig) -> Self {
        Self {
            config,
            stage: BootStage::PowerOn,
            shown: 0,
            cursor_visible: true,
            timers: TimerQueue::new(),
            started: false,
            torn_down: false,
        }
    }

    /// Enter `power-on` and start the cursor blink. Only the first call counts.
    pub fn start(&mut self, now_ms: u64) {
        if self.started || self.torn_down {
            return;
        }
        self.started = true;
        self.timers
            .schedule_at(now_ms + self.config.power_on_ms, BootEvent::Advance);
        if self.config.cursor_blink_ms > 0 {
            self.timers
                .schedule_at(now_ms + self.config.cursor_blink_ms, BootEvent::Blink);
        }
        log::info!(
            "Boot started: {} line(s), complete in {}ms",
            self.config.lines.len(),
            self.config.total_duration_ms()
        );
    }

    /// Fire every event due by `now_ms`. Returns the stages entered, in order.
    pub fn advance(&mut self, now_ms: u64) -> Vec<BootStage> {
        let mut entered = Vec::new();
        if self.torn_down {
            return entered;
        }
        while let Some((deadline, event)) = self.timers.pop_due(now_ms) {
            match event {
                BootEvent::Advance => {
                    if let Some(stage) = self.step(deadline) {
                        entered.push(stage);
                    }
                },
                BootEvent::Line(i) => {
                    self.shown = self.shown.max(i + 1);
                    log::debug!("Boot line {i} at {deadline}ms");
                },
                BootEvent::Blink => {
                    self.cursor_visible = !self.cursor_visible;
                    self.timers
                        .schedule_at(deadline + self.config.cursor_blink_ms, BootEvent::Blink);
                },
            }
        }
        entered
    }

    /// Jump to `complete`, showing every remaining line. Returns the stages
    /// passed through; empty if already complete.
    pub fn skip(&mut self) -> Vec<BootStage> {
        let mut entered = Vec::new();
        if self.torn_down || self.stage.is_terminal() {
            return entered;
        }
        let dropped = self.timers.cancel_all();
        self.shown = self.config.lines.len();
        while let Some(next) = self.stage.next() {
            self.stage = next;
            entered.push(next);
        }
        self.finish();
        log::info!("Boot skipped ({dropped} timer(s) dropped)");
        entered
    }

    /// Cancel every pending timer. Returns how many were dropped.
    pub fn teardown(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        self.torn_down = true;
        self.timers.cancel_all()
    }

    fn step(&mut self, at_ms: u64) -> Option<BootStage> {
        let next = self.stage.next()?;
        self.stage = next;
        log::info!("Boot stage -> {next} at {at_ms}ms");
        match next {
            BootStage::SystemCheck => {
                self.timers
                    .schedule_at(at_ms + self.config.system_check_ms, BootEvent::Advance);
            },
            BootStage::Loading => self.schedule_script(at_ms),
            BootStage::Complete => self.finish(),
            BootStage::PowerOn | BootStage::Transition | BootStage::FadeOut => {},
        }
        Some(next)
    }

    fn schedule_script(&mut self, loading_at: u64) {
        let mut offset = 0;
        for (i, line) in self.config.lines.iter().enumerate() {
            offset += line.delay_ms;
            self.timers.schedule_at(loading_at + offset, BootEvent::Line(i));
        }
        let last = loading_at + offset;
        for after in [
            self.config.transition_after_ms,
            self.config.fade_out_after_ms,
            self.config.complete_after_ms,
        ] {
            self.timers.schedule_at(last + after, BootEvent::Advance);
        }
    }

    fn finish(&mut self) {
        self.shown = self.config.lines.len();
        self.cursor_visible = false;
        self.timers.cancel_all();
    }

    // -- Accessors --

    /// Snapshot for display collaborators.
    pub fn state(&self) -> BootState {
        if self.stage.is_terminal() {
            BootState::Finished
        } else {
            BootState::Booting {
                stage: self.stage,
                current_line: self.shown.checked_sub(1),
                cursor_visible: self.cursor_visible,
            }
        }
    }

    /// Current stage.
    pub fn stage(&self) -> BootStage {
        self.stage
    }

    /// Lines displayed so far; always a prefix of the script.
    pub fn displayed_lines(&self) -> &[BootLine] {
        &self.config.lines[..self.shown]
    }

    /// Index of the newest displayed line. Once complete this is the script
    /// length, one past the last line.
    pub fn current_line(&self) -> Option<usize> {
        if self.stage.is_terminal() {
            Some(self.config.lines.len())
        } else {
            self.shown.checked_sub(1)
        }
    }

    /// Whether the blinking cursor is in its visible phase.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Whether `complete` has been reached.
    pub fn is_complete(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Whether [`start`](Self::start) has run.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Configuration the sequencer was built with.
    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Time of the next stage change, line or blink.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Number of scheduled timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
