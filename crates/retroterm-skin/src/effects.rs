//! Ambient CRT glitch effects.
//!
//! The [`GlitchScheduler`] owns four self-clearing boolean flags and a set of
//! periodic Bernoulli trials that pulse them. Display collaborators only read
//! the resulting [`GlitchState`]; how a flag looks on screen is up to them.
//!
//! A pulse sets a flag and schedules its clear. Overlapping pulses of the
//! same flag extend it: the flag drops only when its latest pulse expires.

use serde::{Deserialize, Serialize};

use retroterm_platform::TimerQueue;
use retroterm_types::rng::RandomSource;

/// One of the independent glitch flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlitchFlag {
    /// Whole-frame displacement.
    Glitching,
    /// Brightness flicker.
    Flickering,
    /// Character corruption on text.
    TextGlitch,
    /// Horizontal line tearing.
    LineGlitch,
}

impl GlitchFlag {
    pub const ALL: [GlitchFlag; 4] = [
        GlitchFlag::Glitching,
        GlitchFlag::Flickering,
        GlitchFlag::TextGlitch,
        GlitchFlag::LineGlitch,
    ];

    fn index(self) -> usize {
        match self {
            Self::Glitching => 0,
            Self::Flickering => 1,
            Self::TextGlitch => 2,
            Self::LineGlitch => 3,
        }
    }
}

/// Snapshot of the glitch flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlitchState {
    pub glitching: bool,
    pub flickering: bool,
    pub text_glitch: bool,
    pub line_glitch: bool,
}

impl GlitchState {
    /// Whether `flag` is raised.
    pub fn is_set(&self, flag: GlitchFlag) -> bool {
        match flag {
            GlitchFlag::Glitching => self.glitching,
            GlitchFlag::Flickering => self.flickering,
            GlitchFlag::TextGlitch => self.text_glitch,
            GlitchFlag::LineGlitch => self.line_glitch,
        }
    }

    /// Whether any flag is raised.
    pub fn any(&self) -> bool {
        self.glitching || self.flickering || self.text_glitch || self.line_glitch
    }

    fn set(&mut self, flag: GlitchFlag, on: bool) {
        match flag {
            GlitchFlag::Glitching => self.glitching = on,
            GlitchFlag::Flickering => self.flickering = on,
            GlitchFlag::TextGlitch => self.text_glitch = on,
            GlitchFlag::LineGlitch => self.line_glitch = on,
        }
    }
}

/// What a successful trial pulses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseSpec {
    /// Flag to raise; `None` picks one of the four at random.
    #[serde(default)]
    pub flag: Option<GlitchFlag>,
    pub min_ms: u64,
    /// Exclusive upper bound; a value `<= min_ms` means a fixed duration.
    pub max_ms: u64,
}

impl PulseSpec {
    /// Always raise `flag` for exactly `ms`.
    pub const fn fixed(flag: GlitchFlag, ms: u64) -> Self {
        Self {
            flag: Some(flag),
            min_ms: ms,
            max_ms: ms,
        }
    }

    /// Raise a random flag for `min_ms..max_ms`.
    pub const fn random(min_ms: u64, max_ms: u64) -> Self {
        Self {
            flag: None,
            min_ms,
            max_ms,
        }
    }
}

/// A periodic Bernoulli trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientTimer {
    pub period_ms: u64,
    pub probability: f32,
    pub pulse: PulseSpec,
}

/// One step of the rare cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CascadeStep {
    pub offset_ms: u64,
    pub flag: GlitchFlag,
    pub duration_ms: u64,
}

/// `[glitch]` configuration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlitchConfig {
    pub enabled: bool,
    pub ambient: Vec<AmbientTimer>,
    pub cascade_period_ms: u64,
    pub cascade_probability: f32,
    pub cascade: Vec<CascadeStep>,
    pub command_probability: f32,
    pub command_pulse: PulseSpec,
    pub keystroke_probability: f32,
    pub keystroke_pulse: PulseSpec,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ambient: vec![
                AmbientTimer {
                    period_ms: 1000,
                    probability: 0.08,
                    pulse: PulseSpec::random(50, 200),
                },
                AmbientTimer {
                    period_ms: 2000,
                    probability: 0.03,
                    pulse: PulseSpec::fixed(GlitchFlag::Flickering, 30),
                },
                AmbientTimer {
                    period_ms: 3000,
                    probability: 0.02,
                    pulse: PulseSpec {
                        flag: Some(GlitchFlag::LineGlitch),
                        min_ms: 40,
                        max_ms: 120,
                    },
                },
            ],
            cascade_period_ms: 5000,
            cascade_probability: 0.005,
            cascade: vec![
                CascadeStep {
                    offset_ms: 0,
                    flag: GlitchFlag::Glitching,
                    duration_ms: 80,
                },
                CascadeStep {
                    offset_ms: 50,
                    flag: GlitchFlag::TextGlitch,
                    duration_ms: 120,
                },
                CascadeStep {
                    offset_ms: 100,
                    flag: GlitchFlag::LineGlitch,
                    duration_ms: 100,
                },
                CascadeStep {
                    offset_ms: 150,
                    flag: GlitchFlag::Flickering,
                    duration_ms: 60,
                },
            ],
            command_probability: 0.15,
            command_pulse: PulseSpec::random(50, 200),
            keystroke_probability: 0.02,
            keystroke_pulse: PulseSpec::fixed(GlitchFlag::Flickering, 50),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GlitchEvent {
    /// Trial of `config.ambient[i]`.
    Ambient(usize),
    /// Trial of the cascade.
    Cascade,
    /// Raise a flag for a fixed duration.
    Raise(GlitchFlag, u64),
    /// Drop a flag unless a later pulse extended it.
    Clear(GlitchFlag),
}

/// Randomized pulse scheduler for the glitch flags.
pub struct GlitchScheduler {
    config: GlitchConfig,
    rng: Box<dyn RandomSource>,
    timers: TimerQueue<GlitchEvent>,
    state: GlitchState,
    clear_at: [u64; 4],
    running: bool,
    pulses: u64,
}

impl GlitchScheduler {
    /// Idle scheduler; trials begin at [`start`](Self::start).
    pub fn new(config: GlitchConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            rng,
            timers: TimerQueue::new(),
            state: GlitchState::default(),
            clear_at: [0; 4],
            running: false,
            pulses: 0,
        }
    }

    /// Arm the periodic trials, first firing one period after `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        if self.running || !self.config.enabled {
            return;
        }
        self.running = true;
        for (i, timer) in self.config.ambient.iter().enumerate() {
            if timer.period_ms > 0 {
                self.timers
                    .schedule_at(now_ms + timer.period_ms, GlitchEvent::Ambient(i));
            }
        }
        if self.config.cascade_period_ms > 0 {
            self.timers
                .schedule_at(now_ms + self.config.cascade_period_ms, GlitchEvent::Cascade);
        }
        log::debug!(
            "Glitch scheduler started with {} ambient timer(s)",
            self.config.ambient.len()
        );
    }

    /// Fire every trial and clear due at or before `now_ms`.
    pub fn advance(&mut self, now_ms: u64) {
        while let Some((at, event)) = self.timers.pop_due(now_ms) {
            self.fire(at, event);
        }
    }

    /// Interaction trial after a submitted command.
    pub fn on_command(&mut self, now_ms: u64) {
        if !self.running {
            return;
        }
        if self.rng.chance(self.config.command_probability) {
            let spec = self.config.command_pulse;
            self.pulse_spec(now_ms, spec);
        }
    }

    /// Interaction trial after a keystroke.
    pub fn on_keystroke(&mut self, now_ms: u64) {
        if !self.running {
            return;
        }
        if self.rng.chance(self.config.keystroke_probability) {
            let spec = self.config.keystroke_pulse;
            self.pulse_spec(now_ms, spec);
        }
    }

    /// Raise `flag` for `duration_ms` starting at `now_ms`.
    pub fn pulse(&mut self, now_ms: u64, flag: GlitchFlag, duration_ms: u64) {
        let until = now_ms + duration_ms;
        let slot = &mut self.clear_at[flag.index()];
        *slot = (*slot).max(until);
        self.state.set(flag, true);
        self.timers.schedule_at(until, GlitchEvent::Clear(flag));
        self.pulses += 1;
    }

    /// Current flags.
    pub fn state(&self) -> GlitchState {
        self.state
    }

    /// Whether the periodic trials are armed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pulses raised since construction.
    pub fn pulse_count(&self) -> u64 {
        self.pulses
    }

    /// Deadline of the next pending trial or clear.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Stop every trial and drop all flags. Returns cancelled timer count.
    pub fn cancel_all(&mut self) -> usize {
        self.running = false;
        self.state = GlitchState::default();
        self.clear_at = [0; 4];
        self.timers.cancel_all()
    }

    fn fire(&mut self, at: u64, event: GlitchEvent) {
        match event {
            GlitchEvent::Ambient(i) => {
                let Some(timer) = self.config.ambient.get(i).copied() else {
                    return;
                };
                self.timers
                    .schedule_at(at + timer.period_ms, GlitchEvent::Ambient(i));
                if self.rng.chance(timer.probability) {
                    self.pulse_spec(at, timer.pulse);
                }
            },
            GlitchEvent::Cascade => {
                self.timers
                    .schedule_at(at + self.config.cascade_period_ms, GlitchEvent::Cascade);
                if self.rng.chance(self.config.cascade_probability) {
                    log::debug!("Glitch cascade at {at}ms");
                    for step in &self.config.cascade {
                        self.timers.schedule_at(
                            at + step.offset_ms,
                            GlitchEvent::Raise(step.flag, step.duration_ms),
                        );
                    }
                }
            },
            GlitchEvent::Raise(flag, duration) => self.pulse(at, flag, duration),
            GlitchEvent::Clear(flag) => {
                if at >= self.clear_at[flag.index()] {
                    self.state.set(flag, false);
                }
            },
        }
    }

    fn pulse_spec(&mut self, now_ms: u64, spec: PulseSpec) {
        let flag = match spec.flag {
            Some(flag) => flag,
            None => GlitchFlag::ALL[self.rng.pick(GlitchFlag::ALL.len())],
        };
        let duration = if spec.max_ms > spec.min_ms {
            self.rng.range_f32(spec.min_ms as f32, spec.max_ms as f32) as u64
        } else {
            spec.min_ms
        };
        self.pulse(now_ms, flag, duration);
    }
}

impl std::fmt::Debug for GlitchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlitchScheduler")
            .field("state", &self.state)
            .field("running", &self.running)
            .field("pending", &self.timers.len())
            .finish_non_exhaustive()
    }
}
