//! Simulated resume download.
//!
//! `resume` hands off to a [`DownloadSimulator`]: after a short delay the run
//! becomes active and ticks a random increment onto its progress until it
//! reaches 100, at which point the artifact is handed to the sink exactly
//! once. Only one run may be pending or active at a time.

use serde::{Deserialize, Serialize};

use retroterm_platform::{Artifact, ArtifactSink, TimerQueue};
use retroterm_types::error::{Result, RetroError};
use retroterm_types::rng::RandomSource;

/// Width of the rendered progress bar, in cells.
pub const PROGRESS_BAR_WIDTH: usize = 50;

/// `[download]` configuration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Delay between `resume` and the first active state.
    pub start_delay_ms: u64,
    pub tick_ms: u64,
    /// Inclusive lower bound of a tick's increment.
    pub min_increment: f32,
    /// Exclusive upper bound of a tick's increment.
    pub max_increment: f32,
    pub mime_type: String,
    pub contents: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 500,
            tick_ms: 200,
            min_increment: 5.0,
            max_increment: 20.0,
            mime_type: "text/plain".into(),
            contents: "This would be the actual resume PDF content".into(),
        }
    }
}

impl DownloadConfig {
    /// Reject settings under which a run could stall or never finish.
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(RetroError::Config("download tick_ms must be positive".into()));
        }
        if self.min_increment.is_nan() || self.min_increment <= 0.0 {
            return Err(RetroError::Config(format!(
                "download min_increment must be positive, got {}",
                self.min_increment
            )));
        }
        if self.max_increment.is_nan() || self.max_increment < self.min_increment {
            return Err(RetroError::Config(format!(
                "download max_increment {} is below min_increment {}",
                self.max_increment, self.min_increment
            )));
        }
        Ok(())
    }
}

/// Observable download state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DownloadState {
    pub active: bool,
    /// Percent complete, `0.0..=100.0`.
    pub progress: f32,
}

/// Something that happened while advancing the clock.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadUpdate {
    Started,
    Progress(f32),
    /// The artifact with this file name was handed to the sink.
    Completed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DownloadEvent {
    Begin,
    Tick,
}

/// Simulated download of the resume artifact.
pub struct DownloadSimulator {
    config: DownloadConfig,
    rng: Box<dyn RandomSource>,
    sink: Box<dyn ArtifactSink>,
    file_name: String,
    timers: TimerQueue<DownloadEvent>,
    state: DownloadState,
    pending: bool,
    ticks: u32,
    completed: u32,
}

impl DownloadSimulator {
    /// Idle simulator that saves `file_name` to `sink` when a run completes.
    pub fn new(
        config: DownloadConfig,
        rng: Box<dyn RandomSource>,
        sink: Box<dyn ArtifactSink>,
        file_name: String,
    ) -> Self {
        Self {
            config,
            rng,
            sink,
            file_name,
            timers: TimerQueue::new(),
            state: DownloadState::default(),
            pending: false,
            ticks: 0,
            completed: 0,
        }
    }

    /// Schedule a run to begin `start_delay_ms` after `now_ms`.
    ///
    /// Refused with [`RetroError::Busy`] while another run is pending or
    /// active.
    pub fn request_start(&mut self, now_ms: u64) -> Result<()> {
        if self.is_busy() {
            return Err(RetroError::Busy("download already in progress".into()));
        }
        self.pending = true;
        self.timers
            .schedule_at(now_ms + self.config.start_delay_ms, DownloadEvent::Begin);
        log::debug!("Download requested at {now_ms}ms");
        Ok(())
    }

    /// Fire every event due at or before `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> Vec<DownloadUpdate> {
        let mut updates = Vec::new();
        while let Some((at, event)) = self.timers.pop_due(now_ms) {
            match event {
                DownloadEvent::Begin => {
                    self.pending = false;
                    self.state = DownloadState {
                        active: true,
                        progress: 0.0,
                    };
                    self.ticks = 0;
                    self.timers
                        .schedule_at(at + self.config.tick_ms.max(1), DownloadEvent::Tick);
                    log::info!("Download of {} started", self.file_name);
                    updates.push(DownloadUpdate::Started);
                },
                DownloadEvent::Tick => updates.push(self.tick(at)),
            }
        }
        updates
    }

    fn tick(&mut self, at: u64) -> DownloadUpdate {
        self.ticks += 1;
        let step = self
            .rng
            .range_f32(self.config.min_increment, self.config.max_increment)
            .max(0.0);
        let progress = self.state.progress + step;
        if progress < 100.0 {
            self.state.progress = progress;
            self.timers
                .schedule_at(at + self.config.tick_ms.max(1), DownloadEvent::Tick);
            return DownloadUpdate::Progress(progress);
        }

        self.state = DownloadState {
            active: false,
            progress: 100.0,
        };
        self.completed += 1;
        let artifact = Artifact {
            file_name: self.file_name.clone(),
            mime_type: self.config.mime_type.clone(),
            contents: self.config.contents.clone().into_bytes(),
        };
        if let Err(e) = self.sink.save(&artifact) {
            log::warn!("Saving {} failed: {e}", artifact.file_name);
        }
        log::info!("Download of {} finished after {} tick(s)", self.file_name, self.ticks);
        DownloadUpdate::Completed(artifact.file_name)
    }

    /// Current state; `progress` stays 100 after a run until the next starts.
    pub fn state(&self) -> DownloadState {
        self.state
    }

    /// Whether a run is waiting to begin.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether a run is pending or active.
    pub fn is_busy(&self) -> bool {
        self.pending || self.state.active
    }

    /// Ticks taken by the current or most recent run.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Number of runs that reached 100%.
    pub fn completed_runs(&self) -> u32 {
        self.completed
    }

    /// Name of the artifact a run saves.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Time of the next begin or tick.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Abandon any pending or active run. Returns cancelled timer count.
    pub fn cancel_all(&mut self) -> usize {
        self.pending = false;
        self.state.active = false;
        self.timers.cancel_all()
    }
}

impl std::fmt::Debug for DownloadSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadSimulator")
            .field("file_name", &self.file_name)
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

/// Label shown above the progress bar.
pub fn progress_label(progress: f32) -> String {
    format!("Downloading resume: {:.1}%", progress.clamp(0.0, 100.0))
}

/// Filled and empty cells of the progress bar, without brackets.
pub fn progress_bar(progress: f32) -> String {
    let clamped = progress.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0 * PROGRESS_BAR_WIDTH as f32) as usize).min(PROGRESS_BAR_WIDTH);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}
