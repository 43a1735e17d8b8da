//! RETROTERM terminal entry point.
//!
//! Plays the boot animation, then runs the portfolio interpreter on stdin and
//! stdout. From a terminal, keys are read in raw mode: Up/Down recall, Tab
//! completes, Escape skips the boot, Ctrl-C quits. Piped input is read a
//! line at a time, with `:up`, `:down`, `wh:tab`, `:skip` and `:quit`
//! standing in for the special keys.
//!
//! Config path comes from the first argument or `RETROTERM_CONFIG`, the
//! profile from `RETROTERM_PROFILE`. Set `RETROTERM_BELL` to ring the
//! terminal bell on errors and special cues.

mod input;
mod render;
mod sound;

use std::collections::VecDeque;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use input::{InputMessage, KeySource};
use render::{Echo, Renderer};
use retroterm_core::content::resolve_profile;
use retroterm_core::input::KeyEvent;
use retroterm_core::platform::SoundNotifier;
use retroterm_core::{KeyOutcome, Session, SessionConfig, SessionDeps, TomlConfig};
use sound::BellSound;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    // Interactive sessions share stderr with the screen; keep it quiet.
    let default_filter = if io::stdin().is_terminal() {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RETROTERM_CONFIG").ok())
        .map(PathBuf::from);
    let config = match &config_path {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    config.validate().context("invalid session config")?;
    let profile_path = std::env::var_os("RETROTERM_PROFILE").map(PathBuf::from);
    let profile = resolve_profile(profile_path.as_deref())?;
    log::info!(
        "Starting RETROTERM for '{}' ({} boot line(s))",
        profile.name,
        config.boot.lines.len()
    );

    let mut deps = SessionDeps::silent(config.session.seed);
    if std::env::var_os("RETROTERM_BELL").is_some() {
        deps.sound = SoundNotifier::new(Box::new(BellSound::new(io::stderr())));
    }
    let mut session = Session::new(config, profile, deps);

    let mut keys = KeySource::open().context("opening the keyboard")?;
    let echo = if keys.is_keyboard() {
        Echo::Live
    } else {
        Echo::Submitted
    };
    let stdout = io::stdout();
    let mut renderer = Renderer::new(stdout.lock(), echo);

    let started = Instant::now();
    session.start();

    // Keys typed during the boot wait for the reveal; only skip goes through.
    let mut pending: VecDeque<KeyEvent> = VecDeque::new();
    let mut eof = false;

    'running: loop {
        for message in keys.drain()? {
            match message {
                InputMessage::Keys(batch) => pending.extend(batch),
                InputMessage::Quit => break 'running,
                InputMessage::Eof => eof = true,
            }
        }

        if !session.is_interactive() && pending.contains(&KeyEvent::Escape) {
            pending.retain(|&key| key != KeyEvent::Escape);
            session.handle_key(KeyEvent::Escape);
        }
        if session.is_interactive() {
            for key in pending.drain(..) {
                if let KeyOutcome::Submitted(submission) = session.handle_key(key) {
                    renderer.on_submission(&submission);
                }
            }
        }

        let elapsed = started.elapsed().as_millis() as u64;
        let tick = session.advance(elapsed.saturating_sub(session.clock_ms()));
        renderer.draw(&session, &tick)?;

        let settled = session.is_interactive()
            && !session.is_typing()
            && !session.interpreter().download().is_busy();
        if eof && pending.is_empty() && settled {
            break;
        }
        std::thread::sleep(FRAME);
    }

    let cancelled = session.teardown();
    renderer.finish()?;
    drop(keys);
    log::info!("RETROTERM shut down cleanly ({cancelled} timer(s) cancelled)");
    Ok(())
}
