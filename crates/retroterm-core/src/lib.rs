//! RETROTERM session engine.
//!
//! Platform-agnostic core: a [`Session`] owns the boot animation, the command
//! interpreter, the glitch scheduler and the theme channel, all driven by one
//! virtual clock. Front ends translate their input into
//! [`KeyEvent`](retroterm_types::input::KeyEvent)s, call
//! [`Session::advance`] with elapsed time and draw whatever state they read.

// Re-exports from the component crates.
pub use retroterm_content as content;
pub use retroterm_platform as platform;
pub use retroterm_skin as skin;
pub use retroterm_terminal as terminal;
pub use retroterm_types::color;
pub use retroterm_types::error;
pub use retroterm_types::input;
pub use retroterm_types::rng;

pub mod boot;
pub mod config;
pub mod session;

/// Boot stages, state, script and sequencer.
pub use boot::{BootConfig, BootLine, BootSequencer, BootStage, BootState};
/// Session configuration tables.
pub use config::{RevealPoint, SessionConfig, SessionSettings};
/// The session and what it reports.
pub use session::{HINTS, KeyOutcome, Session, SessionDeps, Tick};
/// Load any config section from TOML.
pub use retroterm_types::config::TomlConfig;
