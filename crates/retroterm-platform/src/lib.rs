//! Platform service abstractions for RETROTERM.
//!
//! Everything the session engine needs from its host lives behind a small
//! seam here: the virtual-clock [`TimerQueue`] that replaces wall-clock
//! callback scheduling, the [`SoundNotifier`] boundary that keeps
//! audio failures away from the interpreter, and the [`ArtifactSink`] that
//! receives simulated downloads.

pub mod artifact;
pub mod sound;
pub mod timer;

pub use artifact::{Artifact, ArtifactSink, LogArtifactSink, MemoryArtifactSink};
pub use sound::{NullSound, RecordingSound, SoundBackend, SoundCue, SoundNotifier};
pub use timer::{TimerId, TimerQueue};
