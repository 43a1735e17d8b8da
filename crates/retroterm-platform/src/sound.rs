//! Sound notification boundary.
//!
//! The interpreter reports outcomes as [`SoundCue`]s through a
//! [`SoundNotifier`]. Backends implement the fallible [`SoundBackend`]; the
//! notifier logs and swallows their failures so nothing an audio device does
//! can reach the session.

use std::cell::RefCell;
use std::rc::Rc;

use retroterm_types::error::Result;

/// Sound cue identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Key click while typing.
    Keystroke,
    /// Generic command success.
    CommandSuccess,
    /// Command failed (usage error or not found).
    CommandError,
    /// Modem handshake, played when a resume download is requested.
    Modem,
    /// Static burst, played when the screen is cleared.
    Static,
}

impl SoundCue {
    /// Stable lowercase name, used in logs and by text-mode backends.
    pub fn name(self) -> &'static str {
        match self {
            Self::Keystroke => "typing-keystroke",
            Self::CommandSuccess => "command-success",
            Self::CommandError => "command-error",
            Self::Modem => "modem",
            Self::Static => "static",
        }
    }
}

/// An audio device or synthesizer able to play cues.
pub trait SoundBackend {
    /// Play a cue. Errors are reported but never propagated past the notifier.
    fn play(&mut self, cue: SoundCue) -> Result<()>;
}

/// Backend that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSound;

impl SoundBackend for NullSound {
    fn play(&mut self, _cue: SoundCue) -> Result<()> {
        Ok(())
    }
}

/// Backend that records every cue into a shared list.
#[derive(Debug, Default, Clone)]
pub struct RecordingSound {
    played: Rc<RefCell<Vec<SoundCue>>>,
}

impl RecordingSound {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far, oldest first.
    pub fn played(&self) -> Vec<SoundCue> {
        self.played.borrow().clone()
    }

    /// Forget recorded cues.
    pub fn reset(&self) {
        self.played.borrow_mut().clear();
    }
}

impl SoundBackend for RecordingSound {
    fn play(&mut self, cue: SoundCue) -> Result<()> {
        self.played.borrow_mut().push(cue);
        Ok(())
    }
}

/// Fire-and-forget front for a [`SoundBackend`].
pub struct SoundNotifier {
    backend: Box<dyn SoundBackend>,
    failures: u32,
}

impl SoundNotifier {
    /// Notifier that plays through `backend`.
    pub fn new(backend: Box<dyn SoundBackend>) -> Self {
        Self {
            backend,
            failures: 0,
        }
    }

    /// Notifier backed by [`NullSound`].
    pub fn silent() -> Self {
        Self::new(Box::new(NullSound))
    }

    /// Play a cue, swallowing any backend failure.
    pub fn notify(&mut self, cue: SoundCue) {
        if let Err(e) = self.backend.play(cue) {
            self.failures += 1;
            // Warn once; a missing audio device fails on every cue.
            if self.failures == 1 {
                log::warn!("Sound backend failed on '{}': {e}", cue.name());
            } else {
                log::debug!("Sound backend failed on '{}': {e}", cue.name());
            }
        }
    }

    /// Number of backend failures swallowed so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl std::fmt::Debug for SoundNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundNotifier")
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retroterm_types::error::RetroError;

    struct BrokenBackend;

    impl SoundBackend for BrokenBackend {
        fn play(&mut self, _cue: SoundCue) -> Result<()> {
            Err(RetroError::Audio("no device".into()))
        }
    }

    #[test]
    fn recording_backend_keeps_order() {
        let rec = RecordingSound::new();
        let mut notifier = SoundNotifier::new(Box::new(rec.clone()));
        notifier.notify(SoundCue::Keystroke);
        notifier.notify(SoundCue::CommandError);
        assert_eq!(
            rec.played(),
            vec![SoundCue::Keystroke, SoundCue::CommandError]
        );
        rec.reset();
        assert!(rec.played().is_empty());
    }

    #[test]
    fn failures_are_swallowed_and_counted() {
        let mut notifier = SoundNotifier::new(Box::new(BrokenBackend));
        notifier.notify(SoundCue::CommandSuccess);
        notifier.notify(SoundCue::Modem);
        assert_eq!(notifier.failures(), 2);
    }

    #[test]
    fn silent_notifier_never_fails() {
        let mut notifier = SoundNotifier::silent();
        notifier.notify(SoundCue::Static);
        assert_eq!(notifier.failures(), 0);
    }

    #[test]
    fn cue_names_are_stable() {
        assert_eq!(SoundCue::Keystroke.name(), "typing-keystroke");
        assert_eq!(SoundCue::CommandSuccess.name(), "command-success");
        assert_eq!(SoundCue::CommandError.name(), "command-error");
    }
}
