//! Terminal bell sound backend.

use std::io::Write;

use retroterm_core::error::{Result, RetroError};
use retroterm_core::platform::{SoundBackend, SoundCue};

/// Rings the terminal bell for the loud cues. Keystrokes and plain success
/// stay silent.
pub struct BellSound<W: Write> {
    out: W,
}

impl<W: Write> BellSound<W> {
    /// Ring on `out`, usually stderr.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

fn rings(cue: SoundCue) -> bool {
    matches!(
        cue,
        SoundCue::CommandError | SoundCue::Modem | SoundCue::Static
    )
}

impl<W: Write> SoundBackend for BellSound<W> {
    fn play(&mut self, cue: SoundCue) -> Result<()> {
        if !rings(cue) {
            return Ok(());
        }
        self.out
            .write_all(b"\x07")
            .and_then(|()| self.out.flush())
            .map_err(|e| RetroError::Audio(format!("bell: {e}")))
    }
}
