//! Skin system -- the visual personality of a session.
//!
//! A skin here is the active color [`Theme`] (delivered over a
//! [`ThemeChannel`] and cached by [`ActiveTheme`]) plus the ambient CRT
//! "glitch" flags pulsed by the [`GlitchScheduler`]. Nothing in this crate
//! renders; display collaborators read the palette and flags and draw
//! whatever they like.

pub mod active_theme;
pub mod channel;
pub mod effects;
pub mod theme;

pub use active_theme::ActiveTheme;
pub use channel::{SubscriptionId, ThemeChannel};
pub use effects::{GlitchConfig, GlitchFlag, GlitchScheduler, GlitchState, PulseSpec};
pub use theme::{Palette, Theme};
