//! Platform-agnostic key events.
//!
//! Every front end maps its native keyboard input to [`KeyEvent`]. The session
//! engine never sees raw terminal or window-system input.

use serde::{Deserialize, Serialize};

/// A single key press delivered to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEvent {
    /// Printable character typed.
    Char(char),
    /// Backspace / delete-left.
    Backspace,
    /// Submit the current input line.
    Enter,
    /// Recall an older command.
    Up,
    /// Recall a newer command.
    Down,
    /// Request command completion.
    Tab,
    /// Skip the boot animation (ignored once booted).
    Escape,
}

impl KeyEvent {
    /// Whether this key produces a typing click (printable keys and backspace).
    pub fn is_typing(&self) -> bool {
        matches!(self, Self::Char(_) | Self::Backspace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_keys() {
        assert!(KeyEvent::Char('a').is_typing());
        assert!(KeyEvent::Backspace.is_typing());
    }

    #[test]
    fn navigation_keys_are_not_typing() {
        for key in [
            KeyEvent::Enter,
            KeyEvent::Up,
            KeyEvent::Down,
            KeyEvent::Tab,
            KeyEvent::Escape,
        ] {
            assert!(!key.is_typing(), "{key:?}");
        }
    }

    #[test]
    fn char_events_compare_by_value() {
        assert_eq!(KeyEvent::Char('x'), KeyEvent::Char('x'));
        assert_ne!(KeyEvent::Char('x'), KeyEvent::Char('y'));
    }
}
