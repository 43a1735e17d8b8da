//! Error types for RETROTERM.

use std::io;

/// Errors produced by the RETROTERM session engine.
///
/// `Usage` and `NotFound` are the two command-level kinds: their message is
/// printed verbatim as the command's output, so they carry no prefix.
#[derive(Debug, thiserror::Error)]
pub enum RetroError {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    NotFound(String),

    #[error("busy: {0}")]
    Busy(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("audio error: {0}")]
    Audio(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RetroError {
    /// Whether this error is one a command handler reports to the user
    /// (as opposed to an engine or collaborator failure).
    pub fn is_command_error(&self) -> bool {
        matches!(self, Self::Usage(_) | Self::NotFound(_))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RetroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_display_is_verbatim() {
        let e = RetroError::Usage("cat: missing file operand".into());
        assert_eq!(format!("{e}"), "cat: missing file operand");
    }

    #[test]
    fn not_found_display_is_verbatim() {
        let e = RetroError::NotFound("Command not found: foo.".into());
        assert_eq!(format!("{e}"), "Command not found: foo.");
    }

    #[test]
    fn config_error_display() {
        let e = RetroError::Config("missing key".into());
        assert_eq!(format!("{e}"), "config error: missing key");
    }

    #[test]
    fn busy_error_display() {
        let e = RetroError::Busy("download running".into());
        assert_eq!(format!("{e}"), "busy: download running");
    }

    #[test]
    fn command_error_classification() {
        assert!(RetroError::Usage("x".into()).is_command_error());
        assert!(RetroError::NotFound("x".into()).is_command_error());
        assert!(!RetroError::Audio("x".into()).is_command_error());
        assert!(!RetroError::Config("x".into()).is_command_error());
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: RetroError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: RetroError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: RetroError = json_err.into();
        assert!(format!("{e}").contains("JSON error"));
    }

    #[test]
    fn error_is_debug() {
        let e = RetroError::Usage("test".into());
        assert!(format!("{e:?}").contains("Usage"));
    }
}
