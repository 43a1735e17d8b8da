//! Session configuration.
//!
//! One TOML document with a table per component. Every field has a default,
//! so an empty document (or a missing file) yields the stock session.
//!
//! ```toml
//! [boot]
//! power_on_ms = 1500
//!
//! [download]
//! tick_ms = 200
//!
//! [glitch]
//! enabled = false
//!
//! [session]
//! reveal = "transition"
//! initial_theme = "amber"
//! ```

use serde::{Deserialize, Serialize};

use retroterm_skin::{GlitchConfig, Theme, ThemeChannel};
use retroterm_terminal::DownloadConfig;
use retroterm_types::error::Result;

use crate::boot::{BootConfig, BootStage};

/// Boot stage at which the interpreter becomes visible and accepts keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealPoint {
    #[default]
    Complete,
    /// Cross-fade: reveal while the boot screen fades out.
    Transition,
}

impl RevealPoint {
    /// Boot stage at which the reveal happens.
    pub fn stage(self) -> BootStage {
        match self {
            Self::Complete => BootStage::Complete,
            Self::Transition => BootStage::Transition,
        }
    }
}

/// `[session]` configuration table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub reveal: RevealPoint,
    /// How long the typing indicator stays up after a submission.
    pub typing_indicator_ms: u64,
    pub initial_theme: Theme,
    pub channel_name: String,
    /// Seed for every random source; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            reveal: RevealPoint::Complete,
            typing_indicator_ms: 100,
            initial_theme: Theme::Green,
            channel_name: ThemeChannel::DEFAULT_NAME.to_string(),
            seed: None,
        }
    }
}

/// Top-level session configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub boot: BootConfig,
    pub download: DownloadConfig,
    pub glitch: GlitchConfig,
    pub session: SessionSettings,
}

impl SessionConfig {
    /// Reject settings the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.download.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retroterm_types::config::TomlConfig;
    use retroterm_types::error::RetroError;

    #[test]
    fn empty_document_is_stock_session() {
        let config = SessionConfig::from_toml("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.session.reveal, RevealPoint::Complete);
        assert_eq!(config.session.typing_indicator_ms, 100);
        assert_eq!(config.session.channel_name, "theme-change");
        assert_eq!(config.boot.lines.len(), 22);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = SessionConfig::from_toml(
            r#"
            [boot]
            power_on_ms = 10

            [session]
            reveal = "transition"
            initial_theme = "amber"
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.boot.power_on_ms, 10);
        assert_eq!(config.boot.system_check_ms, 300);
        assert_eq!(config.session.reveal.stage(), BootStage::Transition);
        assert_eq!(config.session.initial_theme, Theme::Amber);
        assert_eq!(config.session.seed, Some(7));
        assert_eq!(config.download, DownloadConfig::default());
    }

    #[test]
    fn custom_boot_script_replaces_builtin() {
        let config = SessionConfig::from_toml(
            r#"
            [[boot.lines]]
            text = "HELLO"
            delay_ms = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.boot.lines.len(), 1);
        assert_eq!(config.boot.lines[0].text, "HELLO");
    }

    #[test]
    fn glitch_can_be_disabled() {
        let config = SessionConfig::from_toml("[glitch]\nenabled = false").unwrap();
        assert!(!config.glitch.enabled);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let err = SessionConfig::from_toml("[session]\ninitial_theme = \"pink\"").unwrap_err();
        assert!(matches!(err, RetroError::TomlParse(_)));
    }

    #[test]
    fn stock_config_validates() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_tick_period() {
        let config = SessionConfig::from_toml("[download]\ntick_ms = 0").unwrap();
        assert!(matches!(config.validate(), Err(RetroError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_increment() {
        let config = SessionConfig::from_toml(
            "[download]\nmin_increment = 0.0\nmax_increment = 0.0",
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(RetroError::Config(_))));
    }

    #[test]
    fn validate_rejects_inverted_increment_range() {
        let config = SessionConfig::from_toml(
            "[download]\nmin_increment = 12.0\nmax_increment = 6.0",
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(RetroError::Config(_))));
    }
}
