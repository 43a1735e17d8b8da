//! TOML configuration loading.
//!
//! Each crate owns the config section for its own component. Any
//! deserializable section with a `Default` gets `from_toml` and `load` through
//! the blanket [`TomlConfig`] impl, so a missing file or table falls back to
//! the built-in defaults.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Result, RetroError};

/// Configuration that can be parsed from a TOML document.
pub trait TomlConfig: DeserializeOwned + Default {
    /// Parse from a TOML string.
    fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file.
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RetroError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml(&text)
    }

    /// Load from a file if it exists, otherwise use defaults.
    fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            log::info!("No config at {} -- using defaults", path.display());
            Ok(Self::default())
        }
    }
}

impl<T: DeserializeOwned + Default> TomlConfig for T {}
