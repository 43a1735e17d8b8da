//! Profile loading from TOML or JSON.

use std::path::Path;

use retroterm_types::error::{Result, RetroError};

use crate::builtin::builtin_profile;
use crate::profile::Profile;

/// On-disk profile formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Toml,
    Json,
}

impl ProfileFormat {
    /// Format for `path`'s extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(RetroError::Config(format!(
                "unsupported profile format: {} (expected .toml or .json)",
                path.display()
            ))),
        }
    }
}

impl Profile {
    /// Parse and validate a TOML profile.
    pub fn from_toml(text: &str) -> Result<Self> {
        let profile: Profile = toml::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Parse and validate a JSON profile.
    pub fn from_json(text: &str) -> Result<Self> {
        let profile: Profile = serde_json::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load a profile file, picking the parser from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ProfileFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        let profile = match format {
            ProfileFormat::Toml => Self::from_toml(&text)?,
            ProfileFormat::Json => Self::from_json(&text)?,
        };
        log::info!("Loaded profile '{}' from {}", profile.name, path.display());
        Ok(profile)
    }
}

/// Resolve the session profile.
///
/// Resolution order:
/// 1. The file at `path`, if given and loadable
/// 2. The built-in profile (with a warning when a path was given)
pub fn resolve_profile(path: Option<&Path>) -> Result<Profile> {
    if let Some(path) = path {
        match Profile::load(path) {
            Ok(profile) => return Ok(profile),
            Err(e) => {
                log::warn!(
                    "Profile {} unusable ({e}) -- falling back to built-in",
                    path.display()
                );
            },
        }
    }
    builtin_profile()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_TOML: &str = r#"
        name = "Ada Lovelace"
        title = "Analyst"
        [[education]]
        institution = "Home"
        degree = "Mathematics"
        year = "1833"
    "#;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ProfileFormat::from_path(Path::new("me.toml")).unwrap(),
            ProfileFormat::Toml
        );
        assert_eq!(
            ProfileFormat::from_path(Path::new("ME.JSON")).unwrap(),
            ProfileFormat::Json
        );
        assert!(ProfileFormat::from_path(Path::new("me.yaml")).is_err());
        assert!(ProfileFormat::from_path(Path::new("profile")).is_err());
    }

    #[test]
    fn toml_missing_sections_default_to_empty() {
        let p = Profile::from_toml(MINIMAL_TOML).unwrap();
        assert_eq!(p.name, "Ada Lovelace");
        assert!(p.projects.is_empty());
        assert!(p.skills.tools.is_empty());
        assert_eq!(p.education[0].year, "1833");
    }

    #[test]
    fn json_profile_parses() {
        let p = Profile::from_json(
            r#"{
                "name": "Grace Hopper",
                "title": "Rear Admiral",
                "skills": { "languages": ["COBOL"] },
                "projects": [
                    { "name": "A-0", "description": "compiler", "tech": ["UNIVAC"], "demo": "https://example.com" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(p.skills.languages, vec!["COBOL"]);
        assert_eq!(p.projects[0].demo.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn nameless_profile_is_rejected() {
        let err = Profile::from_json(r#"{ "title": "x" }"#).unwrap_err();
        assert!(matches!(err, RetroError::Config(_)));
    }

    #[test]
    fn malformed_inputs_map_to_parse_errors() {
        assert!(matches!(
            Profile::from_toml("name = ").unwrap_err(),
            RetroError::TomlParse(_)
        ));
        assert!(matches!(
            Profile::from_json("{").unwrap_err(),
            RetroError::Json(_)
        ));
    }

    #[test]
    fn load_reads_files_from_disk() {
        let dir = std::env::temp_dir().join(format!("retroterm-profile-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ada.toml");
        std::fs::write(&path, MINIMAL_TOML).unwrap();
        let p = Profile::load(&path).unwrap();
        assert_eq!(p.title, "Analyst");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Profile::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, RetroError::Io(_)));
    }

    #[test]
    fn resolve_falls_back_to_builtin() {
        let p = resolve_profile(Some(Path::new("/definitely/not/here.json"))).unwrap();
        assert_eq!(p, builtin_profile().unwrap());
        assert_eq!(resolve_profile(None).unwrap(), p);
    }
}
