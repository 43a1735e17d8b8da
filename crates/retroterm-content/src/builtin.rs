//! Embedded default profile.

use retroterm_types::error::Result;

use crate::profile::Profile;

/// TOML source of the built-in profile.
pub const BUILTIN_PROFILE_TOML: &str = include_str!("../../../profiles/default/profile.toml");

/// Parse the built-in profile.
pub fn builtin_profile() -> Result<Profile> {
    Profile::from_toml(BUILTIN_PROFILE_TOML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_parses_and_validates() {
        let p = builtin_profile().unwrap();
        p.validate().unwrap();
        assert_eq!(p.name, "Adnan Anjar");
        assert_eq!(p.title, "Full Stack Developer");
    }

    #[test]
    fn builtin_has_every_section() {
        let p = builtin_profile().unwrap();
        assert_eq!(p.skills.languages.len(), 6);
        assert_eq!(p.skills.databases.len(), 5);
        assert_eq!(p.projects.len(), 3);
        assert_eq!(p.experience.len(), 3);
        assert_eq!(p.education.len(), 1);
    }

    #[test]
    fn builtin_keeps_project_order_and_links() {
        let p = builtin_profile().unwrap();
        let names: Vec<_> = p.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["DonorNation", "iElect", "EcoTracker"]);
        assert!(p.projects[0].github.is_none());
        assert_eq!(
            p.projects[2].github.as_deref(),
            Some("https://github.com/alexthompson/eco-tracker")
        );
    }
}
