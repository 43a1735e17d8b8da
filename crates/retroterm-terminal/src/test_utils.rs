//! Shared test fixtures for the command tests.

use retroterm_content::{Education, Experience, Profile, Project, Skills};

use crate::commands::register_builtins;
use crate::interpreter::{CommandRegistry, Environment, Resolution};

/// A small profile with every section filled in.
pub fn sample_profile() -> Profile {
    Profile {
        name: "Ada Lovelace".into(),
        title: "Analyst".into(),
        email: "ada@example.com".into(),
        phone: "+44 0000".into(),
        location: "London, UK".into(),
        website: "https://ada.example".into(),
        github: "https://github.com/ada".into(),
        linkedin: "https://linkedin.example/ada".into(),
        bio: "First programmer.".into(),
        skills: Skills {
            languages: vec!["Ada".into(), "Note G".into()],
            frameworks: vec!["Analytical Engine".into()],
            tools: vec!["Punch cards".into()],
            databases: vec!["Tables".into()],
        },
        projects: vec![
            Project {
                name: "Notes".into(),
                description: "Bernoulli numbers".into(),
                tech: vec!["Engine".into(), "Cards".into()],
                github: Some("https://github.com/ada/notes".into()),
                demo: None,
            },
            Project {
                name: "Loom".into(),
                description: "Pattern weaving".into(),
                tech: vec!["Jacquard".into()],
                github: None,
                demo: Some("https://loom.example".into()),
            },
        ],
        experience: vec![Experience {
            company: "Babbage & Co".into(),
            position: "Analyst".into(),
            duration: "1842 - 1843".into(),
            description: "Wrote the notes.".into(),
        }],
        education: vec![Education {
            institution: "Home tutoring".into(),
            degree: "Mathematics".into(),
            year: "1833".into(),
        }],
    }
}

/// Registry with every built-in plus the sample profile.
pub fn setup() -> (CommandRegistry, Profile) {
    let mut reg = CommandRegistry::new();
    register_builtins(&mut reg);
    (reg, sample_profile())
}

/// Resolve a non-blank line.
pub fn resolve_with(
    reg: &CommandRegistry,
    profile: &Profile,
    line: &str,
    download_busy: bool,
) -> Resolution {
    let env = Environment {
        profile,
        raw_args: "",
        download_busy,
    };
    match reg.resolve(line, &env) {
        Some(resolution) => resolution,
        None => panic!("blank line: {line:?}"),
    }
}
