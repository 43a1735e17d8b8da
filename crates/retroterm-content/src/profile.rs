//! Profile data model.

use serde::{Deserialize, Serialize};

use retroterm_types::error::{Result, RetroError};

/// Everything the terminal can say about its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub github: String,
    pub linkedin: String,
    pub bio: String,
    pub skills: Skills,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
}

/// The four skill groups, each in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
    pub databases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub company: String,
    pub position: String,
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub year: String,
}

impl Profile {
    /// Reject profiles the terminal cannot present.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RetroError::Config("profile has no name".into()));
        }
        Ok(())
    }

    /// User part of the prompt: lowercase name with its first space removed.
    pub fn prompt_user(&self) -> String {
        self.name.to_lowercase().replacen(' ', "", 1)
    }

    /// Full prompt prefix, e.g. `adnananjar@portfolio:~`.
    pub fn prompt(&self) -> String {
        format!("{}@portfolio:~", self.prompt_user())
    }

    /// File name of the simulated resume download.
    pub fn resume_file_name(&self) -> String {
        format!("{}_Resume.pdf", self.name.replacen(' ', "_", 1))
    }
}
