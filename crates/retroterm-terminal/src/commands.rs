//! Built-in commands for the portfolio terminal.
//!
//! Profile commands render the content provider's data; `resume` hands off to
//! the download simulator. File and theme commands live in their own modules.

use retroterm_content::Profile;
use retroterm_types::error::{Result, RetroError};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Effect, Environment};

/// Register every built-in command. Registration order is the `help` order.
pub fn register_builtins(reg: &mut CommandRegistry) {
    register_profile_commands(reg);
    reg.register(Box::new(ResumeCmd));
    crate::register_skin_commands(reg);
    crate::register_file_commands(reg);
}

/// Register the commands that present the profile.
pub fn register_profile_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(WhoamiCmd));
    reg.register(Box::new(AboutCmd));
    reg.register(Box::new(SkillsCmd));
    reg.register(Box::new(ProjectsCmd));
    reg.register(Box::new(ExperienceCmd));
    reg.register(Box::new(EducationCmd));
    reg.register(Box::new(ContactCmd));
}

/// Welcome banner shown as the first history record.
pub fn welcome_banner(profile: &Profile) -> String {
    let inner = format!("█  {} - {}  █", profile.name, profile.title);
    let width = inner.chars().count();
    format!(
        "Welcome to {}'s Portfolio Terminal\nType 'help' to see available commands.\n\n {}\n {inner}\n {}",
        profile.name,
        "▄".repeat(width),
        "▀".repeat(width),
    )
}

/// Numbered entries separated by blank lines, or a placeholder when empty.
fn numbered<T>(header: &str, items: &[T], render: impl Fn(usize, &T) -> String) -> String {
    if items.is_empty() {
        return format!("{header}\n\n   (none)");
    }
    let body: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| render(i + 1, item))
        .collect();
    format!("{header}\n\n{}", body.join("\n\n"))
}

// ---------------------------------------------------------------------------
// whoami
// ---------------------------------------------------------------------------

struct WhoamiCmd;
impl Command for WhoamiCmd {
    fn name(&self) -> &str {
        "whoami"
    }
    fn description(&self) -> &str {
        "Display user information"
    }
    fn usage(&self) -> &str {
        "whoami"
    }
    fn category(&self) -> &str {
        "profile"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<CommandOutput> {
        let p = env.profile;
        Ok(CommandOutput::text(format!(
            "{}\n{}\n📍 {}\n🌐 {}",
            p.name, p.title, p.location, p.website
        )))
    }
}

// ---------------------------------------------------------------------------
// about
// ---------------------------------------------------------------------------

struct AboutCmd;
impl Command for AboutCmd {
    fn name(&self) -> &str {
        "about"
    }
    fn description(&self) -> &str {
        "Show bio and introduction"
    }
    fn usage(&self) -> &str {
        "about"
    }
    fn category(&self) -> &str {
        "profile"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<CommandOutput> {
        let p = env.profile;
        Ok(CommandOutput::text(format!(
            "About {}:\n\n{}\n\n\
             🎯 Specializing in modern web technologies\n\
             🚀 Passionate about clean code and user experience\n\
             💡 Always learning and exploring new technologies",
            p.name, p.bio
        )))
    }
}

// ---------------------------------------------------------------------------
// skills
// ---------------------------------------------------------------------------

struct SkillsCmd;
impl Command for SkillsCmd {
    fn name(&self) -> &str {
        "skills"
    }
    fn description(&self) -> &str {
        "List technical skills"
    }
    fn usage(&self) -> &str {
        "skills"
    }
    fn category(&self) -> &str {
        "profile"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<CommandOutput> {
        let s = &env.profile.skills;
        let groups = [
            ("🔤 Languages:", &s.languages),
            ("⚛️ Frameworks & Libraries:", &s.frameworks),
            ("🛠️ Tools & Technologies:", &s.tools),
            ("🗄️ Databases:", &s.databases),
        ];
        let body: Vec<String> = groups
            .iter()
            .map(|(label, items)| format!("{label}\n   {}", items.join(" • ")))
            .collect();
        Ok(CommandOutput::text(format!(
            "Technical Skills:\n\n{}",
            body.join("\n\n")
        )))
    }
}

// ---------------------------------------------------------------------------
// projects
// ---------------------------------------------------------------------------

struct ProjectsCmd;
impl Command for ProjectsCmd {
    fn name(&self) -> &str {
        "projects"
    }
    fn description(&self) -> &str {
        "Show project portfolio"
    }
    fn usage(&self) -> &str {
        "projects"
    }
    fn category(&self) -> &str {
        "profile"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::text(numbered(
            "Featured Projects:",
            &env.profile.projects,
            |n, project| {
                let mut entry = format!(
                    "{n}. {}\n   {}\n\n   Tech Stack: {}",
                    project.name,
                    project.description,
                    project.tech.join(", ")
                );
                if let Some(url) = &project.github {
                    entry.push_str(&format!("\n   🔗 GitHub: {url}"));
                }
                if let Some(url) = &project.demo {
                    entry.push_str(&format!("\n   🌐 Demo: {url}"));
                }
                entry
            },
        )))
    }
}

// ---------------------------------------------------------------------------
// experience
// ---------------------------------------------------------------------------

struct ExperienceCmd;
impl Command for ExperienceCmd {
    fn name(&self) -> &str {
        "experience"
    }
    fn description(&self) -> &str {
        "Display work experience"
    }
    fn usage(&self) -> &str {
        "experience"
    }
    fn category(&self) -> &str {
        "profile"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::text(numbered(
            "Work Experience:",
            &env.profile.experience,
            |n, job| {
                let role = if job.company.is_empty() {
                    job.position.clone()
                } else {
                    format!("{} @ {}", job.position, job.company)
                };
                format!(
                    "{n}. {role}\n   Duration: {}\n\n   {}",
                    job.duration, job.description
                )
            },
        )))
    }
}

// ---------------------------------------------------------------------------
// education
// ---------------------------------------------------------------------------

struct EducationCmd;
impl Command for EducationCmd {
    fn name(&self) -> &str {
        "education"
    }
    fn description(&self) -> &str {
        "Show educational background"
    }
    fn usage(&self) -> &str {
        "education"
    }
    fn category(&self) -> &str {
        "profile"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::text(numbered(
            "Education:",
            &env.profile.education,
            |n, edu| format!("{n}. {}\n   {} - {}", edu.degree, edu.institution, edu.year),
        )))
    }
}

// ---------------------------------------------------------------------------
// contact
// ---------------------------------------------------------------------------

struct ContactCmd;
impl Command for ContactCmd {
    fn name(&self) -> &str {
        "contact"
    }
    fn description(&self) -> &str {
        "Get contact information"
    }
    fn usage(&self) -> &str {
        "contact"
    }
    fn category(&self) -> &str {
        "profile"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<CommandOutput> {
        let p = env.profile;
        Ok(CommandOutput::text(format!(
            "Contact Information:\n\n\
             📧 Email: {}\n\
             📱 Phone: {}\n\
             🌐 Website: {}\n\
             💼 LinkedIn: {}\n\
             🐙 GitHub: {}\n\
             📍 Location: {}\n\n\
             Feel free to reach out for opportunities or collaborations!",
            p.email, p.phone, p.website, p.linkedin, p.github, p.location
        )))
    }
}

// ---------------------------------------------------------------------------
// resume
// ---------------------------------------------------------------------------

struct ResumeCmd;
impl Command for ResumeCmd {
    fn name(&self) -> &str {
        "resume"
    }
    fn description(&self) -> &str {
        "Download resume with progress"
    }
    fn usage(&self) -> &str {
        "resume"
    }
    fn category(&self) -> &str {
        "profile"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<CommandOutput> {
        if env.download_busy {
            return Err(RetroError::Usage(
                "resume: download already in progress".into(),
            ));
        }
        Ok(CommandOutput::text("📄 Preparing resume download...").with_effect(Effect::StartDownload))
    }
}
