//! Decorative file commands: a fixed listing and a tiny virtual file map.

use retroterm_content::Profile;
use retroterm_types::error::{Result, RetroError};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Effect, Environment};

/// Register ls, cat, echo and clear.
pub fn register_file_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(CatCmd));
    reg.register(Box::new(EchoCmd));
    reg.register(Box::new(ClearCmd));
}

const LISTING: &str = "total 8
drwxr-xr-x  2 alex alex 4096 Dec 15 10:30 projects/
drwxr-xr-x  2 alex alex 4096 Dec 15 10:30 skills/
-rw-r--r--  1 alex alex 1024 Dec 15 10:30 about.txt
-rw-r--r--  1 alex alex 2048 Dec 15 10:30 resume.pdf
-rw-r--r--  1 alex alex  512 Dec 15 10:30 contact.txt";

/// Contents of a virtual file, looked up case-insensitively.
pub fn virtual_file(profile: &Profile, name: &str) -> Option<String> {
    match name.to_lowercase().as_str() {
        "about.txt" => Some(profile.bio.clone()),
        "contact.txt" => Some(format!(
            "Name: {}\nEmail: {}\nPhone: {}",
            profile.name, profile.email, profile.phone
        )),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn usage(&self) -> &str {
        "ls"
    }
    fn category(&self) -> &str {
        "file"
    }
    fn execute(&self, _args: &[&str], _env: &Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::text(LISTING))
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Display file contents"
    }
    fn usage(&self) -> &str {
        "cat <file>"
    }
    fn category(&self) -> &str {
        "file"
    }
    fn execute(&self, args: &[&str], env: &Environment<'_>) -> Result<CommandOutput> {
        let Some(name) = args.first() else {
            return Err(RetroError::Usage("cat: missing file operand".into()));
        };
        virtual_file(env.profile, name)
            .map(CommandOutput::text)
            .ok_or_else(|| RetroError::NotFound(format!("cat: {name}: No such file or directory")))
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Display text"
    }
    fn usage(&self) -> &str {
        "echo <text>"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::text(env.raw_args))
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear terminal history"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn category(&self) -> &str {
        "display"
    }
    fn execute(&self, _args: &[&str], _env: &Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::empty().with_effect(Effect::ClearHistory))
    }
}
