//! Terminal command for switching the color theme.

use retroterm_skin::Theme;
use retroterm_types::error::Result;

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Effect, Environment};

/// Register theme-related commands.
pub fn register_skin_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(ThemeCmd::new()));
}

/// Validates a theme name and declares its broadcast.
struct ThemeCmd {
    description: String,
}

impl ThemeCmd {
    fn new() -> Self {
        Self {
            description: format!("Change terminal theme ({})", Theme::joined_names("|")),
        }
    }
}

impl Command for ThemeCmd {
    fn name(&self) -> &str {
        "theme"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn usage(&self) -> &str {
        "theme"
    }

    fn category(&self) -> &str {
        "display"
    }

    fn execute(&self, args: &[&str], _env: &Environment<'_>) -> Result<CommandOutput> {
        match args.first() {
            None => Ok(CommandOutput::text(format!(
                "Current themes available: {}\nUsage: theme <color>",
                Theme::joined_names(", ")
            ))),
            Some(name) => {
                let theme: Theme = name.parse()?;
                Ok(CommandOutput::text(format!("🎨 Theme changed to {theme}"))
                    .with_effect(Effect::BroadcastTheme(theme)))
            },
        }
    }
}
