//! Color themes and their palettes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use retroterm_types::color::{Color, with_alpha};
use retroterm_types::error::RetroError;

/// The closed set of terminal color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Green,
    Blue,
    Amber,
    Purple,
    Red,
}

impl Theme {
    /// Every theme, in the order they are listed to the user.
    pub const ALL: [Theme; 5] = [
        Theme::Green,
        Theme::Blue,
        Theme::Amber,
        Theme::Purple,
        Theme::Red,
    ];

    /// Lowercase theme name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Amber => "amber",
            Self::Purple => "purple",
            Self::Red => "red",
        }
    }

    /// All theme names joined with `sep`.
    pub fn joined_names(sep: &str) -> String {
        Self::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(sep)
    }

    /// Presentation palette for this theme.
    pub fn palette(self) -> Palette {
        // (400, 300, 500, 600) shades per hue.
        let (c400, c300, c500, c600) = match self {
            Self::Green => (0x4ADE80, 0x86EFAC, 0x22C55E, 0x16A34A),
            Self::Blue => (0x60A5FA, 0x93C5FD, 0x3B82F6, 0x2563EB),
            Self::Amber => (0xFBBF24, 0xFCD34D, 0xF59E0B, 0xD97706),
            Self::Purple => (0xC084FC, 0xD8B4FE, 0xA855F7, 0x9333EA),
            Self::Red => (0xF87171, 0xFCA5A5, 0xEF4444, 0xDC2626),
        };
        Palette {
            primary: hex(c400),
            secondary: hex(c300),
            accent: hex(c500),
            border: with_alpha(hex(c500), 77),
            glow: with_alpha(hex(c500), 51),
            text: hex(c300),
            text_secondary: with_alpha(hex(c600), 153),
        }
    }
}

fn hex(rgb: u32) -> Color {
    Color::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = RetroError;

    /// Case-insensitive lookup; the error lists every valid name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == lower)
            .ok_or_else(|| {
                RetroError::Usage(format!(
                    "❌ Invalid theme. Available themes: {}",
                    Self::joined_names(", ")
                ))
            })
    }
}

/// Colors a display collaborator needs to draw a themed terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Prompt, cursor and progress fill.
    pub primary: Color,
    /// Prompt user name.
    pub secondary: Color,
    pub accent: Color,
    pub border: Color,
    pub glow: Color,
    /// Command output text.
    pub text: Color,
    /// Hints and progress track.
    pub text_secondary: Color,
}
