//! RGBA color type and helpers used by theme palettes.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Format as `#RRGGBB` (alpha is dropped).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Same color with a different alpha.
pub fn with_alpha(c: Color, a: u8) -> Color {
    Color { a, ..c }
}

/// Blend toward white by `amount` (0.0 = unchanged, 1.0 = white).
pub fn lighten(c: Color, amount: f32) -> Color {
    let amount = amount.clamp(0.0, 1.0);
    let lift = |v: u8| (v as f32 + (255.0 - v as f32) * amount).round() as u8;
    Color::rgba(lift(c.r), lift(c.g), lift(c.b), c.a)
}

/// Blend toward black by `amount` (0.0 = unchanged, 1.0 = black).
pub fn darken(c: Color, amount: f32) -> Color {
    let amount = amount.clamp(0.0, 1.0);
    let drop = |v: u8| (v as f32 * (1.0 - amount)).round() as u8;
    Color::rgba(drop(c.r), drop(c.g), drop(c.b), c.a)
}
