//! sRGB colors as picked by the user.
//!
//! Colors arrive as `#rrggbb` strings from the color picker, the config file
//! or the command line. They are kept as 8-bit sRGB because the renderer
//! blends in gamma space, the way a 2D canvas does.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError(hex.to_string()));
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| ColorParseError(hex.to_string()))?;
        Ok(Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Add `amount` to every channel, clamped to 0..=255.
    ///
    /// The control panel uses `shade(-20)` for the darker end of the swatch gradient.
    pub fn shade(self, amount: i16) -> Self {
        let ch = |c: u8| (c as i16 + amount).clamp(0, 255) as u8;
        Self::rgb(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Normalized channels with the given alpha, for GPU upload.
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_hash() {
        assert_eq!(Color::from_hex("#a78bfa"), Ok(Color::rgb(0xa7, 0x8b, 0xfa)));
        assert_eq!(Color::from_hex("A78BFA"), Ok(Color::rgb(0xa7, 0x8b, 0xfa)));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("").is_err());
        assert!(Color::from_hex("#+12345").is_err());
    }

    #[test]
    fn test_shade_clamps() {
        let c = Color::rgb(10, 128, 250);
        assert_eq!(c.shade(-20), Color::rgb(0, 108, 230));
        assert_eq!(c.shade(20), Color::rgb(30, 148, 255));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::rgb(167, 139, 250)).unwrap();
        assert_eq!(json, "\"#a78bfa\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(167, 139, 250));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn test_to_rgba() {
        let [r, g, b, a] = Color::WHITE.to_rgba(0.5);
        assert_eq!((r, g, b, a), (1.0, 1.0, 1.0, 0.5));
    }
}
