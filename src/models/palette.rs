//! Colour palette shared by layouts and bar widgets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A six digit hex colour without the leading `#`, e.g. `dc7360`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse a colour, accepting an optional leading `#`
    pub fn new(hex: &str) -> Result<Self, PaletteError> {
        let trimmed = hex.trim().trim_start_matches('#');
        if trimmed.len() != 6 || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PaletteError::InvalidColor(hex.to_string()));
        }
        Ok(Color(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Color {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::new(s)
    }
}

impl TryFrom<String> for Color {
    type Error = PaletteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::new(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Two-stop colour as the host expects it: `[from, to]` for gradients,
/// both stops equal for a flat colour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[Color; 2]", into = "[Color; 2]")]
pub struct ColorPair {
    pub start: Color,
    pub end: Color,
}

impl ColorPair {
    /// Flat colour, both stops equal
    pub fn solid(color: Color) -> Self {
        ColorPair {
            start: color.clone(),
            end: color,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.start == self.end
    }
}

impl From<[Color; 2]> for ColorPair {
    fn from([start, end]: [Color; 2]) -> Self {
        ColorPair { start, end }
    }
}

impl From<ColorPair> for [Color; 2] {
    fn from(pair: ColorPair) -> Self {
        [pair.start, pair.end]
    }
}

/// The three colours every declaration draws from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Bar background
    pub background: ColorPair,
    /// Focus borders and widget foreground
    pub accent: ColorPair,
    /// Unfocused borders and current-screen highlight
    pub accent_dark: ColorPair,
}

impl Palette {
    /// Palette in declaration order: background, accent, dark accent
    pub fn as_list(&self) -> Vec<ColorPair> {
        vec![
            self.background.clone(),
            self.accent.clone(),
            self.accent_dark.clone(),
        ]
    }
}

impl Default for Palette {
    fn default() -> Self {
        // Literals are known-good hex, construct directly.
        Palette {
            background: ColorPair::solid(Color("321a16".to_string())),
            accent: ColorPair::solid(Color("dc7360".to_string())),
            accent_dark: ColorPair::solid(Color("6e3a30".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaletteError {
    #[error("Invalid hex colour: {0:?}")]
    InvalidColor(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::new("#DC7360").unwrap().as_str(), "dc7360");
        assert_eq!(Color::new("000000").unwrap().as_str(), "000000");
        assert!(Color::new("12345").is_err());
        assert!(Color::new("zzzzzz").is_err());
    }

    #[test]
    fn test_color_pair_serializes_as_array() {
        let pair = ColorPair::solid(Color::new("321a16").unwrap());
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r#"["321a16","321a16"]"#);

        let parsed: ColorPair = serde_json::from_str(r#"["321a16","6e3a30"]"#).unwrap();
        assert!(!parsed.is_solid());
        assert_eq!(parsed.end.as_str(), "6e3a30");
    }

    #[test]
    fn test_default_palette_order() {
        let list = Palette::default().as_list();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].start.as_str(), "321a16");
        assert_eq!(list[1].start.as_str(), "dc7360");
        assert_eq!(list[2].start.as_str(), "6e3a30");
    }

    #[test]
    fn test_invalid_color_rejected_on_deserialize() {
        let parsed: Result<ColorPair, _> = serde_json::from_str(r#"["nothex","321a16"]"#);
        assert!(parsed.is_err());
    }
}
