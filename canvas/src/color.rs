//! RGB color values and their canonical `#rrggbb` text form.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A color string that is not `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color: {0:?}")]
pub struct InvalidColor(pub String);

/// An opaque RGB color.
///
/// Serialized as lowercase `#rrggbb`. Parsing accepts `#rgb` and `#rrggbb`
/// in either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidColor`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, InvalidColor> {
        let invalid = || InvalidColor(raw.to_owned());
        let hex = raw.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            3 => Ok(Self::rgb(
                channel(hex[0..1].repeat(2).as_str())?,
                channel(hex[1..2].repeat(2).as_str())?,
                channel(hex[2..3].repeat(2).as_str())?,
            )),
            6 => Ok(Self::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => Err(invalid()),
        }
    }

    /// Relative luminance in `[0, 1]` (Rec. 709 weights, no gamma).
    #[must_use]
    pub fn luminance(self) -> f64 {
        (0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b)) / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
