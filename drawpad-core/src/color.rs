//! RGBA colors and their packed ARGB form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// A straight (non-premultiplied) RGBA color.
///
/// Serializes as a hex string (`#RRGGBB`, or `#RRGGBBAA` when translucent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque white, the default canvas background.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque black, the default pen color.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque red.
    pub const RED: Self = Self::opaque(255, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Pack into a 32-bit `0xAARRGGBB` value.
    #[must_use]
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpack from a 32-bit `0xAARRGGBB` value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Whether the alpha channel is fully opaque.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] for any other shape of input.
    pub fn from_hex(input: &str) -> CanvasResult<Self> {
        let hex = input.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CanvasError::InvalidColor(input.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| CanvasError::InvalidColor(input.to_string()))
        };

        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_packing() {
        let color = Rgba::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(color.to_argb(), 0x7812_3456);
        assert_eq!(Rgba::from_argb(0x7812_3456), color);
        assert_eq!(Rgba::WHITE.to_argb(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgba::from_hex("#FF0000").expect("red"), Rgba::RED);
        assert_eq!(Rgba::from_hex("00ff00").expect("green"), Rgba::opaque(0, 255, 0));
        assert_eq!(
            Rgba::from_hex("#0000FF80").expect("blue"),
            Rgba::new(0, 0, 255, 0x80)
        );
    }

    #[test]
    fn test_hex_rejects_malformed() {
        assert!(Rgba::from_hex("#FFF").is_err());
        assert!(Rgba::from_hex("#GG0000").is_err());
        assert!(Rgba::from_hex("").is_err());
        assert!(Rgba::from_hex("#ÿÿÿ").is_err());
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Rgba::RED.to_hex(), "#FF0000");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_hex(), "#01020304");
        assert_eq!(Rgba::BLACK.to_string(), "#000000");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgba::RED).expect("serialize");
        assert_eq!(json, "\"#FF0000\"");
        let back: Rgba = serde_json::from_str("\"#00000080\"").expect("deserialize");
        assert_eq!(back, Rgba::new(0, 0, 0, 0x80));
        assert!(serde_json::from_str::<Rgba>("\"red\"").is_err());
    }
}
