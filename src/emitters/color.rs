//! Colour values shared by the styled-track and raster emitters.

use anyhow::{Result, anyhow};

/// An RGBA colour, alpha 255 is opaque
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

const NAMED_COLORS: &[(&str, [u8; 4])] = &[
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 128, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("magenta", [255, 0, 255, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
    ("transparent", [0, 0, 0, 0]),
];

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a colour name or `#RRGGBB` / `#RRGGBBAA` hex notation
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();

        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| anyhow!("Invalid hex colour: {}", value));
        }

        let lower = value.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, [r, g, b, a])| Self::rgba(*r, *g, *b, *a))
            .ok_or_else(|| anyhow!("Unknown colour: {}", value))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// ASS colour notation `&HAABBGGRR`, where AA is transparency
    pub fn to_ass(self) -> String {
        format!("&H{:02X}{:02X}{:02X}{:02X}", 255 - self.a, self.b, self.g, self.r)
    }
}
