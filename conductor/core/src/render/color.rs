//! Colours for vector illustrations
//!
//! Colours are always written to SVG as opaque `#rrggbb`; translucency is
//! carried separately as fill/stroke opacity on each element.

use serde::{Deserialize, Serialize};

use crate::cocktail::DEFAULT_LIQUID_HEX;

/// Surface-agnostic RGB color
///
/// # Examples
///
/// ```
/// use bistro_core::render::Color;
///
/// let ember = Color::from_hex("#EA580C").unwrap();
/// assert_eq!(ember, Color::rgb(0xea, 0x58, 0x0c));
/// assert_eq!(ember.to_hex(), "#ea580c");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl Color {
    /// Pure white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Pure black
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create a color from RGB components
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional)
    ///
    /// An eight-digit `#rrggbbaa` value is accepted and its alpha ignored,
    /// since opacity is decided by the renderer.
    ///
    /// ```
    /// use bistro_core::render::Color;
    ///
    /// assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
    /// assert_eq!(Color::from_hex("9333ea"), Some(Color::rgb(0x93, 0x33, 0xea)));
    /// assert_eq!(Color::from_hex("amber"), None);
    /// ```
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, ch) in out.iter_mut().zip(digits.chars()) {
                    let nibble = ch.to_digit(16)? as u8;
                    *slot = nibble * 17;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 | 8 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Parse a liquid colour, falling back to the house amber
    #[must_use]
    pub fn liquid(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or_else(|| {
            tracing::debug!(color = hex, "Unparseable liquid colour, using default");
            Self::default_liquid()
        })
    }

    /// The house amber (`#ea580c`)
    #[must_use]
    pub fn default_liquid() -> Self {
        Self::from_hex(DEFAULT_LIQUID_HEX).unwrap_or(Self::rgb(0xea, 0x58, 0x0c))
    }

    /// Convert to a lowercase `#rrggbb` string
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
