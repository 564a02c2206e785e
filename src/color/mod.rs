//! Packed RGB(W) color model
//!
//! Colors are stored the way WS281x/SK6812 drivers expect them: a single
//! 32-bit word laid out as `0xWWRRGGBB`.

mod names;
mod utils;

use core::fmt;

use smart_leds::RGB8;

pub use names::{ColorError, parse_color, parse_rgb_text};
pub use utils::{PaletteColor, blend, hue_wheel, jitter, pick_color};

/// RGB color with an optional white channel, packed into 32 bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Pack red, green and blue channels (white stays 0).
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self::rgbw(r, g, b, 0)
    }

    /// Pack all four channels.
    pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self(((w as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Wrap an already packed `0xWWRRGGBB` value.
    pub const fn from_u32(packed: u32) -> Self {
        Self(packed)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn w(self) -> u8 {
        ((self.0 >> 24) & 0xFF) as u8
    }

    /// Channels as `(r, g, b, w)`.
    pub const fn channels(self) -> (u8, u8, u8, u8) {
        (self.r(), self.g(), self.b(), self.w())
    }

    /// Parse a color, degrading to black when the text is not understood.
    pub fn from_text_lossy(text: &str) -> Self {
        parse_color(text).unwrap_or_else(|err| {
            log::warn!("{err}, using black");
            Self::BLACK
        })
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.w() == 0 {
            write!(f, "Color({}, {}, {})", self.r(), self.g(), self.b())
        } else {
            write!(f, "Color({}, {}, {}, w={})", self.r(), self.g(), self.b(), self.w())
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

impl From<RGB8> for Color {
    fn from(rgb: RGB8) -> Self {
        Self::new(rgb.r, rgb.g, rgb.b)
    }
}

impl From<Color> for RGB8 {
    fn from(color: Color) -> Self {
        RGB8::new(color.r(), color.g(), color.b())
    }
}
