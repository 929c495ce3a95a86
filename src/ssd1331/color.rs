//! 8-bit RGB color and the controller's 65k pixel packing

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};

/// An RGB color with 8 bits per channel.
///
/// Only the top 5 (red), 6 (green) and 5 (blue) bits reach the panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// All channels off
    pub const BLACK: Color = Color::new(0, 0, 0);
    /// All channels at full scale
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);
    /// Red only
    pub const RED: Color = Color::new(0xFF, 0, 0);
    /// Green only
    pub const GREEN: Color = Color::new(0, 0xFF, 0);
    /// Blue only
    pub const BLUE: Color = Color::new(0, 0, 0xFF);

    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// The two framebuffer bytes for this color, high byte first.
    ///
    /// `RRRRRGGG GGGBBBBB`, matching the 65k color format selected by the
    /// remap register during init.
    pub const fn pack(self) -> [u8; 2] {
        [
            (self.r & 0b1111_1000) | (self.g >> 5),
            ((self.g << 3) & 0b1110_0000) | (self.b >> 3),
        ]
    }

    /// Inverse of [`Color::pack`]; the low bits lost in packing come back as zero.
    pub const fn unpack(bytes: [u8; 2]) -> Self {
        Color {
            r: bytes[0] & 0b1111_1000,
            g: ((bytes[0] & 0b0000_0111) << 5) | ((bytes[1] & 0b1110_0000) >> 3),
            b: (bytes[1] & 0b0001_1111) << 3,
        }
    }
}

impl From<Rgb888> for Color {
    fn from(c: Rgb888) -> Self {
        Color::new(c.r(), c.g(), c.b())
    }
}

impl From<Rgb565> for Color {
    fn from(c: Rgb565) -> Self {
        Color::new(c.r() << 3, c.g() << 2, c.b() << 3)
    }
}

impl From<Color> for Rgb888 {
    fn from(c: Color) -> Self {
        Rgb888::new(c.r, c.g, c.b)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b)
    }
}
