//! In-memory framebuffer and drawing primitives
//!
//! Pixels are stored row-major, two bytes each, in the packing described by
//! [`Color::pack`]. The whole buffer goes to the panel as a single data
//! transfer, so its layout must match the column/row walk selected by the
//! remap register during init.
//!
//! The primitives check their bounds before touching the buffer: a call
//! that would leave the screen returns [`Error::OutOfBounds`] and writes
//! nothing.

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use image::{GenericImageView, Pixel as _};

use crate::ssd1331::{color::Color, error::Error, BUFFER_LEN, BYTES_PER_PIXEL, HEIGHT, WIDTH};

/// Packed 96x64 16-bit framebuffer
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    buffer: Vec<u8>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("len", &self.buffer.len())
            .finish()
    }
}

fn check(x: u32, y: u32) -> Result<(), Error> {
    if x < u32::from(WIDTH) && y < u32::from(HEIGHT) {
        Ok(())
    } else {
        Err(Error::OutOfBounds { x, y })
    }
}

impl Framebuffer {
    /// A zero-filled (black) framebuffer
    pub fn new() -> Self {
        Framebuffer {
            buffer: vec![0; BUFFER_LEN],
        }
    }

    /// Raw bytes, as sent to the display
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Byte offset of pixel `(x, y)`; caller checks bounds
    fn offset(x: u16, y: u16) -> usize {
        (usize::from(y) * usize::from(WIDTH) + usize::from(x)) * BYTES_PER_PIXEL
    }

    fn put(&mut self, x: u16, y: u16, packed: [u8; 2]) {
        let i = Self::offset(x, y);
        self.buffer[i..i + BYTES_PER_PIXEL].copy_from_slice(&packed);
    }

    /// The two packed bytes of pixel `(x, y)`
    pub fn pixel(&self, x: u16, y: u16) -> Result<[u8; 2], Error> {
        check(x.into(), y.into())?;
        let i = Self::offset(x, y);
        Ok([self.buffer[i], self.buffer[i + 1]])
    }

    /// Set the pixel in the buffer
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), Error> {
        check(x.into(), y.into())?;
        self.put(x, y, color.pack());
        Ok(())
    }

    /// Draw a line from `(x0, y0)` to `(x1, y1)`, both ends included.
    ///
    /// Integer Bresenham stepping toward the end point on both axes, so any
    /// direction works.
    pub fn set_line(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Error> {
        check(x0.into(), y0.into())?;
        check(x1.into(), y1.into())?;
        let packed = color.pack();

        let (x1, y1) = (i32::from(x1), i32::from(y1));
        let (mut x, mut y) = (i32::from(x0), i32::from(y0));
        let dx = (x1 - x).abs();
        let dy = (y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            // x and y stay between the checked end points
            self.put(x as u16, y as u16, packed);
            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
        Ok(())
    }

    /// Draw `w` pixels to the right of and including `(x, y)`
    pub fn set_hline(&mut self, x: u16, y: u16, w: u16, color: Color) -> Result<(), Error> {
        if w == 0 {
            return Ok(());
        }
        check(u32::from(x) + u32::from(w) - 1, y.into())?;
        let packed = color.pack();
        for i in 0..w {
            self.put(x + i, y, packed);
        }
        Ok(())
    }

    /// Draw `h` pixels down from and including `(x, y)`
    pub fn set_vline(&mut self, x: u16, y: u16, h: u16, color: Color) -> Result<(), Error> {
        if h == 0 {
            return Ok(());
        }
        check(x.into(), u32::from(y) + u32::from(h) - 1)?;
        let packed = color.pack();
        for i in 0..h {
            self.put(x, y + i, packed);
        }
        Ok(())
    }

    /// Draw the outline of a circle with radius `r` around `(cx, cy)`.
    ///
    /// Midpoint circle algorithm; the whole circle must fit on screen.
    pub fn set_circle(&mut self, cx: u16, cy: u16, r: u16, color: Color) -> Result<(), Error> {
        if r > cx || r > cy {
            return Err(Error::OutOfBounds {
                x: u32::from(cx.saturating_sub(r)),
                y: u32::from(cy.saturating_sub(r)),
            });
        }
        check(u32::from(cx) + u32::from(r), u32::from(cy) + u32::from(r))?;
        let packed = color.pack();

        let (cx, cy) = (i32::from(cx), i32::from(cy));
        let mut x = i32::from(r);
        let mut y = 0;
        let mut err = 1 - x;

        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx - x, cy + y),
                (cx - x, cy - y),
                (cx - y, cy - x),
                (cx + y, cy - x),
                (cx + x, cy - y),
            ] {
                self.put(px as u16, py as u16, packed);
            }

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
        Ok(())
    }

    /// Fill the display buffer
    pub fn fill(&mut self, color: Color) {
        let packed = color.pack();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.put(x, y, packed);
            }
        }
    }

    /// Copy an image into the buffer, starting at the top left corner.
    ///
    /// No scaling: the image must not be larger than the screen. Channels
    /// are read as 8-bit RGB; alpha is ignored.
    pub fn set_image<I>(&mut self, image: &I) -> Result<(), Error>
    where
        I: GenericImageView,
        I::Pixel: image::Pixel<Subpixel = u8>,
    {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Ok(());
        }
        check(w - 1, h - 1)?;

        for (x, y, p) in image.pixels() {
            let [r, g, b] = p.to_rgb().0;
            self.put(x as u16, y as u16, Color::new(r, g, b).pack());
        }
        Ok(())
    }

    /// Clear the buffer to black
    pub fn clear(&mut self) {
        self.buffer = vec![0; BUFFER_LEN];
    }
}

/// For use with embedded_grahics; pixels off the screen are clipped
impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            if x < WIDTH && y < HEIGHT {
                self.put(x, y, Color::from(color).pack());
            }
        }
        Ok(())
    }
}

/// For use with embedded_grahics
impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH.into(), HEIGHT.into())
    }
}
