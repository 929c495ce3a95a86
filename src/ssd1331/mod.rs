//! SSD1331 OLED Display Driver
//!
//! Used in the common 0.95" 96x64 RGB OLED modules.
//!
//! The split into command constants, a pin/bus interface and a driver follows
//! the [epd-waveshare](https://github.com/caemor/epd-waveshare) drivers.
//!
//!
//! ### Usage
//! The driver keeps one framebuffer in memory. To display something you:
//!
//! 1. call [`driver::Ssd1331::init`] to open the bus, reset the panel and send
//!    the power-on sequence
//! 1. draw onto the buffer with the primitives on [`driver::Ssd1331`], or
//!    with [`embedded_graphics`](https://github.com/jamwaffles/embedded-graphics)
//!    through [`driver::Ssd1331::framebuffer_mut`]
//! 1. then send the frame to the panel using [`driver::Ssd1331::display`]
//!
//! [`driver::Ssd1331::draw_rect`] is the exception: the controller draws the
//! rectangle itself and the framebuffer is not touched.
//!
//!
#![deny(missing_docs)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod color;
pub mod driver;
pub mod error;
pub mod graphics;
pub mod host;
pub mod interface;
pub mod status;

mod cmd;
mod flag;

/// Display height, pixels vertically
pub const HEIGHT: u16 = 64;

/// Display width, pixels horizontally
pub const WIDTH: u16 = 96;

/// Bytes per pixel in the framebuffer (16-bit color)
pub const BYTES_PER_PIXEL: usize = 2;

/// Framebuffer length in bytes
pub const BUFFER_LEN: usize = WIDTH as usize * HEIGHT as usize * BYTES_PER_PIXEL;
