//! Driver for the SSD1331 96x64 16-bit color OLED controller over SPI.
//!
//! ```ignore
//! use fugit::RateExtU32;
//! use ssd1331::{Color, NoChipSelect, Ssd1331};
//!
//! let mut oled = Ssd1331::new(host, "/dev/spidev0.0", 10.MHz(), rst, dc, None::<NoChipSelect>, delay);
//! oled.init()?;
//! oled.set_circle(48, 32, 20, Color::GREEN)?;
//! oled.display()?;
//! ```
//!
//! See [`ssd1331`] for the details of the command and drawing model.

pub mod ssd1331;

pub use crate::ssd1331::color::Color;
pub use crate::ssd1331::driver::{Ssd1331, INIT_SEQUENCE};
pub use crate::ssd1331::error::{DisplayError, Error};
pub use crate::ssd1331::graphics::Framebuffer;
pub use crate::ssd1331::host::{BusConfig, Host};
pub use crate::ssd1331::interface::{DisplayInterface, NoChipSelect};
pub use crate::ssd1331::status::{DisplayMode, Power, Scroll, ScrollStep, Status};
pub use crate::ssd1331::{BUFFER_LEN, HEIGHT, WIDTH};
