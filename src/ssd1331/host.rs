//! Platform side of the bus: peripheral bring-up and SPI sessions
//!
//! The driver never opens hardware itself. An implementation of [`Host`]
//! for the target platform (spidev, esp-idf, a test double...) hands out an
//! [`SpiBus`] for the configured address.

use embedded_hal::spi::{Mode, SpiBus, MODE_3};
use fugit::HertzU32;

/// Bus parameters for one SSD1331 session.
///
/// Mode and word size are fixed by the controller: clock idle high, data
/// sampled on the trailing edge (mode 3), 8-bit words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusConfig {
    /// SPI clock frequency
    pub frequency: HertzU32,
    /// Clock polarity and phase, always [`MODE_3`]
    pub mode: Mode,
    /// Bits per word, always 8
    pub word_size: u8,
}

impl BusConfig {
    /// Bus configuration at the given clock frequency
    pub fn new(frequency: HertzU32) -> Self {
        BusConfig {
            frequency,
            mode: MODE_3,
            word_size: 8,
        }
    }
}

/// Opens and closes bus sessions on the platform.
pub trait Host {
    /// The bus session, a full-duplex or write-only SPI bus
    type Bus: SpiBus<u8>;

    /// Bring up the platform's peripheral drivers.
    ///
    /// Must be idempotent: several drivers may share one platform.
    fn acquire(&mut self) -> anyhow::Result<()>;

    /// Open the bus named `address` with the given configuration
    fn open(&mut self, address: &str, config: &BusConfig) -> anyhow::Result<Self::Bus>;

    /// Release a bus previously returned by [`Host::open`]
    fn close(&mut self, bus: Self::Bus) -> anyhow::Result<()>;
}

impl<H: Host + ?Sized> Host for &mut H {
    type Bus = H::Bus;

    fn acquire(&mut self) -> anyhow::Result<()> {
        (**self).acquire()
    }

    fn open(&mut self, address: &str, config: &BusConfig) -> anyhow::Result<Self::Bus> {
        (**self).open(address, config)
    }

    fn close(&mut self, bus: Self::Bus) -> anyhow::Result<()> {
        (**self).close(bus)
    }
}
