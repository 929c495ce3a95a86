//! Display interface using SPI
use std::sync::{Mutex, MutexGuard};

use core::convert::Infallible;

use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, OutputPin},
    spi::SpiBus,
};

/// Reset pulse low and high hold time
const RESET_PULSE_US: u32 = 5;
/// Power-up settle time after reset, datasheet minimum is well below this
const RESET_SETTLE_MS: u32 = 150;

/// Chip-select placeholder for modules where CS is tied low or handled by the bus.
///
/// Pass `None::<NoChipSelect>` as the chip-select pin.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoChipSelect;

impl ErrorType for NoChipSelect {
    type Error = Infallible;
}

impl OutputPin for NoChipSelect {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Everything that must be driven together during one transfer
struct Link<SPI, DC, RST, CS> {
    /// Open bus session, `None` before init and after close
    spi: Option<SPI>,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting, active low
    rst: RST,
    /// Chip select, active low, `None` when not under software control
    cs: Option<CS>,
}

/// The command protocol layer of the SSD1331.
///
/// Every transfer holds one lock for its whole CS/DC/write/CS sequence, so
/// the interface can be shared between threads without interleaving
/// command and data phases.
pub struct DisplayInterface<SPI, DC, RST, CS> {
    link: Mutex<Link<SPI, DC, RST, CS>>,
}

impl<SPI, DC, RST, CS> DisplayInterface<SPI, DC, RST, CS> {
    /// Create the interface with its pins; the bus is attached on init
    pub fn new(dc: DC, rst: RST, cs: Option<CS>) -> Self {
        DisplayInterface {
            link: Mutex::new(Link {
                spi: None,
                dc,
                rst,
                cs,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Link<SPI, DC, RST, CS>>, DisplayError> {
        self.link.lock().map_err(|_| {
            log::error!("Display interface lock poisoned by a panicking transfer");
            DisplayError::BusWriteError
        })
    }

    /// Lock without failing; attach and detach must not lose a bus session
    fn lock_recovered(&self) -> MutexGuard<'_, Link<SPI, DC, RST, CS>> {
        match self.link.lock() {
            Ok(link) => link,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Hand an open bus session to the interface
    pub(crate) fn attach(&self, spi: SPI) {
        self.lock_recovered().spi = Some(spi);
    }

    /// Take the bus session back, leaving the interface without a bus
    pub(crate) fn detach(&self) -> Option<SPI> {
        self.lock_recovered().spi.take()
    }

    /// True while a bus session is attached
    pub fn is_attached(&self) -> bool {
        self.lock().map(|link| link.spi.is_some()).unwrap_or(false)
    }

    /// True when chip select is under software control
    pub fn has_chip_select(&self) -> bool {
        self.lock().map(|link| link.cs.is_some()).unwrap_or(false)
    }
}

impl<SPI, DC, RST, CS> DisplayInterface<SPI, DC, RST, CS>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    RST: OutputPin,
    CS: OutputPin,
{
    /// Drive chip select low for the rest of the init sequence
    pub(crate) fn select(&self) -> Result<(), DisplayError> {
        let mut link = self.lock()?;
        if let Some(cs) = link.cs.as_mut() {
            cs.set_low().map_err(|_| DisplayError::CSError)?;
        }
        Ok(())
    }

    /// Resets the controller: low pulse on RST, then wait for it to power up
    pub(crate) fn reset(&self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        let mut link = self.lock()?;
        link.rst.set_low().map_err(|_| DisplayError::RSError)?;
        delay.delay_us(RESET_PULSE_US);
        link.rst.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_us(RESET_PULSE_US);
        delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    /// Basic function for sending commands, opcode and parameters in one transfer
    pub(crate) fn cmd(&self, command: &[u8]) -> Result<(), DisplayError> {
        log::debug!("Sending command {:02X?}", command);
        // low for commands
        self.transfer(false, command)
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data(&self, data: &[u8]) -> Result<(), DisplayError> {
        log::debug!("Sending {} bytes of data", data.len());
        // high for data
        self.transfer(true, data)
    }

    fn transfer(&self, dc_high: bool, bytes: &[u8]) -> Result<(), DisplayError> {
        let mut guard = self.lock()?;
        let link = &mut *guard;

        let Some(spi) = link.spi.as_mut() else {
            log::error!("Transfer attempted without an open bus");
            return Err(DisplayError::BusWriteError);
        };

        let Some(cs) = link.cs.as_mut() else {
            return send(spi, &mut link.dc, dc_high, bytes);
        };

        cs.set_low().map_err(|_| DisplayError::CSError)?;
        let sent = send(spi, &mut link.dc, dc_high, bytes);
        // CS goes high again even when the transfer failed; the first error wins
        let released = cs.set_high().map_err(|_| DisplayError::CSError);
        sent.and(released)
    }
}

/// DC phase and the write itself, without chip select
fn send<SPI, DC>(
    spi: &mut SPI,
    dc: &mut DC,
    dc_high: bool,
    bytes: &[u8],
) -> Result<(), DisplayError>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
{
    let level = if dc_high { dc.set_high() } else { dc.set_low() };
    level.map_err(|_| DisplayError::DCError)?;

    spi.write(bytes).and_then(|()| spi.flush()).map_err(|e| {
        log::error!("SPI write error for {} bytes: {:?}", bytes.len(), e);
        DisplayError::BusWriteError
    })
}
