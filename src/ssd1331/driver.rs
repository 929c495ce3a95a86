//! SSD1331 Display Driver Implementation
//!
//! This module contains the main driver implementation for the SSD1331 OLED controller.
//! It provides the session lifecycle, the command set, and the drawing functions that
//! work on the in-memory framebuffer.
//!
//! ## Architecture
//!
//! ### Lifecycle
//! - `new()` - Bind the host, bus address, clock and pins; nothing is opened yet
//! - `init()` - Open the bus, reset the panel, send the init sequence
//! - `close()` - Hand the bus back to the host
//!
//! ### Commands (one transfer each, status updated after success)
//! - `display_on()`, `display_on_dim()`, `display_off()`
//! - `set_display_mode()`, `configure_dim_mode()`, `set_rgb_contrast()`
//! - `activate_scroll()`, `deactivate_scroll()`
//! - `lock()`, `unlock()`
//! - `draw_rect()` - drawn by the controller, bypasses the framebuffer
//!
//! ### Framebuffer
//! - `set_pixel()`, `set_line()`, `set_hline()`, `set_vline()`, `set_circle()`
//! - `fill()`, `set_image()`, `clear()`
//! - `display()`, `clear_display()`
//!
//! ## Status
//!
//! [`Status`] is a local shadow of the panel state. It is written only after
//! the matching command went out without error and is never read back from
//! the controller.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use fugit::HertzU32;

use crate::ssd1331::color::Color;
use crate::ssd1331::error::Error;
use crate::ssd1331::graphics::Framebuffer;
use crate::ssd1331::host::{BusConfig, Host};
use crate::ssd1331::interface::DisplayInterface;
use crate::ssd1331::status::{DisplayMode, Power, Scroll, ScrollStep, Status};
use crate::ssd1331::{cmd::Cmd, flag::Flag, HEIGHT, WIDTH};

/// Power-on sequence, sent as one command transfer
pub const INIT_SEQUENCE: [u8; 31] = [
    Cmd::DISPLAY_OFF,
    Cmd::SET_COLUMN_ADDRESS,
    0x00,
    (WIDTH - 1) as u8,
    Cmd::SET_ROW_ADDRESS,
    0x00,
    (HEIGHT - 1) as u8,
    Cmd::MASTER_CURRENT,
    Flag::MASTER_CURRENT_HALF,
    Cmd::REMAP_COLOR_DEPTH,
    Flag::REMAP_65K_COLOR,
    Cmd::DISPLAY_START_LINE,
    Flag::START_LINE_TOP,
    Cmd::DISPLAY_OFFSET,
    Flag::DISPLAY_OFFSET_NONE,
    DisplayMode::Normal as u8,
    Cmd::MULTIPLEX_RATIO,
    Flag::MULTIPLEX_64,
    Cmd::MASTER_CONFIG,
    Flag::MASTER_CONFIG_EXTERNAL_VCC,
    Cmd::POWER_SAVE_MODE,
    Flag::POWER_SAVE_DISABLE,
    Cmd::PHASE_PERIOD,
    Flag::PHASE_PERIOD_DEFAULT,
    Cmd::CLOCK_DIVIDER,
    Flag::CLOCK_DIVIDER_DEFAULT,
    Cmd::PRE_CHARGE_LEVEL,
    Flag::PRE_CHARGE_DEFAULT,
    Cmd::VCOMH,
    Flag::VCOMH_DEFAULT,
    Cmd::DISPLAY_ON,
];

/// Lifecycle of the bus session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Uninitialized,
    Initializing,
    Ready,
    Closed,
}

/// SSD1331 OLED Display Driver
///
/// Main driver struct that owns the display interface, the framebuffer and the
/// cached [`Status`].
///
/// ## Type Parameters
///
/// - `H` - [`Host`] that opens and closes the SPI bus
/// - `RST` - Reset output pin
/// - `DC` - Data/Command output pin
/// - `CS` - Chip select output pin, see [`NoChipSelect`](crate::NoChipSelect)
/// - `DELAY` - Delay provider for timing
pub struct Ssd1331<H: Host, RST, DC, CS, DELAY> {
    host: H,
    address: String,
    frequency: HertzU32,
    interface: DisplayInterface<H::Bus, DC, RST, CS>,
    delay: DELAY,
    state: State,
    host_ready: bool,
    status: Status,
    framebuffer: Option<Framebuffer>,
}

impl<H, RST, DC, CS, DELAY> Ssd1331<H, RST, DC, CS, DELAY>
where
    H: Host,
    RST: OutputPin,
    DC: OutputPin,
    CS: OutputPin,
    DELAY: DelayNs,
{
    /// Create the driver. Nothing touches the hardware until [`Ssd1331::init`].
    ///
    /// `address` names the bus on the host, e.g. `"/dev/spidev0.0"` or `"SPI0.0"`.
    /// Pass `None` for `cs` when chip select is not under software control.
    pub fn new(
        host: H,
        address: impl Into<String>,
        frequency: HertzU32,
        rst: RST,
        dc: DC,
        cs: Option<CS>,
        delay: DELAY,
    ) -> Self {
        Ssd1331 {
            host,
            address: address.into(),
            frequency,
            interface: DisplayInterface::new(dc, rst, cs),
            delay,
            state: State::Uninitialized,
            host_ready: false,
            status: Status::default(),
            framebuffer: None,
        }
    }

    /// Initialize the display.
    ///
    /// Opens the bus, pulses reset, sends [`INIT_SEQUENCE`] and allocates a
    /// black framebuffer. On any error the bus is closed again and the driver
    /// is uninitialized, also after a previous close; call `init` again to
    /// start over from the reset pulse.
    pub fn init(&mut self) -> Result<(), Error> {
        match self.state {
            State::Ready | State::Initializing => return Err(Error::AlreadyInitialized),
            State::Uninitialized | State::Closed => {}
        }
        log::info!(
            "Initializing SSD1331 on {} at {} Hz",
            self.address,
            self.frequency.to_Hz()
        );

        if let Err(e) = self.open_session() {
            log::error!("SSD1331 init failed: {}", e);
            self.release_bus();
            self.state = State::Uninitialized;
            return Err(e);
        }

        self.status = Status::READY;
        self.framebuffer = Some(Framebuffer::new());
        self.state = State::Ready;
        log::info!("SSD1331 ready, {}", self.status);
        Ok(())
    }

    fn open_session(&mut self) -> Result<(), Error> {
        if !self.host_ready {
            self.host.acquire()?;
            self.host_ready = true;
        }

        let config = BusConfig::new(self.frequency);
        let bus = self.host.open(&self.address, &config)?;
        self.interface.attach(bus);
        self.state = State::Initializing;

        // CS stays low until the first framed transfer raises it
        self.interface.select()?;
        self.interface.reset(&mut self.delay)?;
        self.interface.cmd(&INIT_SEQUENCE)?;
        Ok(())
    }

    /// Close the bus when init failed half way; the original error wins
    fn release_bus(&mut self) {
        if let Some(bus) = self.interface.detach() {
            if let Err(e) = self.host.close(bus) {
                log::error!("Closing bus after failed init: {}", e);
            }
        }
    }

    /// Close the bus.
    ///
    /// The framebuffer and status stay in memory; bus operations fail with
    /// [`Error::Closed`] until the next [`Ssd1331::init`].
    pub fn close(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        log::info!("Closing SSD1331 on {}", self.address);
        self.state = State::Closed;
        match self.interface.detach() {
            Some(bus) => self.host.close(bus).map_err(Error::Host),
            None => Ok(()),
        }
    }

    fn ensure_ready(&self) -> Result<(), Error> {
        match self.state {
            State::Ready => Ok(()),
            State::Closed => Err(Error::Closed),
            State::Uninitialized | State::Initializing => Err(Error::NotInitialized),
        }
    }

    /// Send one command transfer on a ready bus
    fn command(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.ensure_ready()?;
        let opcode = bytes.first().copied().unwrap_or_default();
        if self.status.locked && bytes != [Cmd::COMMAND_LOCK, Flag::COMMAND_UNLOCK] {
            log::warn!("Command 0x{:02X} sent while the interface is locked", opcode);
        }
        self.interface.cmd(bytes).map_err(|e| {
            log::error!("Command 0x{:02X} failed: {:?}", opcode, e);
            Error::Interface(e)
        })
    }

    /// Returns the resolution of the OLED, width and height
    pub fn resolution(&self) -> (u16, u16) {
        (WIDTH, HEIGHT)
    }

    /// Cached panel state
    pub fn status(&self) -> Status {
        self.status
    }

    /// True between a successful init and close
    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    /// The host the driver was created with
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, e.g. to reconfigure it between sessions
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The pin and bus interface
    pub fn interface(&self) -> &DisplayInterface<H::Bus, DC, RST, CS> {
        &self.interface
    }

    /// Raw framebuffer bytes
    pub fn buffer(&self) -> Result<&[u8], Error> {
        self.framebuffer().map(Framebuffer::as_bytes)
    }

    /// The framebuffer
    pub fn framebuffer(&self) -> Result<&Framebuffer, Error> {
        self.framebuffer.as_ref().ok_or(Error::NotInitialized)
    }

    /// The framebuffer, e.g. as an `embedded_graphics` draw target
    pub fn framebuffer_mut(&mut self) -> Result<&mut Framebuffer, Error> {
        self.framebuffer.as_mut().ok_or(Error::NotInitialized)
    }

    // ==================== Power ====================

    fn set_power(&mut self, power: Power) -> Result<(), Error> {
        self.command(&[power as u8])?;
        self.status.power = power;
        log::debug!("Display power now {}", power);
        Ok(())
    }

    /// Turn on the OLED
    pub fn display_on(&mut self) -> Result<(), Error> {
        self.set_power(Power::On)
    }

    /// Turn on the OLED in dim mode
    pub fn display_on_dim(&mut self) -> Result<(), Error> {
        self.set_power(Power::OnDim)
    }

    /// Turn off the OLED (sleep mode)
    pub fn display_off(&mut self) -> Result<(), Error> {
        self.set_power(Power::Off)
    }

    /// Configure dim mode: contrast per color and pre-charge voltage.
    ///
    /// Contrast is 0..=255 per channel, `pre_charge` 0..=31. Takes effect
    /// with [`Ssd1331::display_on_dim`].
    pub fn configure_dim_mode(&mut self, r: u8, g: u8, b: u8, pre_charge: u8) -> Result<(), Error> {
        self.command(&[
            Cmd::DIM_MODE_SETTING,
            Flag::DIM_MODE_RESERVED,
            r,
            g,
            b,
            pre_charge,
        ])
    }

    // ==================== Mode and contrast ====================

    /// Change the display mode
    pub fn set_display_mode(&mut self, mode: DisplayMode) -> Result<(), Error> {
        self.command(&[mode as u8])?;
        self.status.mode = mode;
        log::debug!("Display mode now {}", mode);
        Ok(())
    }

    /// Set the contrast of each color; the panel saturates above 128
    pub fn set_rgb_contrast(&mut self, r: u8, g: u8, b: u8) -> Result<(), Error> {
        self.command(&[Cmd::CONTRAST_A, r, Cmd::CONTRAST_B, g, Cmd::CONTRAST_C, b])
    }

    // ==================== Scrolling ====================

    /// Set up continuous scrolling and start it.
    ///
    /// - `hor_offset` number of columns as horizontal scroll offset
    /// - `start_row` first row to scroll
    /// - `hor_rows` number of rows to scroll horizontally
    /// - `ver_offset` number of rows as vertical scroll offset
    /// - `step` time interval between each scroll step
    ///
    /// The offset slot of the setup command carries `hor_rows`, matching
    /// the byte stream these modules are known to work with; `hor_offset`
    /// is only logged.
    pub fn activate_scroll(
        &mut self,
        hor_offset: u8,
        start_row: u8,
        hor_rows: u8,
        ver_offset: u8,
        step: ScrollStep,
    ) -> Result<(), Error> {
        log::debug!(
            "Scrolling rows {}+{}, offsets h={} v={}, every {} frames",
            start_row,
            hor_rows,
            hor_offset,
            ver_offset,
            step.frames()
        );
        self.command(&[
            Cmd::CONTINUOUS_SCROLL_SETUP,
            hor_rows,
            start_row,
            hor_rows,
            ver_offset,
            step as u8,
            Cmd::ACTIVATE_SCROLL,
        ])?;
        self.status.scroll = Scroll::Scrolling(step);
        Ok(())
    }

    /// Stop scrolling
    pub fn deactivate_scroll(&mut self) -> Result<(), Error> {
        self.command(&[Cmd::DEACTIVATE_SCROLL])?;
        self.status.scroll = Scroll::Idle;
        Ok(())
    }

    // ==================== Interface lock ====================

    /// Lock the MCU interface; the controller ignores commands until unlocked
    pub fn lock(&mut self) -> Result<(), Error> {
        self.command(&[Cmd::COMMAND_LOCK, Flag::COMMAND_LOCK])?;
        self.status.locked = true;
        Ok(())
    }

    /// Unlock the MCU interface
    pub fn unlock(&mut self) -> Result<(), Error> {
        self.command(&[Cmd::COMMAND_LOCK, Flag::COMMAND_UNLOCK])?;
        self.status.locked = false;
        Ok(())
    }

    // ==================== Drawing ====================

    /// Draw a rectangle with the controller's graphic acceleration.
    ///
    /// Corners are inclusive. The framebuffer is not touched, so the next
    /// [`Ssd1331::display`] overwrites the rectangle.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rect(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        line: Color,
        fill: Color,
        filled: bool,
    ) -> Result<(), Error> {
        for (x, y) in [(x0, y0), (x1, y1)] {
            if x >= WIDTH || y >= HEIGHT {
                return Err(Error::OutOfBounds {
                    x: x.into(),
                    y: y.into(),
                });
            }
        }
        let fill_mode = if filled {
            Flag::FILL_RECTANGLE_ON
        } else {
            Flag::FILL_RECTANGLE_OFF
        };

        self.command(&[
            Cmd::FILL_ENABLE,
            fill_mode,
            Cmd::DRAW_RECTANGLE,
            x0 as u8,
            y0 as u8,
            x1 as u8,
            y1 as u8,
            line.r,
            line.g,
            line.b,
            fill.r,
            fill.g,
            fill.b,
        ])
    }

    /// Set the pixel in the buffer
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), Error> {
        self.framebuffer_mut()?.set_pixel(x, y, color)
    }

    /// Write a line into the buffer
    pub fn set_line(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Color,
    ) -> Result<(), Error> {
        self.framebuffer_mut()?.set_line(x0, y0, x1, y1, color)
    }

    /// Write a horizontal line of `w` pixels into the buffer
    pub fn set_hline(&mut self, x: u16, y: u16, w: u16, color: Color) -> Result<(), Error> {
        self.framebuffer_mut()?.set_hline(x, y, w, color)
    }

    /// Write a vertical line of `h` pixels into the buffer
    pub fn set_vline(&mut self, x: u16, y: u16, h: u16, color: Color) -> Result<(), Error> {
        self.framebuffer_mut()?.set_vline(x, y, h, color)
    }

    /// Write a circle outline into the buffer
    pub fn set_circle(&mut self, cx: u16, cy: u16, r: u16, color: Color) -> Result<(), Error> {
        self.framebuffer_mut()?.set_circle(cx, cy, r, color)
    }

    /// Fill the display buffer
    pub fn fill(&mut self, color: Color) -> Result<(), Error> {
        self.framebuffer_mut()?.fill(color);
        Ok(())
    }

    /// Set the image pixels to buffer. Images up to the display size are supported.
    pub fn set_image<I>(&mut self, image: &I) -> Result<(), Error>
    where
        I: image::GenericImageView,
        I::Pixel: image::Pixel<Subpixel = u8>,
    {
        self.framebuffer_mut()?.set_image(image)
    }

    /// Clear the buffer
    pub fn clear(&mut self) -> Result<(), Error> {
        self.framebuffer_mut()?.clear();
        Ok(())
    }

    /// Send buffer to the OLED
    pub fn display(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        let framebuffer = self.framebuffer.as_ref().ok_or(Error::NotInitialized)?;
        self.interface.data(framebuffer.as_bytes())?;
        Ok(())
    }

    /// Clear the buffer then apply display
    pub fn clear_display(&mut self) -> Result<(), Error> {
        self.clear()?;
        self.display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ssd1331::interface::NoChipSelect;
    use crate::ssd1331::BUFFER_LEN;
    use display_interface::DisplayError;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
    use embedded_hal_mock::eh1::MockError;
    use fugit::RateExtU32;
    use std::io::ErrorKind;

    /// Hands out clones of one SPI mock and records what it was asked for
    #[derive(Default)]
    struct MockHost {
        spi: Option<SpiMock<u8>>,
        acquired: usize,
        opened: Vec<(String, BusConfig)>,
        closed: usize,
        fail_open: bool,
    }

    impl Host for MockHost {
        type Bus = SpiMock<u8>;

        fn acquire(&mut self) -> anyhow::Result<()> {
            self.acquired += 1;
            Ok(())
        }

        fn open(&mut self, address: &str, config: &BusConfig) -> anyhow::Result<SpiMock<u8>> {
            if self.fail_open {
                anyhow::bail!("no bus named {address}");
            }
            self.opened.push((address.to_string(), *config));
            self.spi
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no mock bus"))
        }

        fn close(&mut self, _bus: SpiMock<u8>) -> anyhow::Result<()> {
            self.closed += 1;
            Ok(())
        }
    }

    type TestDriver = Ssd1331<MockHost, PinMock, PinMock, NoChipSelect, NoopDelay>;

    fn init_bytes() -> Vec<u8> {
        INIT_SEQUENCE.to_vec()
    }

    fn spi_write(data: &[u8]) -> [SpiTransaction<u8>; 2] {
        [
            SpiTransaction::write_vec(data.to_vec()),
            SpiTransaction::flush(),
        ]
    }

    fn reset_pulse() -> Vec<PinTransaction> {
        vec![
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]
    }

    /// Driver without software CS, not yet initialized
    fn driver(
        spi_txns: &[SpiTransaction<u8>],
        dc_txns: &[PinTransaction],
        rst_txns: &[PinTransaction],
    ) -> (TestDriver, SpiMock<u8>, PinMock, PinMock) {
        let spi = SpiMock::new(spi_txns);
        let dc = PinMock::new(dc_txns);
        let rst = PinMock::new(rst_txns);

        let host = MockHost {
            spi: Some(spi.clone()),
            ..Default::default()
        };
        let driver = Ssd1331::new(
            host,
            "bus0",
            10.MHz(),
            rst.clone(),
            dc.clone(),
            None::<NoChipSelect>,
            NoopDelay,
        );
        (driver, spi, dc, rst)
    }

    /// Initialized driver expecting `after` on the bus and `dc_after` on DC
    fn ready_driver(
        after: &[&[u8]],
        dc_after: &[PinState],
    ) -> (TestDriver, SpiMock<u8>, PinMock, PinMock) {
        let mut spi_txns: Vec<SpiTransaction<u8>> = spi_write(&init_bytes()).to_vec();
        for bytes in after {
            spi_txns.extend(spi_write(bytes));
        }
        let mut dc_txns = vec![PinTransaction::set(PinState::Low)];
        dc_txns.extend(dc_after.iter().map(|s| PinTransaction::set(*s)));

        let (mut driver, spi, dc, rst) = driver(&spi_txns, &dc_txns, &reset_pulse());
        driver.init().unwrap();
        (driver, spi, dc, rst)
    }

    #[test]
    fn init_sequence_bytes() {
        assert_eq!(
            init_bytes(),
            vec![
                0xAE, 0x15, 0x00, 0x5F, 0x75, 0x00, 0x3F, 0x87, 0x07, 0xA0, 0x72, 0xA1, 0x00,
                0xA2, 0x00, 0xA4, 0xA8, 0x3F, 0xAD, 0x8E, 0xB0, 0x0B, 0xB1, 0x31, 0xB3, 0xF0,
                0xBB, 0x3E, 0xBE, 0x3E, 0xAF,
            ]
        );
    }

    #[test]
    fn init_sets_ready_status_and_opens_mode_3() {
        let (driver, mut spi, mut dc, mut rst) = ready_driver(&[], &[]);

        assert!(driver.is_ready());
        assert_eq!(driver.status(), Status::READY);
        assert_eq!(driver.host().acquired, 1);
        assert_eq!(
            driver.host().opened,
            vec![("bus0".to_string(), BusConfig::new(10.MHz()))]
        );
        assert_eq!(driver.buffer().unwrap().len(), BUFFER_LEN);
        assert!(driver.buffer().unwrap().iter().all(|&b| b == 0));
        assert_eq!(driver.resolution(), (96, 64));

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn init_with_chip_select_holds_it_low_first() {
        let mut spi = SpiMock::new(&spi_write(&init_bytes()));
        let mut dc = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut rst = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut cs = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let host = MockHost {
            spi: Some(spi.clone()),
            ..Default::default()
        };
        let mut driver = Ssd1331::new(
            host,
            "bus0",
            10.MHz(),
            rst.clone(),
            dc.clone(),
            Some(cs.clone()),
            NoopDelay,
        );
        driver.init().unwrap();
        assert!(driver.interface().has_chip_select());

        spi.done();
        dc.done();
        rst.done();
        cs.done();
    }

    #[test]
    fn operations_before_init_fail() {
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);
        let mut driver: TestDriver = Ssd1331::new(
            MockHost::default(),
            "bus0",
            1.MHz(),
            rst.clone(),
            dc.clone(),
            None,
            NoopDelay,
        );

        assert!(matches!(driver.display_on(), Err(Error::NotInitialized)));
        assert!(matches!(driver.display(), Err(Error::NotInitialized)));
        assert!(matches!(
            driver.set_pixel(0, 0, Color::WHITE),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(driver.close(), Err(Error::NotInitialized)));
        assert_eq!(driver.status(), Status::default());

        dc.done();
        rst.done();
    }

    #[test]
    fn failed_open_leaves_driver_uninitialized() {
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);
        let host = MockHost {
            fail_open: true,
            ..Default::default()
        };
        let mut driver: TestDriver =
            Ssd1331::new(host, "bus9", 1.MHz(), rst.clone(), dc.clone(), None, NoopDelay);

        let err = driver.init().unwrap_err();
        assert!(matches!(err, Error::Host(_)));
        assert_eq!(err.to_string(), "host error: no bus named bus9");
        assert!(!driver.is_ready());
        assert!(driver.buffer().is_err());

        dc.done();
        rst.done();
    }

    #[test]
    fn failed_reset_closes_the_bus() {
        let mut spi = SpiMock::new(&[]);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[PinTransaction::set(PinState::Low)
            .with_error(MockError::Io(ErrorKind::NotConnected))]);

        let host = MockHost {
            spi: Some(spi.clone()),
            ..Default::default()
        };
        let mut driver: TestDriver =
            Ssd1331::new(host, "bus0", 1.MHz(), rst.clone(), dc.clone(), None, NoopDelay);

        assert!(matches!(
            driver.init(),
            Err(Error::Interface(DisplayError::RSError))
        ));
        assert!(!driver.is_ready());
        assert_eq!(driver.host().closed, 1);
        assert!(!driver.interface().is_attached());

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn second_init_is_rejected() {
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(&[], &[]);
        assert!(matches!(driver.init(), Err(Error::AlreadyInitialized)));
        assert_eq!(driver.host().opened.len(), 1);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn display_off_emits_0xae() {
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(&[&[0xAE]], &[PinState::Low]);

        driver.display_off().unwrap();
        assert_eq!(driver.status().power, Power::Off);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn power_commands() {
        let (mut driver, mut spi, mut dc, mut rst) =
            ready_driver(&[&[0xAC], &[0xAF]], &[PinState::Low, PinState::Low]);

        driver.display_on_dim().unwrap();
        assert_eq!(driver.status().power, Power::OnDim);
        driver.display_on().unwrap();
        assert_eq!(driver.status().power, Power::On);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn display_mode_byte_is_the_mode() {
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(&[&[0xA7]], &[PinState::Low]);

        driver.set_display_mode(DisplayMode::Inverse).unwrap();
        assert_eq!(driver.status().mode, DisplayMode::Inverse);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn contrast_sends_all_three_channels() {
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(
            &[&[0x81, 10, 0x82, 20, 0x83, 30]],
            &[PinState::Low],
        );

        driver.set_rgb_contrast(10, 20, 30).unwrap();

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn dim_mode_setting() {
        let (mut driver, mut spi, mut dc, mut rst) =
            ready_driver(&[&[0xAB, 0x00, 1, 2, 3, 31]], &[PinState::Low]);

        driver.configure_dim_mode(1, 2, 3, 31).unwrap();
        assert_eq!(driver.status(), Status::READY);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn scroll_on_and_off() {
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(
            &[&[0x27, 3, 2, 3, 4, 2, 0x2F], &[0x2E]],
            &[PinState::Low, PinState::Low],
        );

        driver
            .activate_scroll(1, 2, 3, 4, ScrollStep::Frames100)
            .unwrap();
        assert_eq!(
            driver.status().scroll,
            Scroll::Scrolling(ScrollStep::Frames100)
        );

        driver.deactivate_scroll().unwrap();
        assert_eq!(driver.status().scroll, Scroll::Idle);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn lock_and_unlock() {
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(
            &[&[0xFD, 0x16], &[0xFD, 0x12]],
            &[PinState::Low, PinState::Low],
        );

        driver.lock().unwrap();
        assert!(driver.status().locked);
        driver.unlock().unwrap();
        assert!(!driver.status().locked);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn failed_command_keeps_status() {
        let (mut driver, mut spi, mut dc, mut rst) = driver(
            &spi_write(&init_bytes()),
            &[
                PinTransaction::set(PinState::Low),
                PinTransaction::set(PinState::Low)
                    .with_error(MockError::Io(ErrorKind::NotConnected)),
            ],
            &reset_pulse(),
        );
        driver.init().unwrap();

        let err = driver.display_off().unwrap_err();
        assert!(matches!(err, Error::Interface(DisplayError::DCError)));
        assert!(err.is_fatal());
        assert_eq!(driver.status().power, Power::On);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn draw_rect_filled_and_outline() {
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(
            &[
                &[0x26, 0xA1, 0x22, 1, 2, 30, 40, 255, 0, 0, 0, 0, 255],
                &[0x26, 0xA0, 0x22, 0, 0, 95, 63, 1, 2, 3, 4, 5, 6],
            ],
            &[PinState::Low, PinState::Low],
        );

        driver
            .draw_rect(1, 2, 30, 40, Color::RED, Color::BLUE, true)
            .unwrap();
        driver
            .draw_rect(
                0,
                0,
                95,
                63,
                Color::new(1, 2, 3),
                Color::new(4, 5, 6),
                false,
            )
            .unwrap();
        assert!(driver.buffer().unwrap().iter().all(|&b| b == 0));

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn draw_rect_out_of_bounds_sends_nothing() {
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(&[], &[]);

        assert!(matches!(
            driver.draw_rect(0, 0, 96, 10, Color::WHITE, Color::WHITE, true),
            Err(Error::OutOfBounds { x: 96, y: 10 })
        ));

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn display_sends_the_buffer_as_data() {
        let mut frame = vec![0u8; BUFFER_LEN];
        frame[0] = 0xF8;
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(
            &[&frame, &frame],
            &[PinState::High, PinState::High],
        );

        driver.set_pixel(0, 0, Color::RED).unwrap();
        driver.display().unwrap();
        driver.display().unwrap();

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn clear_display_sends_zeros() {
        let zeros = vec![0u8; BUFFER_LEN];
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(&[&zeros], &[PinState::High]);

        driver.fill(Color::WHITE).unwrap();
        driver.clear_display().unwrap();
        assert!(driver.buffer().unwrap().iter().all(|&b| b == 0));

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn close_then_bus_operations_fail() {
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(&[], &[]);

        driver.set_hline(0, 0, 3, Color::WHITE).unwrap();
        driver.close().unwrap();
        assert_eq!(driver.host().closed, 1);
        assert!(!driver.is_ready());

        assert!(matches!(driver.close(), Err(Error::Closed)));
        assert!(matches!(driver.display(), Err(Error::Closed)));
        assert!(matches!(driver.display_on(), Err(Error::Closed)));
        // the buffer survives close
        driver.set_pixel(5, 5, Color::WHITE).unwrap();
        assert_eq!(driver.framebuffer().unwrap().pixel(2, 0).unwrap(), [0xFF, 0xFF]);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn reinit_after_close() {
        let mut spi_txns = spi_write(&init_bytes()).to_vec();
        spi_txns.extend(spi_write(&init_bytes()));
        let mut rst_txns = reset_pulse();
        rst_txns.extend(reset_pulse());
        let (mut driver, mut spi, mut dc, mut rst) = driver(
            &spi_txns,
            &[
                PinTransaction::set(PinState::Low),
                PinTransaction::set(PinState::Low),
            ],
            &rst_txns,
        );

        driver.init().unwrap();
        driver.close().unwrap();
        driver.init().unwrap();
        assert!(driver.is_ready());
        assert_eq!(driver.host().acquired, 1);
        assert_eq!(driver.host().opened.len(), 2);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn failed_reopen_after_close_is_uninitialized() {
        let (mut driver, mut spi, mut dc, mut rst) = ready_driver(&[], &[]);
        driver.close().unwrap();

        driver.host_mut().fail_open = true;
        assert!(matches!(driver.init(), Err(Error::Host(_))));
        assert!(!driver.is_ready());
        assert!(matches!(driver.display_on(), Err(Error::NotInitialized)));
        assert!(!driver.interface().is_attached());
        assert_eq!(driver.host().closed, 1);

        spi.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn borrowed_host_stays_with_the_caller() {
        let mut host = MockHost::default();
        let (mut driver, mut spi, mut dc, mut rst) = {
            let spi = SpiMock::new(&spi_write(&init_bytes()));
            host.spi = Some(spi.clone());
            let dc = PinMock::new(&[PinTransaction::set(PinState::Low)]);
            let rst = PinMock::new(&reset_pulse());
            let driver = Ssd1331::new(
                &mut host,
                "bus1",
                8.MHz(),
                rst.clone(),
                dc.clone(),
                None::<NoChipSelect>,
                NoopDelay,
            );
            (driver, spi, dc, rst)
        };

        driver.init().unwrap();
        driver.close().unwrap();
        drop(driver);

        assert_eq!(host.acquired, 1);
        assert_eq!(host.opened[0].0, "bus1");
        assert_eq!(host.closed, 1);

        spi.done();
        dc.done();
        rst.done();
    }
}
