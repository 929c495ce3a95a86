//! Locally cached display state
//!
//! The controller has no read-back over this interface, so [`Status`] only
//! reflects the commands this driver has sent successfully.

use core::fmt;

use crate::ssd1331::cmd::Cmd;

/// Panel power state, set by the display on/off commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Power {
    /// Sleep mode
    #[default]
    Off = Cmd::DISPLAY_OFF,
    /// Normal brightness
    On = Cmd::DISPLAY_ON,
    /// Reduced brightness, see [`configure_dim_mode`](crate::Ssd1331::configure_dim_mode)
    OnDim = Cmd::DISPLAY_ON_DIM,
}

impl Power {
    /// True for both the normal and the dim on state
    pub fn is_on(self) -> bool {
        matches!(self, Power::On | Power::OnDim)
    }
}

/// Display mode; the discriminant is the command byte
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayMode {
    /// Show the contents of display RAM
    #[default]
    Normal = 0xA4,
    /// All pixels at full gray scale
    EntireOn = 0xA5,
    /// All pixels off
    EntireOff = 0xA6,
    /// Inverted gray scale
    Inverse = 0xA7,
}

/// Time interval between scroll steps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ScrollStep {
    /// 6 frames
    Frames6 = 0,
    /// 10 frames
    Frames10 = 1,
    /// 100 frames
    Frames100 = 2,
    /// 200 frames
    Frames200 = 3,
}

impl ScrollStep {
    /// Frames between two scroll steps
    pub fn frames(self) -> u16 {
        match self {
            ScrollStep::Frames6 => 6,
            ScrollStep::Frames10 => 10,
            ScrollStep::Frames100 => 100,
            ScrollStep::Frames200 => 200,
        }
    }
}

/// Continuous scrolling state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scroll {
    /// No scrolling
    #[default]
    Idle,
    /// Scrolling with the given interval
    Scrolling(ScrollStep),
}

impl Scroll {
    /// True while scrolling is active
    pub fn is_active(self) -> bool {
        matches!(self, Scroll::Scrolling(_))
    }
}

/// Everything the driver knows about the panel state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Status {
    /// Power state
    pub power: Power,
    /// Display mode
    pub mode: DisplayMode,
    /// Scroll state
    pub scroll: Scroll,
    /// The MCU interface ignores commands other than unlock while locked
    pub locked: bool,
}

impl Status {
    /// State right after a successful init
    pub const READY: Status = Status {
        power: Power::On,
        mode: DisplayMode::Normal,
        scroll: Scroll::Idle,
        locked: false,
    };
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Power::Off => "DisplayOff",
            Power::On => "DisplayOn",
            Power::OnDim => "DisplayOnDim",
        })
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisplayMode::Normal => "Normal",
            DisplayMode::EntireOn => "EntireOn",
            DisplayMode::EntireOff => "EntireOff",
            DisplayMode::Inverse => "Inverse",
        })
    }
}

impl fmt::Display for ScrollStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScrollStep::Frames6 => "Frames6",
            ScrollStep::Frames10 => "Frames10",
            ScrollStep::Frames100 => "Frames100",
            ScrollStep::Frames200 => "Frames200",
        })
    }
}

impl fmt::Display for Scroll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scroll::Idle => f.write_str("Idle"),
            Scroll::Scrolling(step) => write!(f, "Scrolling({step})"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "power={} mode={} scroll={} locked={}",
            self.power, self.mode, self.scroll, self.locked
        )
    }
}
