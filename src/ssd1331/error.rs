//! Errors returned by the driver

use core::fmt;

pub use display_interface::DisplayError;

/// Driver error
#[derive(Debug)]
pub enum Error {
    /// Peripheral bring-up, bus open or bus close failed on the host
    Host(anyhow::Error),
    /// A pin or bus transfer failed; the command stream is in an unknown state
    Interface(DisplayError),
    /// Coordinate outside the 96x64 screen
    OutOfBounds {
        /// Column
        x: u32,
        /// Row
        y: u32,
    },
    /// The driver was never initialized, or its last init failed
    NotInitialized,
    /// Init called on a driver with an open bus
    AlreadyInitialized,
    /// The bus was closed; call init again to reopen it
    Closed,
}

impl Error {
    /// True for errors after which the driver must be initialized again
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Host(_) | Error::Interface(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Host(e) => write!(f, "host error: {e}"),
            Error::Interface(e) => write!(f, "display interface error: {e:?}"),
            Error::OutOfBounds { x, y } => write!(f, "pixel ({x}, {y}) is out of bounds"),
            Error::NotInitialized => f.write_str("display not initialized"),
            Error::AlreadyInitialized => f.write_str("display already initialized"),
            Error::Closed => f.write_str("display bus closed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Host(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Interface(e)
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Host(e)
    }
}
