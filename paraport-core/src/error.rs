//! Pin errors
//!
//! Every illegal request on a pin surfaces one of these without changing
//! any state. Register reads and writes themselves cannot fail.

use core::fmt;

use crate::pin::{Direction, DriveMode, Pull};

/// Errors from pin operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// The pin cannot be used in the requested direction
    DirectionNotAllowed(Direction),
    /// Operation requires the pin to be an input
    NotAnInput,
    /// Operation requires the pin to be an output
    NotAnOutput,
    /// Pull mode is fixed by the hardware
    PullFixed {
        /// The pin's only supported pull mode
        fixed: Pull,
        /// What the caller asked for
        requested: Pull,
    },
    /// Drive mode is fixed by the hardware
    DriveModeFixed {
        /// The pin's only supported drive mode
        fixed: DriveMode,
        /// What the caller asked for
        requested: DriveMode,
    },
    /// The pin is already bound to another `DigitalInOut`
    PinInUse,
    /// No pin with that name or position exists in the map
    UnknownPin,
}

/// Broad classes of [`GpioError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Direction not permitted for this pin
    Capability,
    /// Operation invalid for the current direction
    State,
    /// Attempt to change a fixed hardware property
    Config,
    /// Pin already bound
    Binding,
    /// No such pin in the map
    Lookup,
}

impl GpioError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GpioError::DirectionNotAllowed(_) => ErrorKind::Capability,
            GpioError::NotAnInput | GpioError::NotAnOutput => ErrorKind::State,
            GpioError::PullFixed { .. } | GpioError::DriveModeFixed { .. } => ErrorKind::Config,
            GpioError::PinInUse => ErrorKind::Binding,
            GpioError::UnknownPin => ErrorKind::Lookup,
        }
    }
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::DirectionNotAllowed(Direction::Input) => {
                f.write_str("the pin cannot be used as an input")
            }
            GpioError::DirectionNotAllowed(Direction::Output) => {
                f.write_str("the pin cannot be used as an output")
            }
            GpioError::NotAnInput => f.write_str("not an input"),
            GpioError::NotAnOutput => f.write_str("not an output"),
            GpioError::PullFixed { fixed, requested } => write!(
                f,
                "pin pull mode cannot be changed from {:?} to {:?}",
                fixed, requested
            ),
            GpioError::DriveModeFixed { fixed, requested } => write!(
                f,
                "pin drive mode cannot be changed from {:?} to {:?}",
                fixed, requested
            ),
            GpioError::PinInUse => f.write_str("pin is already in use"),
            GpioError::UnknownPin => f.write_str("no such pin"),
        }
    }
}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
