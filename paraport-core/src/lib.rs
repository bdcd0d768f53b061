//! Register and pin model for a PC parallel port
//!
//! This crate contains everything that does not depend on how the port
//! registers are physically reached:
//!
//! - Bit helpers shared by every register operation
//! - Register address computation (SPP and EPP)
//! - Port direction control and bidirectional probing
//! - Pin capability records and the pin arena
//! - `DigitalInOut`, the GPIO-style binding over a pin
//! - `StandardPort` / `EppPort` register access
//! - Port configuration types
//!
//! Register access goes through [`paraport_hal::PortIo`], injected by the
//! caller at port initialization.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod address;
pub mod bits;
pub mod config;
pub mod digitalio;
pub mod direction;
pub mod error;
pub mod pin;
pub mod port;

pub use address::{PortAddress, Register};
pub use config::{BidirectionalMode, PortConfig, PortMode};
pub use digitalio::DigitalInOut;
pub use direction::PortDirection;
pub use error::{ErrorKind, GpioError};
pub use pin::{Direction, DriveMode, Pin, PinArena, Pull};
pub use port::{EppPort, StandardPort};
