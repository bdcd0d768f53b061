//! Port direction control
//!
//! Bit 5 of the control register selects whether the data lines are driven
//! by the port (forward) or left floating so an external device can drive
//! them (reverse). Only bidirectional (PS/2, EPP, ECP) ports honour the
//! bit; on a plain SPP port it reads back as zero regardless of writes.
//!
//! These are plain register transactions: no retries, no error reporting.

use paraport_hal::PortIo;

use crate::address::addresses;
use crate::bits::{check_bit, set_bit};

/// Direction bit in the control register
pub const DIRECTION_BIT: u8 = 5;

/// Control lines driven by [`reset_control_pins`]
///
/// nInit (bit 2) released; strobe, auto-linefeed and select-in inactive
/// (their lines are hardware inverted, so inactive is a written 0); IRQ
/// (bit 4) disabled.
pub const CONTROL_RESET: u8 = 0b0000_0100;

/// Physical direction of the data lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PortDirection {
    /// The port drives the data lines
    #[default]
    Forward = 0,
    /// The data lines are inputs
    Reverse = 1,
}

impl PortDirection {
    /// Direction encoded by the state of the direction bit
    pub const fn from_bit(set: bool) -> Self {
        if set {
            PortDirection::Reverse
        } else {
            PortDirection::Forward
        }
    }

    /// State of the direction bit for this direction
    pub const fn bit(self) -> bool {
        matches!(self, PortDirection::Reverse)
    }

    /// Get the direction as a byte value
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a direction from a byte value
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PortDirection::Forward),
            1 => Some(PortDirection::Reverse),
            _ => None,
        }
    }
}

/// Read the port direction from the control register
pub fn get_direction<IO: PortIo + ?Sized>(io: &IO, base: u16) -> PortDirection {
    let control = io.read_byte(addresses(base).control);
    PortDirection::from_bit(check_bit(control, DIRECTION_BIT))
}

/// Set the port direction
///
/// Read-modify-write of the control register; the other control lines keep
/// their current state. Takes effect on the physical port immediately.
pub fn set_direction<IO: PortIo + ?Sized>(io: &IO, base: u16, direction: PortDirection) {
    let address = addresses(base).control;
    let control = io.read_byte(address);
    io.write_byte(address, set_bit(control, DIRECTION_BIT, direction.bit()));
    log::debug!("port {:#x} direction -> {:?}", base, direction);
}

/// Check whether the port actually supports reverse mode
///
/// Switches the port to reverse and reads the direction bit back. A port
/// that started forward is returned to forward; a port that started in
/// reverse is left there whatever the outcome.
///
/// Destructive: the data lines float for the duration of the probe.
pub fn probe_bidirectional<IO: PortIo + ?Sized>(io: &IO, base: u16) -> bool {
    let original = get_direction(io, base);
    set_direction(io, base, PortDirection::Reverse);
    let supported = get_direction(io, base) == PortDirection::Reverse;

    if original == PortDirection::Forward {
        set_direction(io, base, PortDirection::Forward);
    }

    log::info!(
        "port {:#x} bidirectional probe: {}",
        base,
        if supported { "supported" } else { "not supported" }
    );
    supported
}

/// Bring the control register to a known state
///
/// Writes [`CONTROL_RESET`]. On a bidirectional port the currently measured
/// direction is kept; otherwise the port is forced forward.
pub fn reset_control_pins<IO: PortIo + ?Sized>(io: &IO, base: u16, is_bidirectional: bool) {
    let direction = if is_bidirectional {
        get_direction(io, base)
    } else {
        PortDirection::Forward
    };
    let control = set_bit(CONTROL_RESET, DIRECTION_BIT, direction.bit());
    io.write_byte(addresses(base).control, control);
    log::debug!("port {:#x} control reset to {:#04x}", base, control);
}
