//! Pin capability records and the pin arena
//!
//! A [`Pin`] describes one bit of one register: which directions the
//! hardware allows, its fixed pull and drive mode, and its current
//! direction. Pins are created once when the hardware map is built and live
//! in a [`PinArena`] for as long as the port is open. A `DigitalInOut`
//! borrows a pin from the arena; the `in_use` marker keeps a pin from being
//! bound twice.
//!
//! Mutable state uses `Cell`, so pins (and arenas) are `!Sync`. One thread
//! owns a port.

use core::cell::Cell;

use heapless::Vec;

use crate::address::{PortAddress, Register};
use crate::direction::PortDirection;
use crate::error::GpioError;

/// Maximum pins in one arena (three 8-bit SPP registers)
pub const MAX_PINS: usize = 24;

/// Pin direction as seen by a GPIO user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Input,
    Output,
}

impl From<Direction> for PortDirection {
    /// Outputs need the port driving the lines; inputs need it released
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Output => PortDirection::Forward,
            Direction::Input => PortDirection::Reverse,
        }
    }
}

impl From<PortDirection> for Direction {
    fn from(direction: PortDirection) -> Self {
        match direction {
            PortDirection::Forward => Direction::Output,
            PortDirection::Reverse => Direction::Input,
        }
    }
}

/// Pull resistor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pull {
    #[default]
    None,
    Up,
    Down,
}

/// Output driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriveMode {
    #[default]
    PushPull,
    OpenDrain,
}

/// Errors building a pin map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Bit index outside 0-7
    InvalidBitIndex,
    /// Pin allows neither input nor output
    NoCapability,
    /// Another pin already occupies that register bit
    Duplicate,
    /// Arena holds [`MAX_PINS`] pins already
    ArenaFull,
}

/// One bit position on one register
#[derive(Debug)]
pub struct Pin {
    name: &'static str,
    /// DB-25 connector pin number, 0 when not on the connector
    connector: u8,
    register_address: u16,
    bit_index: u8,
    input_allowed: bool,
    output_allowed: bool,
    pull: Pull,
    drive_mode: DriveMode,
    /// Line level is the inverse of the register bit
    hw_inverted: bool,
    propagate_direction: bool,
    direction: Cell<Direction>,
    in_use: Cell<bool>,
}

impl Pin {
    /// Create a pin
    ///
    /// The pin starts as an output if output is allowed, otherwise as an
    /// input. Pull is [`Pull::None`], drive mode [`DriveMode::PushPull`],
    /// and direction changes are not propagated to the port.
    pub fn new(
        register_address: u16,
        bit_index: u8,
        input_allowed: bool,
        output_allowed: bool,
    ) -> Result<Self, PinError> {
        if bit_index > 7 {
            return Err(PinError::InvalidBitIndex);
        }
        if !input_allowed && !output_allowed {
            return Err(PinError::NoCapability);
        }
        let direction = if output_allowed {
            Direction::Output
        } else {
            Direction::Input
        };
        Ok(Self {
            name: "",
            connector: 0,
            register_address,
            bit_index,
            input_allowed,
            output_allowed,
            pull: Pull::None,
            drive_mode: DriveMode::PushPull,
            hw_inverted: false,
            propagate_direction: false,
            direction: Cell::new(direction),
            in_use: Cell::new(false),
        })
    }

    /// Name the pin and record its connector position
    pub fn named(mut self, name: &'static str, connector: u8) -> Self {
        self.name = name;
        self.connector = connector;
        self
    }

    /// Set the fixed pull mode
    pub fn with_pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    /// Set the fixed drive mode
    pub fn with_drive_mode(mut self, drive_mode: DriveMode) -> Self {
        self.drive_mode = drive_mode;
        self
    }

    /// Mark the line as hardware inverted
    pub fn inverted(mut self) -> Self {
        self.hw_inverted = true;
        self
    }

    /// Propagate direction changes to the port direction bit
    pub fn with_propagation(mut self) -> Self {
        self.propagate_direction = true;
        self
    }

    /// Set the starting direction
    pub fn with_direction(self, direction: Direction) -> Result<Self, GpioError> {
        if !self.allows(direction) {
            return Err(GpioError::DirectionNotAllowed(direction));
        }
        self.direction.set(direction);
        Ok(self)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn connector(&self) -> u8 {
        self.connector
    }

    pub fn register_address(&self) -> u16 {
        self.register_address
    }

    pub fn bit_index(&self) -> u8 {
        self.bit_index
    }

    pub fn input_allowed(&self) -> bool {
        self.input_allowed
    }

    pub fn output_allowed(&self) -> bool {
        self.output_allowed
    }

    /// Whether the pin may be used in `direction`
    pub fn allows(&self, direction: Direction) -> bool {
        match direction {
            Direction::Input => self.input_allowed,
            Direction::Output => self.output_allowed,
        }
    }

    /// The fixed pull mode
    pub fn pull(&self) -> Pull {
        self.pull
    }

    /// The fixed drive mode
    pub fn drive_mode(&self) -> DriveMode {
        self.drive_mode
    }

    /// Whether the connector level is the inverse of the register bit
    ///
    /// `DigitalInOut::level` and `set_level` translate through this.
    pub fn is_hw_inverted(&self) -> bool {
        self.hw_inverted
    }

    pub fn propagates_direction(&self) -> bool {
        self.propagate_direction
    }

    /// Current recorded direction
    pub fn direction(&self) -> Direction {
        self.direction.get()
    }

    pub(crate) fn record_direction(&self, direction: Direction) {
        self.direction.set(direction);
    }

    /// Check if the pin is bound
    pub fn is_in_use(&self) -> bool {
        self.in_use.get()
    }

    /// Mark the pin as bound
    ///
    /// Fails with [`GpioError::PinInUse`] if it already is.
    pub fn bind(&self) -> Result<(), GpioError> {
        if self.in_use.replace(true) {
            return Err(GpioError::PinInUse);
        }
        Ok(())
    }

    /// Mark the pin as free. Releasing a free pin does nothing.
    pub fn release(&self) {
        self.in_use.set(false);
    }
}

/// Arena of pins indexed by register address and bit index
#[derive(Debug, Default)]
pub struct PinArena {
    pins: Vec<Pin, MAX_PINS>,
}

impl PinArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pin
    pub fn insert(&mut self, pin: Pin) -> Result<(), PinError> {
        if self.get(pin.register_address, pin.bit_index).is_some() {
            return Err(PinError::Duplicate);
        }
        self.pins.push(pin).map_err(|_| PinError::ArenaFull)
    }

    /// Look up the pin at a register bit
    pub fn get(&self, register_address: u16, bit_index: u8) -> Option<&Pin> {
        self.pins
            .iter()
            .find(|p| p.register_address == register_address && p.bit_index == bit_index)
    }

    /// Look up a pin by name
    pub fn by_name(&self, name: &str) -> Option<&Pin> {
        self.pins.iter().find(|p| !p.name.is_empty() && p.name == name)
    }

    /// Look up a pin by DB-25 connector number
    pub fn by_connector(&self, connector: u8) -> Option<&Pin> {
        if connector == 0 {
            return None;
        }
        self.pins.iter().find(|p| p.connector == connector)
    }

    /// Look up a pin by name, as an error when missing
    pub fn pin(&self, name: &str) -> Result<&Pin, GpioError> {
        self.by_name(name).ok_or(GpioError::UnknownPin)
    }

    /// Iterate over all pins in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter()
    }

    /// Iterate over pins not bound to a `DigitalInOut`
    pub fn available(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| !p.is_in_use())
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Build the standard SPP pin map for a port
    ///
    /// | Pins       | Register | Bits          | Capability                     |
    /// |------------|----------|---------------|--------------------------------|
    /// | D0-D7      | data     | 0-7           | output; input if bidirectional |
    /// | control    | control  | 0-3           | output only, open drain        |
    /// | status     | status   | 3-7           | input only                     |
    ///
    /// Data pins propagate direction changes to the port direction bit and
    /// start in the direction the port currently has.
    pub fn standard(
        port: PortAddress,
        bidirectional: bool,
        port_direction: PortDirection,
    ) -> Result<Self, PinError> {
        let mut arena = Self::new();
        let data = port.register(Register::Data);
        let status = port.register(Register::Status);
        let control = port.register(Register::Control);

        let data_direction = if bidirectional {
            Direction::from(port_direction)
        } else {
            Direction::Output
        };
        for (bit, &(name, connector)) in DATA_PINS.iter().enumerate() {
            let pin = Pin::new(data, bit as u8, bidirectional, true)?
                .named(name, connector)
                .with_propagation()
                .with_direction(data_direction)
                .map_err(|_| PinError::NoCapability)?;
            arena.insert(pin)?;
        }

        for &(name, connector, bit, inverted) in CONTROL_PINS {
            let mut pin = Pin::new(control, bit, false, true)?
                .named(name, connector)
                .with_drive_mode(DriveMode::OpenDrain);
            if inverted {
                pin = pin.inverted();
            }
            arena.insert(pin)?;
        }

        for &(name, connector, bit, inverted) in STATUS_PINS {
            let mut pin = Pin::new(status, bit, true, false)?.named(name, connector);
            if inverted {
                pin = pin.inverted();
            }
            arena.insert(pin)?;
        }

        Ok(arena)
    }
}

/// Data lines: (name, connector pin), bit index is the position
const DATA_PINS: [(&str, u8); 8] = [
    ("D0", 2),
    ("D1", 3),
    ("D2", 4),
    ("D3", 5),
    ("D4", 6),
    ("D5", 7),
    ("D6", 8),
    ("D7", 9),
];

/// Control lines: (name, connector pin, bit, hardware inverted)
const CONTROL_PINS: &[(&str, u8, u8, bool)] = &[
    ("STROBE", 1, 0, true),
    ("AUTO_LINEFEED", 14, 1, true),
    ("INITIALIZE", 16, 2, false),
    ("SELECT_PRINTER", 17, 3, true),
];

/// Status lines: (name, connector pin, bit, hardware inverted)
const STATUS_PINS: &[(&str, u8, u8, bool)] = &[
    ("ERROR", 15, 3, false),
    ("SELECT_IN", 13, 4, false),
    ("PAPER_OUT", 12, 5, false),
    ("ACK", 10, 6, false),
    ("BUSY", 11, 7, true),
];
