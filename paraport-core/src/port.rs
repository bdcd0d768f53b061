//! Raw register access to an opened port
//!
//! [`StandardPort`] owns the port backend and the validated base address.
//! It offers byte-level register access and port direction control, and
//! builds the pin map that `DigitalInOut` bindings borrow from.

use paraport_hal::PortIo;

use crate::address::PortAddress;
use crate::config::{BidirectionalMode, ConfigError, PortConfig, PortMode};
use crate::direction::{self, PortDirection};
use crate::pin::{PinArena, PinError};

/// An SPP port
#[derive(Debug)]
pub struct StandardPort<IO> {
    io: IO,
    address: PortAddress,
    bidirectional: bool,
}

impl<IO: PortIo> StandardPort<IO> {
    /// Wrap a backend without touching the hardware
    ///
    /// The port is treated as not bidirectional until probed.
    pub fn new(io: IO, address: PortAddress) -> Self {
        Self {
            io,
            address,
            bidirectional: false,
        }
    }

    /// Bring a port up according to `config`
    ///
    /// Resolves bidirectional support (probing the hardware if asked to)
    /// and then resets the control register if `reset_control` is set.
    pub fn open(io: IO, config: &PortConfig) -> Result<Self, ConfigError> {
        let address = config.address()?;
        let mut port = Self::new(io, address);

        port.bidirectional = match config.bidirectional {
            BidirectionalMode::Probe => port.probe_bidirectional(),
            BidirectionalMode::Assume => true,
            BidirectionalMode::Disabled => false,
        };

        if config.reset_control {
            port.reset_control();
        }

        log::info!(
            "opened port {:#x} ({:?}, bidirectional: {})",
            address.base(),
            config.mode,
            port.bidirectional
        );
        Ok(port)
    }

    /// The port backend
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Consume the port and return the backend
    pub fn into_io(self) -> IO {
        self.io
    }

    /// The port address
    pub fn address(&self) -> PortAddress {
        self.address
    }

    pub fn data_address(&self) -> u16 {
        self.address.data()
    }

    pub fn status_address(&self) -> u16 {
        self.address.status()
    }

    pub fn control_address(&self) -> u16 {
        self.address.control()
    }

    pub fn read_data_register(&self) -> u8 {
        self.io.read_byte(self.address.data())
    }

    pub fn write_data_register(&self, value: u8) {
        self.io.write_byte(self.address.data(), value)
    }

    pub fn read_status_register(&self) -> u8 {
        self.io.read_byte(self.address.status())
    }

    pub fn read_control_register(&self) -> u8 {
        self.io.read_byte(self.address.control())
    }

    pub fn write_control_register(&self, value: u8) {
        self.io.write_byte(self.address.control(), value)
    }

    /// Current port direction
    pub fn direction(&self) -> PortDirection {
        direction::get_direction(&self.io, self.address.base())
    }

    /// Change the port direction
    pub fn set_direction(&self, direction: PortDirection) {
        direction::set_direction(&self.io, self.address.base(), direction)
    }

    /// Whether the data lines can be reversed
    pub fn is_bidirectional(&self) -> bool {
        self.bidirectional
    }

    /// Probe the hardware for reverse mode and remember the result
    pub fn probe_bidirectional(&mut self) -> bool {
        self.bidirectional = direction::probe_bidirectional(&self.io, self.address.base());
        if !self.bidirectional {
            log::warn!(
                "port {:#x} ignores the direction bit, data lines are output only",
                self.address.base()
            );
        }
        self.bidirectional
    }

    /// Reset the control register to its canonical state
    pub fn reset_control(&self) {
        direction::reset_control_pins(&self.io, self.address.base(), self.bidirectional)
    }

    /// Build the standard pin map for this port
    ///
    /// Data pins accept input only if the port is bidirectional, and start
    /// in the port's current direction.
    pub fn pins(&self) -> Result<PinArena, PinError> {
        PinArena::standard(self.address, self.bidirectional, self.direction())
    }
}

/// An EPP port
///
/// Adds the EPP data and address registers on top of the SPP set. Each
/// access to those registers makes the port run a complete EPP handshake
/// cycle in hardware.
#[derive(Debug)]
pub struct EppPort<IO> {
    spp: StandardPort<IO>,
}

impl<IO: PortIo> EppPort<IO> {
    /// Wrap a backend without touching the hardware
    pub fn new(io: IO, address: PortAddress) -> Self {
        Self {
            spp: StandardPort::new(io, address),
        }
    }

    /// Bring a port up according to `config`
    ///
    /// `config.mode` must be [`PortMode::Epp`] so the backend was set up for
    /// all five registers.
    pub fn open(io: IO, config: &PortConfig) -> Result<Self, ConfigError> {
        config.require_mode(PortMode::Epp)?;
        Ok(Self {
            spp: StandardPort::open(io, config)?,
        })
    }

    /// The SPP registers of this port
    pub fn spp(&self) -> &StandardPort<IO> {
        &self.spp
    }

    pub fn spp_mut(&mut self) -> &mut StandardPort<IO> {
        &mut self.spp
    }

    pub fn epp_data_address(&self) -> u16 {
        self.spp.address.epp_data()
    }

    pub fn epp_address_address(&self) -> u16 {
        self.spp.address.epp_address()
    }

    pub fn read_epp_data(&self) -> u8 {
        self.spp.io.read_byte(self.epp_data_address())
    }

    pub fn write_epp_data(&self, value: u8) {
        self.spp.io.write_byte(self.epp_data_address(), value)
    }

    pub fn read_epp_address(&self) -> u8 {
        self.spp.io.read_byte(self.epp_address_address())
    }

    pub fn write_epp_address(&self, value: u8) {
        self.spp.io.write_byte(self.epp_address_address(), value)
    }
}
