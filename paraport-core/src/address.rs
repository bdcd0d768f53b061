//! Register address computation
//!
//! A parallel port occupies a small contiguous block of I/O addresses:
//!
//! ```text
//! base + 0   SPP data
//! base + 1   SPP status   (read only)
//! base + 2   SPP control
//! base + 3   EPP data
//! base + 4   EPP address
//! ```
//!
//! All offsets are defined here and nowhere else.

/// Conventional base address of LPT1
pub const LPT1_BASE: u16 = 0x378;

/// Conventional base address of LPT2
pub const LPT2_BASE: u16 = 0x278;

/// Number of registers used in SPP mode
pub const SPP_REGISTER_COUNT: u16 = 3;

/// Number of registers used in EPP mode
pub const EPP_REGISTER_COUNT: u16 = 5;

/// Registers of a parallel port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// SPP data lines D0-D7
    Data,
    /// SPP status lines (read only)
    Status,
    /// SPP control lines and the direction bit
    Control,
    /// EPP data cycle register
    EppData,
    /// EPP address cycle register
    EppAddress,
}

impl Register {
    /// All registers in offset order
    pub const ALL: [Register; 5] = [
        Register::Data,
        Register::Status,
        Register::Control,
        Register::EppData,
        Register::EppAddress,
    ];

    /// Offset of the register from the port base address
    pub const fn offset(self) -> u16 {
        match self {
            Register::Data => 0,
            Register::Status => 1,
            Register::Control => 2,
            Register::EppData => 3,
            Register::EppAddress => 4,
        }
    }

    /// Whether the register only exists in EPP mode
    pub const fn is_epp(self) -> bool {
        matches!(self, Register::EppData | Register::EppAddress)
    }
}

/// Concrete register addresses for one base address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterAddresses {
    pub data: u16,
    pub status: u16,
    pub control: u16,
    pub epp_data: u16,
    pub epp_address: u16,
}

/// Compute every register address from a base address
///
/// Pure arithmetic; addresses wrap at the top of the I/O space. Use
/// [`PortAddress::new`] when the base comes from outside the program.
pub const fn addresses(base: u16) -> RegisterAddresses {
    RegisterAddresses {
        data: base.wrapping_add(Register::Data.offset()),
        status: base.wrapping_add(Register::Status.offset()),
        control: base.wrapping_add(Register::Control.offset()),
        epp_data: base.wrapping_add(Register::EppData.offset()),
        epp_address: base.wrapping_add(Register::EppAddress.offset()),
    }
}

/// Base address of a port
///
/// Fixed at construction; every register address is derived from it and
/// the whole register block is guaranteed to fit in the I/O space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortAddress {
    base: u16,
}

impl PortAddress {
    /// Create a port address
    ///
    /// Returns `None` if the EPP register block would run past `0xFFFF`.
    pub const fn new(base: u16) -> Option<Self> {
        match base.checked_add(EPP_REGISTER_COUNT - 1) {
            Some(_) => Some(Self { base }),
            None => None,
        }
    }

    /// LPT1 at 0x378
    pub const LPT1: Self = Self { base: LPT1_BASE };

    /// LPT2 at 0x278
    pub const LPT2: Self = Self { base: LPT2_BASE };

    /// The base address
    pub const fn base(&self) -> u16 {
        self.base
    }

    /// Address of `register`
    pub const fn register(&self, register: Register) -> u16 {
        self.base + register.offset()
    }

    /// SPP data register address
    pub const fn data(&self) -> u16 {
        self.register(Register::Data)
    }

    /// SPP status register address
    pub const fn status(&self) -> u16 {
        self.register(Register::Status)
    }

    /// SPP control register address
    pub const fn control(&self) -> u16 {
        self.register(Register::Control)
    }

    /// EPP data register address
    pub const fn epp_data(&self) -> u16 {
        self.register(Register::EppData)
    }

    /// EPP address register address
    pub const fn epp_address(&self) -> u16 {
        self.register(Register::EppAddress)
    }

    /// All register addresses at once
    pub const fn addresses(&self) -> RegisterAddresses {
        addresses(self.base)
    }

    /// Which register `address` refers to, if it belongs to this port
    pub fn register_at(&self, address: u16) -> Option<Register> {
        let offset = address.checked_sub(self.base)?;
        Register::ALL.into_iter().find(|r| r.offset() == offset)
    }
}
