//! Port-mapped register access
//!
//! Parallel port registers live in the x86 I/O address space and are
//! accessed one byte at a time.

/// Single byte register access
///
/// Implementations perform the actual port instruction (or driver call) for
/// the platform. There is no error channel: the hardware gives no feedback,
/// so a backend that exists is assumed to have been granted access to the
/// addresses it is asked about.
///
/// Methods take `&self` so one backend can be shared by every pin bound on
/// a port. Backends that keep state (such as mocks) use interior mutability.
pub trait PortIo {
    /// Read the byte currently presented by the register at `address`
    fn read_byte(&self, address: u16) -> u8;

    /// Write `value` to the register at `address`
    fn write_byte(&self, address: u16, value: u8);
}

impl<T: PortIo + ?Sized> PortIo for &T {
    fn read_byte(&self, address: u16) -> u8 {
        (**self).read_byte(address)
    }

    fn write_byte(&self, address: u16, value: u8) {
        (**self).write_byte(address, value)
    }
}
