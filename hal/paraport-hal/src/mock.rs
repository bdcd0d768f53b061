//! In-memory register file
//!
//! Stands in for real port hardware in tests. Each address holds a byte;
//! bits can be marked stuck to model registers (or single bits) that the
//! hardware ignores writes to, such as the status register or the
//! direction bit on a port that is not bidirectional.

use core::cell::RefCell;

use heapless::LinearMap;

/// Maximum distinct addresses tracked by one mock
pub const MOCK_REGISTERS: usize = 16;

#[derive(Debug, Clone, Copy, Default)]
struct MockRegister {
    value: u8,
    /// Bits that keep `stuck_value` regardless of writes
    stuck_mask: u8,
    stuck_value: u8,
    reads: usize,
    writes: usize,
}

impl MockRegister {
    fn latch(&mut self, value: u8) {
        self.value = (value & !self.stuck_mask) | (self.stuck_value & self.stuck_mask);
    }
}

/// Mock port backend
///
/// Unknown addresses read as zero. Tracking is limited to
/// [`MOCK_REGISTERS`] addresses; accesses beyond that are dropped.
#[derive(Debug, Default)]
pub struct MockPortIo {
    registers: RefCell<LinearMap<u16, MockRegister, MOCK_REGISTERS>>,
}

impl MockPortIo {
    /// Create an empty register file
    pub fn new() -> Self {
        Self::default()
    }

    fn with_register<R>(&self, address: u16, f: impl FnOnce(&mut MockRegister) -> R) -> Option<R> {
        let mut registers = self.registers.borrow_mut();
        if registers.get(&address).is_none() {
            registers.insert(address, MockRegister::default()).ok()?;
        }
        registers.get_mut(&address).map(f)
    }

    /// Preload a register value without counting it as a write
    pub fn set(&self, address: u16, value: u8) {
        self.with_register(address, |reg| reg.latch(value));
    }

    /// Current register value without counting it as a read
    pub fn get(&self, address: u16) -> u8 {
        self.registers
            .borrow()
            .get(&address)
            .map(|reg| reg.value)
            .unwrap_or(0)
    }

    /// Force the bits in `mask` to `value` and ignore future writes to them
    pub fn stick_bits(&self, address: u16, mask: u8, value: u8) {
        self.with_register(address, |reg| {
            reg.stuck_mask |= mask;
            reg.stuck_value = (reg.stuck_value & !mask) | (value & mask);
            let current = reg.value;
            reg.latch(current);
        });
    }

    /// Make the whole register ignore writes
    pub fn read_only(&self, address: u16) {
        let current = self.get(address);
        self.stick_bits(address, 0xFF, current);
    }

    /// Number of writes issued to `address`
    pub fn writes(&self, address: u16) -> usize {
        self.registers
            .borrow()
            .get(&address)
            .map(|reg| reg.writes)
            .unwrap_or(0)
    }

    /// Number of reads issued to `address`
    pub fn reads(&self, address: u16) -> usize {
        self.registers
            .borrow()
            .get(&address)
            .map(|reg| reg.reads)
            .unwrap_or(0)
    }
}

impl crate::PortIo for MockPortIo {
    fn read_byte(&self, address: u16) -> u8 {
        self.with_register(address, |reg| {
            reg.reads += 1;
            reg.value
        })
        .unwrap_or(0)
    }

    fn write_byte(&self, address: u16, value: u8) {
        self.with_register(address, |reg| {
            reg.writes += 1;
            reg.latch(value);
        });
    }
}
