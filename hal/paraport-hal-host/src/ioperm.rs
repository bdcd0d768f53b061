//! Direct port I/O on Linux
//!
//! `ioperm(2)` grants the process access to a range of I/O addresses; after
//! that the `in` and `out` instructions work from user space. Requires
//! `CAP_SYS_RAWIO` (in practice, root).

use std::io;

use paraport_hal::PortIo;

use crate::error::InitError;

/// Port backend using `in`/`out` after `ioperm`
///
/// Access is revoked when the backend is dropped.
#[derive(Debug)]
pub struct IopermPortIo {
    base: u16,
    count: u16,
}

impl IopermPortIo {
    /// Gain access to `count` addresses starting at `base`
    pub fn acquire(base: u16, count: u16) -> Result<Self, InitError> {
        // SAFETY: ioperm only changes this process's I/O permission bitmap.
        let res = unsafe { libc::ioperm(base as libc::c_ulong, count as libc::c_ulong, 1) };
        if res != 0 {
            return Err(InitError::Permission {
                base,
                end: base as u32 + count as u32,
                source: io::Error::last_os_error(),
            });
        }
        log::info!("acquired port access {:#x}..{:#x}", base, base as u32 + count as u32);
        Ok(Self { base, count })
    }

    /// First permitted address
    pub fn base(&self) -> u16 {
        self.base
    }

    /// Number of permitted addresses
    pub fn count(&self) -> u16 {
        self.count
    }

    fn permits(&self, address: u16) -> bool {
        address >= self.base && (address as u32) < self.base as u32 + self.count as u32
    }
}

impl PortIo for IopermPortIo {
    fn read_byte(&self, address: u16) -> u8 {
        debug_assert!(self.permits(address), "port {:#x} not acquired", address);
        let value: u8;
        // SAFETY: the address range was granted by ioperm in `acquire`, and
        // `in al, dx` reads a single byte.
        unsafe {
            core::arch::asm!(
                "in al, dx",
                in("dx") address,
                out("al") value,
                options(nomem, nostack, preserves_flags),
            );
        }
        value
    }

    fn write_byte(&self, address: u16, value: u8) {
        debug_assert!(self.permits(address), "port {:#x} not acquired", address);
        // SAFETY: as for `read_byte`; `out dx, al` writes a single byte.
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") address,
                in("al") value,
                options(nomem, nostack, preserves_flags),
            );
        }
    }
}

impl Drop for IopermPortIo {
    fn drop(&mut self) {
        // SAFETY: revoking permission cannot affect memory safety.
        let res = unsafe { libc::ioperm(self.base as libc::c_ulong, self.count as libc::c_ulong, 0) };
        if res != 0 {
            log::warn!("failed to release port access at {:#x}", self.base);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permits_range() {
        // Built directly so the test does not need privileges; never used for I/O
        let io = std::mem::ManuallyDrop::new(IopermPortIo {
            base: 0x378,
            count: 3,
        });
        assert!(io.permits(0x378));
        assert!(io.permits(0x37A));
        assert!(!io.permits(0x37B));
        assert!(!io.permits(0x377));
    }

    #[test]
    #[ignore = "needs CAP_SYS_RAWIO and a parallel port at 0x378"]
    fn test_acquire_lpt1() {
        let io = IopermPortIo::acquire(0x378, 3).unwrap();
        let _ = io.read_byte(0x379);
    }
}
