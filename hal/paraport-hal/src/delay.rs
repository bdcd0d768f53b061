//! Delay primitive
//!
//! Handshake-style protocols layered on top of the pins need short,
//! bounded waits between register accesses.

/// Microsecond delay
pub trait Delay {
    /// Block for `us` microseconds
    ///
    /// Returns `false` if the wait could not be completed as requested
    /// (for example it was interrupted). Implementations must not retry
    /// indefinitely; callers that need the full duration re-invoke.
    fn delay_us(&mut self, us: u32) -> bool;

    /// Block for `ms` milliseconds
    ///
    /// Waits longer than `u32::MAX` microseconds are split into several
    /// `delay_us` calls; the first one that fails ends the wait.
    fn delay_ms(&mut self, ms: u32) -> bool {
        let mut remaining = ms;
        while remaining > 0 {
            let chunk = remaining.min(MAX_MS_PER_CALL);
            if !self.delay_us(chunk * 1000) {
                return false;
            }
            remaining -= chunk;
        }
        true
    }
}

/// Longest whole-millisecond wait a single `delay_us` call can express
const MAX_MS_PER_CALL: u32 = u32::MAX / 1000;

impl<T: Delay + ?Sized> Delay for &mut T {
    fn delay_us(&mut self, us: u32) -> bool {
        (**self).delay_us(us)
    }
}
