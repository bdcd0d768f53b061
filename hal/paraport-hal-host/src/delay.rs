//! Host delay
//!
//! A single `nanosleep` per request. Interruption by a signal is reported
//! as failure instead of being retried, so the caller decides whether to
//! wait again.

use paraport_hal::Delay;

/// Delay provider backed by the OS scheduler
///
/// Resolution is bounded by the kernel timer slack (typically ~50us on
/// Linux); requests shorter than that still complete, just late.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostDelay;

impl HostDelay {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
fn sleep_ns(ns: u64, remaining: Option<&mut u64>) -> bool {
    // SAFETY: timespec is plain data; zeroed is a valid value.
    let mut request: libc::timespec = unsafe { std::mem::zeroed() };
    request.tv_sec = (ns / 1_000_000_000) as libc::time_t;
    request.tv_nsec = (ns % 1_000_000_000) as _;
    // SAFETY: as above.
    let mut rem: libc::timespec = unsafe { std::mem::zeroed() };

    // SAFETY: both pointers are valid for the duration of the call.
    let res = unsafe { libc::nanosleep(&request, &mut rem) };
    if let Some(remaining) = remaining {
        *remaining = if res == 0 {
            0
        } else {
            rem.tv_sec as u64 * 1_000_000_000 + rem.tv_nsec as u64
        };
    }
    res == 0
}

#[cfg(not(unix))]
fn sleep_ns(ns: u64, remaining: Option<&mut u64>) -> bool {
    let start = std::time::Instant::now();
    std::thread::sleep(std::time::Duration::from_nanos(ns));
    let elapsed = start.elapsed().as_nanos() as u64;
    if let Some(remaining) = remaining {
        *remaining = ns.saturating_sub(elapsed);
    }
    elapsed >= ns
}

impl Delay for HostDelay {
    fn delay_us(&mut self, us: u32) -> bool {
        let ok = sleep_ns(us as u64 * 1_000, None);
        if !ok {
            log::debug!("delay of {}us interrupted", us);
        }
        ok
    }
}

impl embedded_hal::delay::DelayNs for HostDelay {
    /// Completes the full wait, resuming after interruptions
    fn delay_ns(&mut self, ns: u32) {
        let mut remaining = ns as u64;
        // Each retry sleeps strictly less, so this terminates
        while remaining > 0 {
            let mut left = 0;
            if sleep_ns(remaining, Some(&mut left)) || left >= remaining {
                break;
            }
            remaining = left;
        }
    }
}
