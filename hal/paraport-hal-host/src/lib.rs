//! Host operating system backends for Paraport
//!
//! Provides [`paraport_hal::PortIo`] implementations for running on a
//! desktop OS, plus the glue that turns a config file into an opened port:
//!
//! - [`ioperm::IopermPortIo`] - `ioperm(2)` + `in`/`out` (Linux, x86)
//! - [`driver::VendorDriverPortIo`] - inpout-style shared library
//! - [`delay::HostDelay`] - `nanosleep` based microsecond delay
//! - [`config`] - TOML configuration
//! - [`open`] - privilege acquisition and port bring-up
//!
//! Everything here fails at initialization or not at all: once a backend
//! exists, register access has no error path.

pub mod config;
pub mod delay;
pub mod driver;
pub mod error;
#[cfg(all(
    target_os = "linux",
    target_env = "gnu",
    any(target_arch = "x86", target_arch = "x86_64")
))]
pub mod ioperm;
pub mod open;

pub use config::{DriverConfig, HostConfig};
pub use delay::HostDelay;
pub use driver::VendorDriverPortIo;
pub use error::InitError;
#[cfg(all(
    target_os = "linux",
    target_env = "gnu",
    any(target_arch = "x86", target_arch = "x86_64")
))]
pub use ioperm::IopermPortIo;
pub use open::{open, open_epp, NativePortIo};
