//! Port bring-up
//!
//! Acquires access to the port's register range with the platform backend,
//! then hands the backend to the core port types which probe and reset the
//! hardware according to the configuration.

use std::path::PathBuf;

use paraport_core::config::{PortConfig, PortMode};
use paraport_core::port::{EppPort, StandardPort};
use paraport_hal::PortIo;

use crate::config::{DriverConfig, HostConfig};
use crate::driver::VendorDriverPortIo;
use crate::error::InitError;

/// Open an SPP port on an already initialized backend
pub fn open_with<IO: PortIo>(io: IO, config: &PortConfig) -> Result<StandardPort<IO>, InitError> {
    Ok(StandardPort::open(io, config)?)
}

/// Open an EPP port on an already initialized backend
pub fn open_epp_with<IO: PortIo>(io: IO, config: &PortConfig) -> Result<EppPort<IO>, InitError> {
    Ok(EppPort::open(io, config)?)
}

/// First port address and number of addresses to open a port of type `mode`
///
/// The range covers every register of the configured mode. An EPP port
/// needs all five, so opening one on an SPP config is rejected.
pub fn access_range(config: &PortConfig, mode: PortMode) -> Result<(u16, u16), InitError> {
    let address = config.address()?;
    if mode == PortMode::Epp {
        config.require_mode(PortMode::Epp)?;
    }
    Ok((address.base(), config.mode.register_count()))
}

/// Load the configured vendor driver
pub fn load_driver(config: &DriverConfig) -> Result<VendorDriverPortIo, InitError> {
    let path: PathBuf = match &config.path {
        Some(path) => path.clone(),
        None => VendorDriverPortIo::default_path().ok_or(InitError::NoDriverPath)?,
    };
    VendorDriverPortIo::load(path)
}

/// Open an SPP port through the vendor driver
pub fn open_with_driver(config: &HostConfig) -> Result<StandardPort<VendorDriverPortIo>, InitError> {
    config.port.address()?;
    let io = load_driver(&config.driver)?;
    open_with(io, &config.port)
}

/// Open an EPP port through the vendor driver
pub fn open_epp_with_driver(config: &HostConfig) -> Result<EppPort<VendorDriverPortIo>, InitError> {
    access_range(&config.port, PortMode::Epp)?;
    let io = load_driver(&config.driver)?;
    open_epp_with(io, &config.port)
}

#[cfg(all(
    target_os = "linux",
    target_env = "gnu",
    any(target_arch = "x86", target_arch = "x86_64")
))]
mod native {
    use super::*;
    use crate::ioperm::IopermPortIo;

    /// Backend used by [`open`] on this platform
    pub type NativePortIo = IopermPortIo;

    fn acquire(config: &PortConfig, mode: PortMode) -> Result<IopermPortIo, InitError> {
        let (base, count) = access_range(config, mode)?;
        IopermPortIo::acquire(base, count)
    }

    /// Open an SPP port with direct port access
    pub fn open(config: &HostConfig) -> Result<StandardPort<NativePortIo>, InitError> {
        open_with(acquire(&config.port, PortMode::Spp)?, &config.port)
    }

    /// Open an EPP port with direct port access
    pub fn open_epp(config: &HostConfig) -> Result<EppPort<NativePortIo>, InitError> {
        open_epp_with(acquire(&config.port, PortMode::Epp)?, &config.port)
    }
}

#[cfg(not(all(
    target_os = "linux",
    target_env = "gnu",
    any(target_arch = "x86", target_arch = "x86_64")
)))]
mod native {
    use super::*;

    /// Backend used by [`open`] on this platform
    pub type NativePortIo = VendorDriverPortIo;

    /// Open an SPP port through the vendor driver
    pub fn open(config: &HostConfig) -> Result<StandardPort<NativePortIo>, InitError> {
        open_with_driver(config)
    }

    /// Open an EPP port through the vendor driver
    pub fn open_epp(config: &HostConfig) -> Result<EppPort<NativePortIo>, InitError> {
        open_epp_with_driver(config)
    }
}

pub use native::{open, open_epp, NativePortIo};
