//! Initialization errors
//!
//! All of these are fatal: the port object is never constructed.

use std::io;
use std::path::PathBuf;

use paraport_core::config::ConfigError;

/// Errors bringing up a port backend
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The OS refused access to the port's address range
    #[error("unable to gain permission for ports {base:#x}..{end:#x}")]
    Permission {
        base: u16,
        end: u32,
        #[source]
        source: io::Error,
    },

    /// The vendor driver library could not be loaded
    #[error("unable to load port driver {}", .path.display())]
    DriverLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// The vendor driver does not export a required entry point
    #[error("port driver {} does not export {symbol}", .path.display())]
    DriverSymbol {
        path: PathBuf,
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },

    /// No driver path configured and none could be derived
    #[error("no port driver path configured")]
    NoDriverPath,

    /// The configuration file could not be read
    #[error("unable to read config {}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for a port config
    #[error("invalid config")]
    ParseConfig(#[from] toml::de::Error),

    /// The configuration values are invalid
    #[error("{0}")]
    Config(ConfigError),
}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        InitError::Config(e)
    }
}
