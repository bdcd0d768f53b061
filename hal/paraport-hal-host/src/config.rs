//! TOML configuration
//!
//! ```toml
//! [port]
//! base_address = 0x378
//! mode = "spp"            # or "epp"
//! reset_control = true
//! bidirectional = "probe" # "assume" or "disabled"
//!
//! [driver]
//! path = "C:/Program Files/paraport/inpoutx64/inpoutx64.dll"
//! ```
//!
//! Every key is optional; missing keys take the defaults of
//! [`PortConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use paraport_core::config::PortConfig;
use serde::Deserialize;

use crate::error::InitError;

/// Vendor driver settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Driver library path; defaults to the location next to the executable
    pub path: Option<PathBuf>,
}

/// Complete host configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub port: PortConfig,
    pub driver: DriverConfig,
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<HostConfig, InitError> {
    let config: HostConfig = toml::from_str(text)?;
    // Reject bad addresses here rather than at open time
    config.port.address()?;
    Ok(config)
}

/// Load configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<HostConfig, InitError> {
    let path = path.as_ref();
    log::info!("loading port configuration from {}", path.display());
    let text = fs::read_to_string(path).map_err(|source| InitError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paraport_core::config::{BidirectionalMode, ConfigError, PortMode};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.port.base_address, 0x378);
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"
            [port]
            base_address = 0x278
            mode = "epp"
            reset_control = false
            bidirectional = "disabled"

            [driver]
            path = "drivers/inpoutx64.dll"
            "#,
        )
        .unwrap();

        assert_eq!(config.port.base_address, 0x278);
        assert_eq!(config.port.mode, PortMode::Epp);
        assert!(!config.port.reset_control);
        assert_eq!(config.port.bidirectional, BidirectionalMode::Disabled);
        assert_eq!(
            config.driver.path,
            Some(PathBuf::from("drivers/inpoutx64.dll"))
        );
    }

    #[test]
    fn test_partial_port_table() {
        let config = parse_config("[port]\nbidirectional = \"assume\"\n").unwrap();
        assert_eq!(config.port.base_address, 0x378);
        assert_eq!(config.port.bidirectional, BidirectionalMode::Assume);
        assert!(config.port.reset_control);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = parse_config("[port]\nmode = \"ecp\"\n").unwrap_err();
        assert!(matches!(err, InitError::ParseConfig(_)));
    }

    #[test]
    fn test_out_of_range_address_rejected() {
        let err = parse_config("[port]\nbase_address = 0x10000\n").unwrap_err();
        assert!(matches!(err, InitError::ParseConfig(_)));

        let err = parse_config("[port]\nbase_address = 0xFFFF\n").unwrap_err();
        assert!(matches!(
            err,
            InitError::Config(ConfigError::InvalidBaseAddress(0xFFFF))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nonexistent/paraport.toml").unwrap_err();
        assert!(matches!(err, InitError::ReadConfig { .. }));
    }
}
