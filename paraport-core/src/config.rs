//! Port configuration types
//!
//! Describes which port to open and how to bring it up. Parsing from a file
//! lives with the host backends; these types only carry and validate the
//! values.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::address::{PortAddress, EPP_REGISTER_COUNT, LPT1_BASE, SPP_REGISTER_COUNT};

/// Register set to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PortMode {
    /// Data, status and control
    #[default]
    Spp,
    /// SPP plus the EPP data and address registers
    Epp,
}

impl PortMode {
    /// Number of consecutive I/O addresses the mode needs access to
    pub const fn register_count(self) -> u16 {
        match self {
            PortMode::Spp => SPP_REGISTER_COUNT,
            PortMode::Epp => EPP_REGISTER_COUNT,
        }
    }
}

/// How to decide whether the data lines can be reversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BidirectionalMode {
    /// Probe the hardware when the port is opened
    #[default]
    Probe,
    /// Trust that the port is bidirectional
    Assume,
    /// Treat the port as output-only on the data lines
    Disabled,
}

/// Port configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PortConfig {
    /// SPP base address (0x378 for LPT1)
    pub base_address: u16,
    /// Registers to open
    pub mode: PortMode,
    /// Reset the control register when the port is opened
    pub reset_control: bool,
    /// Bidirectional detection
    pub bidirectional: BidirectionalMode,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            base_address: LPT1_BASE,
            mode: PortMode::Spp,
            reset_control: true,
            bidirectional: BidirectionalMode::Probe,
        }
    }
}

impl PortConfig {
    /// Create a config for `base_address` with default settings
    pub const fn new(base_address: u16) -> Self {
        Self {
            base_address,
            mode: PortMode::Spp,
            reset_control: true,
            bidirectional: BidirectionalMode::Probe,
        }
    }

    /// Validated port address
    pub fn address(&self) -> Result<PortAddress, ConfigError> {
        PortAddress::new(self.base_address).ok_or(ConfigError::InvalidBaseAddress(self.base_address))
    }

    /// Check that the configured mode is `mode`
    pub fn require_mode(&self, mode: PortMode) -> Result<(), ConfigError> {
        if self.mode != mode {
            return Err(ConfigError::ModeMismatch {
                expected: mode,
                configured: self.mode,
            });
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The register block would run past the end of the I/O space
    InvalidBaseAddress(u16),
    /// The port type being opened needs a different register set
    ModeMismatch {
        expected: PortMode,
        configured: PortMode,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseAddress(base) => {
                write!(f, "invalid port base address {:#x}", base)
            }
            ConfigError::ModeMismatch {
                expected,
                configured,
            } => write!(
                f,
                "port mode {:?} required, configured as {:?}",
                expected, configured
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PortConfig::default();
        assert_eq!(config.base_address, 0x378);
        assert_eq!(config.mode, PortMode::Spp);
        assert!(config.reset_control);
        assert_eq!(config.bidirectional, BidirectionalMode::Probe);
        assert_eq!(config, PortConfig::new(0x378));
    }

    #[test]
    fn test_register_count() {
        assert_eq!(PortMode::Spp.register_count(), 3);
        assert_eq!(PortMode::Epp.register_count(), 5);
    }

    #[test]
    fn test_address_validation() {
        assert_eq!(PortConfig::new(0x278).address().unwrap().control(), 0x27A);
        assert_eq!(
            PortConfig::new(0xFFFE).address(),
            Err(ConfigError::InvalidBaseAddress(0xFFFE))
        );
    }

    #[test]
    fn test_require_mode() {
        let spp = PortConfig::default();
        assert_eq!(spp.require_mode(PortMode::Spp), Ok(()));
        assert_eq!(
            spp.require_mode(PortMode::Epp),
            Err(ConfigError::ModeMismatch {
                expected: PortMode::Epp,
                configured: PortMode::Spp,
            })
        );

        let epp = PortConfig {
            mode: PortMode::Epp,
            ..PortConfig::default()
        };
        assert_eq!(epp.require_mode(PortMode::Epp), Ok(()));
    }
}
