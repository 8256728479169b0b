// Bus settings, defaults and the connection config file
use std::path::Path;

use serde::{Deserialize, Serialize};

// SPI device the BrickPi3 sits on (chip select 1)
pub const DEFAULT_SPI_DEVICE: &str = "/dev/spidev0.1";

// SPI clock; the firmware is specified for 500 kHz, mode 0, 8-bit words
pub const SPI_CLOCK_HZ: u32 = 500_000;

// Address a factory-fresh board answers on
pub const DEFAULT_ADDRESS: u8 = 1;

// Sensor poll rate for the watch loop
pub const DEFAULT_POLL_HZ: u64 = 10;

// Motor position-control gains restored by reset_all
pub const DEFAULT_POSITION_KP: u8 = 25;
pub const DEFAULT_POSITION_KD: u8 = 70;

// LED value returning control to the firmware
pub const LED_FIRMWARE_CONTROL: u8 = 255;

/// Connection settings, loadable from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickConfig {
    pub device: String,
    pub clock_hz: u32,
    pub address: u8,
    pub poll_hz: u64,
}

impl Default for BrickConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_SPI_DEVICE.to_string(),
            clock_hz: SPI_CLOCK_HZ,
            address: DEFAULT_ADDRESS,
            poll_hz: DEFAULT_POLL_HZ,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BrickConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
