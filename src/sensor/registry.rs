// Per-port record of the configured sensor type
//
// Replies only carry a confirmation of the type, so decoding has to know
// locally what each port was configured as.

use super::types::{I2cSettings, SensorConfig, SensorPort, SensorType};
use crate::protocol::codec::{self, Width};
use crate::protocol::{BrickError, MessageType, Result};

/// Longest write the firmware accepts in one I2C transaction
pub const I2C_MAX_OUT_BYTES: usize = 16;

#[derive(Debug, Clone, Default)]
pub struct SensorRegistry {
    types: [SensorType; 4],
    i2c_in_bytes: [u8; 4],
}

impl SensorRegistry {
    /// All ports start unconfigured
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_type(&self, port: SensorPort) -> SensorType {
        self.types[port.index()]
    }

    /// Number of bytes an I2C port expects back from its device
    pub fn i2c_in_bytes(&self, port: SensorPort) -> u8 {
        self.i2c_in_bytes[port.index()]
    }

    /// Record `config` on every port selected by `mask`
    pub fn assign(&mut self, mask: u8, config: &SensorConfig) {
        let in_bytes = match config {
            SensorConfig::I2c(i2c) => i2c.repeat.as_ref().map_or(0, |r| r.in_bytes),
            _ => 0,
        };
        for port in ports_in(mask) {
            self.types[port.index()] = config.sensor_type();
            self.i2c_in_bytes[port.index()] = in_bytes;
        }
    }

    pub fn set_i2c_in_bytes(&mut self, port: SensorPort, in_bytes: u8) {
        self.i2c_in_bytes[port.index()] = in_bytes;
    }
}

/// Ports selected by a port mask, in port order
pub fn ports_in(mask: u8) -> impl Iterator<Item = SensorPort> {
    SensorPort::ALL
        .into_iter()
        .filter(move |p| mask & p.mask() != 0)
}

/// Build the SET_SENSOR_TYPE request
///
/// `[address, SET_SENSOR_TYPE, port_mask, type, params...]` where params are
/// the 16-bit pin word for custom sensors, or for I2C the settings, speed and,
/// when the transaction repeats, delay (32-bit), device address, read length,
/// write length and the bytes to write.
pub fn encode_set_type(address: u8, mask: u8, config: &SensorConfig) -> Result<Vec<u8>> {
    if mask == 0 || mask & !0x0F != 0 {
        return Err(BrickError::Validation(format!(
            "sensor port mask 0x{:02X} must select ports 1-4",
            mask
        )));
    }

    let sensor_type = config.sensor_type();
    let mut frame = codec::encode_command(
        address,
        MessageType::SetSensorType,
        &[mask, sensor_type.code()],
    );

    match config {
        SensorConfig::Type(_) => {}
        SensorConfig::Custom(pins) => {
            codec::push_be(&mut frame, pins.bits() as i32, Width::W16);
        }
        SensorConfig::I2c(i2c) => {
            if i2c.repeat.is_none() && i2c.settings.contains(I2cSettings::SAME) {
                return Err(BrickError::Validation(
                    "I2C SAME flag needs a repeated transaction".to_string(),
                ));
            }
            let mut settings = i2c.settings;
            if i2c.repeat.is_some() {
                settings = settings | I2cSettings::SAME;
            }
            frame.push(settings.bits());
            frame.push(i2c.speed_us);

            if let Some(repeat) = &i2c.repeat {
                if repeat.out.len() > I2C_MAX_OUT_BYTES {
                    return Err(BrickError::Validation(format!(
                        "I2C write of {} bytes exceeds {}",
                        repeat.out.len(),
                        I2C_MAX_OUT_BYTES
                    )));
                }
                codec::push_be(&mut frame, repeat.delay_us as i32, Width::W32);
                frame.push(repeat.address);
                frame.push(repeat.in_bytes);
                frame.push(repeat.out.len() as u8);
                frame.extend_from_slice(&repeat.out);
            }
        }
    }

    Ok(frame)
}
