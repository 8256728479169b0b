// Sensor configuration, reads and raw I2C transactions

use embedded_hal::spi::SpiDevice;
use tracing::{debug, info};

use super::Brick;
use crate::protocol::codec;
use crate::protocol::{BrickError, Result};
use crate::sensor::decode::{self, NOT_CONFIGURED};
use crate::sensor::registry::{self, I2C_MAX_OUT_BYTES};
use crate::sensor::{DecodeFamily, SensorConfig, SensorPort, SensorType, SensorValue};

impl<SPI: SpiDevice> Brick<SPI> {
    /// Configure `ports` with one request; the new type applies to the next read
    pub fn set_sensor_type(
        &mut self,
        ports: &[SensorPort],
        config: impl Into<SensorConfig>,
    ) -> Result<()> {
        let config = config.into();
        let mask = SensorPort::mask_of(ports);
        let frame = registry::encode_set_type(self.address(), mask, &config)?;
        self.bus.send(&frame)?;
        self.sensors.assign(mask, &config);
        info!(
            "Sensor ports 0x{:X} configured as {:?}",
            mask,
            config.sensor_type()
        );
        Ok(())
    }

    /// Type last configured on `port`; no I/O
    pub fn sensor_type(&self, port: SensorPort) -> SensorType {
        self.sensors.get_type(port)
    }

    /// Read and decode `port` according to its configured type
    pub fn read_sensor(&mut self, port: SensorPort) -> Result<SensorValue> {
        let configured = self.sensors.get_type(port);
        let in_bytes = self.sensors.i2c_in_bytes(port);
        let family = DecodeFamily::of(configured).ok_or(BrickError::NoResponse {
            message: port.read_message(),
            reason: NOT_CONFIGURED,
        })?;

        let payload = self
            .bus
            .read(port.read_message(), family.payload_len(in_bytes))?;
        let value = decode::decode(port, configured, in_bytes, &payload)?;
        debug!("{} ({:?}) read {:?}", port, configured, value);
        Ok(value)
    }

    /// Run one I2C transaction on a port configured as `SensorType::I2c`
    ///
    /// The `in_bytes` bytes read back are returned by the next `read_sensor`.
    pub fn transact_i2c(
        &mut self,
        port: SensorPort,
        address: u8,
        out: &[u8],
        in_bytes: u8,
    ) -> Result<()> {
        if self.sensors.get_type(port) != SensorType::I2c {
            return Err(BrickError::Sensor {
                port,
                reason: "port is not configured for I2C".to_string(),
            });
        }
        if out.len() > I2C_MAX_OUT_BYTES {
            return Err(BrickError::Validation(format!(
                "I2C write of {} bytes exceeds {}",
                out.len(),
                I2C_MAX_OUT_BYTES
            )));
        }

        let mut params = Vec::with_capacity(3 + out.len());
        params.extend_from_slice(&[address, in_bytes, out.len() as u8]);
        params.extend_from_slice(out);
        let frame = codec::encode_command(self.address(), port.i2c_message(), &params);
        self.bus.send(&frame)?;
        self.sensors.set_i2c_in_bytes(port, in_bytes);
        Ok(())
    }
}
