// Board identity, voltages, LED and SPI address

use embedded_hal::spi::SpiDevice;
use tracing::info;

use super::Brick;
use crate::messages::{BoardInfo, SerialId, Version, Voltages};
use crate::protocol::codec::{self, Width};
use crate::protocol::{BrickError, MessageType, Result};

/// Manufacturer and board names are NUL-padded to this length
const NAME_LEN: usize = 20;
const SERIAL_ID_LEN: usize = 16;

impl<SPI: SpiDevice> Brick<SPI> {
    fn read_name(&mut self, message: MessageType) -> Result<String> {
        let payload = self.bus.read(message, NAME_LEN)?;
        let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
        Ok(String::from_utf8_lossy(&payload[..end]).into_owned())
    }

    pub fn manufacturer(&mut self) -> Result<String> {
        self.read_name(MessageType::GetManufacturer)
    }

    pub fn board_name(&mut self) -> Result<String> {
        self.read_name(MessageType::GetName)
    }

    pub fn hardware_version(&mut self) -> Result<Version> {
        Ok(self.bus.read_u32(MessageType::GetHardwareVersion)?.into())
    }

    pub fn firmware_version(&mut self) -> Result<Version> {
        Ok(self.bus.read_u32(MessageType::GetFirmwareVersion)?.into())
    }

    pub fn serial_id(&mut self) -> Result<SerialId> {
        let payload = self.bus.read(MessageType::GetId, SERIAL_ID_LEN)?;
        let mut id = [0u8; SERIAL_ID_LEN];
        id.copy_from_slice(&payload[..SERIAL_ID_LEN]);
        Ok(SerialId(id))
    }

    /// Query every identity field
    pub fn board_info(&mut self) -> Result<BoardInfo> {
        Ok(BoardInfo {
            manufacturer: self.manufacturer()?,
            board: self.board_name()?,
            hardware_version: self.hardware_version()?,
            firmware_version: self.firmware_version()?,
            id: self.serial_id()?,
        })
    }

    fn read_voltage(&mut self, message: MessageType) -> Result<f64> {
        let millivolts = self.bus.read_u16(message)?;
        Ok(millivolts as f64 / 1000.0)
    }

    pub fn voltage_3v3(&mut self) -> Result<f64> {
        self.read_voltage(MessageType::GetVoltage3v3)
    }

    pub fn voltage_5v(&mut self) -> Result<f64> {
        self.read_voltage(MessageType::GetVoltage5v)
    }

    pub fn voltage_9v(&mut self) -> Result<f64> {
        self.read_voltage(MessageType::GetVoltage9v)
    }

    pub fn voltage_battery(&mut self) -> Result<f64> {
        self.read_voltage(MessageType::GetVoltageVcc)
    }

    /// Read all four rails; never cached
    pub fn voltages(&mut self) -> Result<Voltages> {
        Ok(Voltages {
            v3_3: self.voltage_3v3()?,
            v5: self.voltage_5v()?,
            v9: self.voltage_9v()?,
            battery: self.voltage_battery()?,
        })
    }

    /// Set the LED brightness in percent; 255 hands the LED back to the firmware
    pub fn set_led(&mut self, percent: u8) -> Result<()> {
        self.bus
            .write_value(MessageType::SetLed, percent as i32, Width::W8)
    }

    /// Move the board to a new SPI address
    ///
    /// With several boards stacked, `id` (32 hex digits) selects which one
    /// takes the address. The request always goes to the broadcast address 0.
    pub fn set_address(&mut self, address: u8, id: Option<&str>) -> Result<()> {
        if address == 0 {
            return Err(BrickError::Validation(
                "SPI address must be 1 to 255".to_string(),
            ));
        }
        let id = match id {
            Some(s) => s.parse::<SerialId>()?,
            None => SerialId::default(),
        };

        let mut params = Vec::with_capacity(1 + SERIAL_ID_LEN);
        params.push(address);
        params.extend_from_slice(id.as_bytes());
        let frame = codec::encode_command(0, MessageType::SetAddress, &params);
        self.bus.transact(MessageType::SetAddress, &frame)?;

        info!("Board address changed from {} to {}", self.address(), address);
        self.bus.set_address(address);
        Ok(())
    }
}
