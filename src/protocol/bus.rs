// Transaction engine for the BrickPi3 SPI link
//
// Every call is a single full-duplex exchange: the reply is exactly as long as
// the request. There is no retry; a missing sentinel fails the call.

use embedded_hal::spi::{Error as _, ErrorKind, SpiDevice};
use tracing::{debug, warn};

use super::codec::{self, PAYLOAD_OFFSET, SENTINEL, SENTINEL_INDEX, Width};
use super::message::MessageType;
use crate::sensor::SensorPort;

/// Error types for BrickPi3 communication
#[derive(Debug, thiserror::Error)]
pub enum BrickError {
    #[error("SPI transport error: {0}")]
    Transport(ErrorKind),

    #[error("No SPI response to {message}: {reason}")]
    NoResponse {
        message: MessageType,
        reason: &'static str,
    },

    #[error("Invalid sensor data on {port}: {reason}")]
    Sensor { port: SensorPort, reason: String },

    #[error("Invalid argument: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, BrickError>;

/// SPI link to one BrickPi3, pinned to a device address
pub struct SpiBus<SPI> {
    spi: SPI,
    address: u8,
}

impl<SPI: SpiDevice> SpiBus<SPI> {
    pub fn new(spi: SPI, address: u8) -> Self {
        Self { spi, address }
    }

    /// Address placed in the first byte of every request
    pub fn address(&self) -> u8 {
        self.address
    }

    pub(crate) fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Give the SPI device back to the caller
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Raw exchange of `out.len()` bytes, no framing checks
    pub fn exchange(&mut self, out: &[u8]) -> Result<Vec<u8>> {
        let mut reply = vec![0u8; out.len()];
        self.spi
            .transfer(&mut reply, out)
            .map_err(|e| BrickError::Transport(e.kind()))?;
        debug!("SPI out={:02X?} in={:02X?}", out, reply);
        Ok(reply)
    }

    /// Exchange `frame` and return the payload after the sentinel
    pub fn transact(&mut self, message: MessageType, frame: &[u8]) -> Result<Vec<u8>> {
        let reply = self.exchange(frame)?;
        if reply.len() <= SENTINEL_INDEX {
            return Err(BrickError::NoResponse {
                message,
                reason: "reply too short",
            });
        }
        if reply[SENTINEL_INDEX] != SENTINEL {
            warn!(
                "No response to {}: reply[{}]=0x{:02X}",
                message, SENTINEL_INDEX, reply[SENTINEL_INDEX]
            );
            return Err(BrickError::NoResponse {
                message,
                reason: "sentinel byte missing",
            });
        }
        Ok(reply[PAYLOAD_OFFSET..].to_vec())
    }

    /// Zero-padded read of `payload_len` bytes
    pub fn read(&mut self, message: MessageType, payload_len: usize) -> Result<Vec<u8>> {
        let frame = codec::encode_read(self.address, message, payload_len);
        self.transact(message, &frame)
    }

    /// Read an unsigned big-endian value of the given width
    pub fn read_value(&mut self, message: MessageType, width: Width) -> Result<u32> {
        let payload = self.read(message, width.bytes())?;
        Ok(codec::be_unsigned(&payload[..width.bytes()]))
    }

    pub fn read_u16(&mut self, message: MessageType) -> Result<u16> {
        Ok(self.read_value(message, Width::W16)? as u16)
    }

    pub fn read_u32(&mut self, message: MessageType) -> Result<u32> {
        self.read_value(message, Width::W32)
    }

    /// Send a command frame; the board does not acknowledge writes
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.exchange(frame).map(|_| ())
    }

    /// Write a big-endian value of the given width
    pub fn write_value(&mut self, message: MessageType, value: i32, width: Width) -> Result<()> {
        let frame = codec::encode_value(self.address, message, value, width);
        self.send(&frame)
    }

    /// Write a big-endian value to the ports selected by `port_mask`
    pub fn write_port_value(
        &mut self,
        message: MessageType,
        port_mask: u8,
        value: i32,
        width: Width,
    ) -> Result<()> {
        let frame = codec::encode_port_value(self.address, message, port_mask, value, width);
        self.send(&frame)
    }
}
