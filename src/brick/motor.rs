// Motor commands and readback

use std::fmt;
use std::str::FromStr;

use embedded_hal::spi::SpiDevice;
use serde::Serialize;
use tracing::debug;

use super::Brick;
use crate::messages::{MotorFlags, MotorStatus};
use crate::protocol::codec::{self, Width};
use crate::protocol::{BrickError, MessageType, Result};

/// Any power outside -100..=100 floats the motor; this is the canonical one
pub const MOTOR_FLOAT: i32 = -128;

/// Motor ports A to D
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MotorPort {
    A,
    B,
    C,
    D,
}

impl MotorPort {
    pub const ALL: [MotorPort; 4] = [MotorPort::A, MotorPort::B, MotorPort::C, MotorPort::D];

    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }

    pub fn mask_of(ports: &[MotorPort]) -> u8 {
        ports.iter().fold(0, |mask, p| mask | p.mask())
    }

    pub const fn encoder_message(self) -> MessageType {
        match self {
            MotorPort::A => MessageType::GetMotorAEncoder,
            MotorPort::B => MessageType::GetMotorBEncoder,
            MotorPort::C => MessageType::GetMotorCEncoder,
            MotorPort::D => MessageType::GetMotorDEncoder,
        }
    }

    pub const fn status_message(self) -> MessageType {
        match self {
            MotorPort::A => MessageType::GetMotorAStatus,
            MotorPort::B => MessageType::GetMotorBStatus,
            MotorPort::C => MessageType::GetMotorCStatus,
            MotorPort::D => MessageType::GetMotorDStatus,
        }
    }
}

impl fmt::Display for MotorPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {:?}", self)
    }
}

impl FromStr for MotorPort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(MotorPort::A),
            "B" => Ok(MotorPort::B),
            "C" => Ok(MotorPort::C),
            "D" => Ok(MotorPort::D),
            other => Err(format!("unknown motor port '{}', expected A-D", other)),
        }
    }
}

/// Status payload: flags, speed, encoder (4), dps (2)
const STATUS_LEN: usize = 8;

fn port_mask(ports: &[MotorPort]) -> Result<u8> {
    match MotorPort::mask_of(ports) {
        0 => Err(BrickError::Validation(
            "at least one motor port is required".to_string(),
        )),
        mask => Ok(mask),
    }
}

impl<SPI: SpiDevice> Brick<SPI> {
    /// Set motor power in percent, clamped to -128..=127 (-128 floats)
    pub fn set_motor_power(&mut self, ports: &[MotorPort], power: i32) -> Result<()> {
        let mask = port_mask(ports)?;
        let power = power.clamp(-128, 127);
        debug!("Motor power 0x{:X} -> {}", mask, power);
        self.bus
            .write_port_value(MessageType::SetMotorPower, mask, power, Width::W8)
    }

    /// Target position in degrees
    pub fn set_motor_position(&mut self, ports: &[MotorPort], position: i32) -> Result<()> {
        let mask = port_mask(ports)?;
        self.bus
            .write_port_value(MessageType::SetMotorPosition, mask, position, Width::W32)
    }

    /// Position-control proportional gain (firmware default 25)
    pub fn set_motor_position_kp(&mut self, ports: &[MotorPort], kp: u8) -> Result<()> {
        let mask = port_mask(ports)?;
        self.bus
            .write_port_value(MessageType::SetMotorPositionKp, mask, kp as i32, Width::W8)
    }

    /// Position-control derivative gain (firmware default 70)
    pub fn set_motor_position_kd(&mut self, ports: &[MotorPort], kd: u8) -> Result<()> {
        let mask = port_mask(ports)?;
        self.bus
            .write_port_value(MessageType::SetMotorPositionKd, mask, kd as i32, Width::W8)
    }

    /// Target speed in degrees per second
    pub fn set_motor_dps(&mut self, ports: &[MotorPort], dps: i16) -> Result<()> {
        let mask = port_mask(ports)?;
        self.bus
            .write_port_value(MessageType::SetMotorDps, mask, dps as i32, Width::W16)
    }

    pub fn set_motor_dps_kp(&mut self, ports: &[MotorPort], kp: u8) -> Result<()> {
        let mask = port_mask(ports)?;
        self.bus
            .write_port_value(MessageType::SetMotorDpsKp, mask, kp as i32, Width::W8)
    }

    pub fn set_motor_dps_kd(&mut self, ports: &[MotorPort], kd: u8) -> Result<()> {
        let mask = port_mask(ports)?;
        self.bus
            .write_port_value(MessageType::SetMotorDpsKd, mask, kd as i32, Width::W8)
    }

    /// Power limit in percent (capped at 100) and speed limit in degrees per
    /// second; 0 removes either limit
    pub fn set_motor_limits(&mut self, ports: &[MotorPort], power: u8, dps: u16) -> Result<()> {
        let mask = port_mask(ports)?;
        let mut params = vec![mask, power.min(100)];
        codec::push_be(&mut params, dps as i32, Width::W16);
        let frame = codec::encode_command(self.address(), MessageType::SetMotorLimits, &params);
        self.bus.send(&frame)
    }

    /// Shift the encoder zero by `offset` degrees
    pub fn offset_motor_encoder(&mut self, ports: &[MotorPort], offset: i32) -> Result<()> {
        let mask = port_mask(ports)?;
        self.bus
            .write_port_value(MessageType::OffsetMotorEncoder, mask, offset, Width::W32)
    }

    /// Encoder position in degrees
    pub fn motor_encoder(&mut self, port: MotorPort) -> Result<i32> {
        let raw = self.bus.read_u32(port.encoder_message())?;
        Ok(codec::sign_extend(raw, 32))
    }

    /// Zero the encoder at its current position; returns the offset applied
    pub fn reset_motor_encoder(&mut self, port: MotorPort) -> Result<i32> {
        let position = self.motor_encoder(port)?;
        self.offset_motor_encoder(&[port], position)?;
        Ok(position)
    }

    pub fn motor_status(&mut self, port: MotorPort) -> Result<MotorStatus> {
        let payload = self.bus.read(port.status_message(), STATUS_LEN)?;
        Ok(MotorStatus {
            flags: MotorFlags(payload[0]),
            speed: payload[1] as i8,
            encoder: codec::sign_extend(codec::be_unsigned(&payload[2..6]), 32),
            dps: codec::sign_extend(codec::be_unsigned(&payload[6..8]), 16) as i16,
        })
    }
}
