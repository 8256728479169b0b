//! Driver for the BrickPi3 motor and sensor controller.
//!
//! The board is reached over SPI through any [`embedded_hal::spi::SpiDevice`].
//! [`Brick`] wraps the device and exposes board identity, voltages, motor
//! control and the four sensor ports.

pub mod brick;
pub mod config;
pub mod messages;
pub mod protocol;
pub mod runtime;
pub mod sensor;

pub use brick::{Brick, MOTOR_FLOAT, MotorPort};
pub use messages::{BoardInfo, MotorFlags, MotorStatus, SerialId, Version, Voltages};
pub use protocol::{BrickError, MessageType, Result};
pub use sensor::{SensorConfig, SensorPort, SensorType, SensorValue};
