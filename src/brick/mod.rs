// High-level driver for one BrickPi3
//
// Owns the SPI device and the per-port sensor configuration. All operations
// take `&mut self`, so transactions on one board never interleave and a port
// cannot be retyped while it is being read.

mod board;
mod motor;
mod sensor;

use embedded_hal::spi::SpiDevice;
use tracing::info;

use crate::config::{DEFAULT_POSITION_KD, DEFAULT_POSITION_KP, LED_FIRMWARE_CONTROL};
use crate::messages::BoardInfo;
use crate::protocol::{Result, SpiBus};
use crate::sensor::{SensorPort, SensorRegistry, SensorType};

pub use motor::{MOTOR_FLOAT, MotorPort};

pub struct Brick<SPI> {
    bus: SpiBus<SPI>,
    sensors: SensorRegistry,
    info: Option<BoardInfo>,
}

impl<SPI: SpiDevice> Brick<SPI> {
    /// Wrap an SPI device without talking to the board
    pub fn new(spi: SPI, address: u8) -> Self {
        Self {
            bus: SpiBus::new(spi, address),
            sensors: SensorRegistry::new(),
            info: None,
        }
    }

    /// Wrap an SPI device and read the board identity
    pub fn connect(spi: SPI, address: u8) -> Result<Self> {
        let mut brick = Self::new(spi, address);
        let info = brick.board_info()?;
        info!(
            "Connected to {} {} (hw {}, fw {}, id {}) at address {}",
            info.manufacturer, info.board, info.hardware_version, info.firmware_version, info.id,
            address
        );
        brick.info = Some(info);
        Ok(brick)
    }

    /// Board identity read by `connect`
    pub fn info(&self) -> Option<&BoardInfo> {
        self.info.as_ref()
    }

    pub fn address(&self) -> u8 {
        self.bus.address()
    }

    pub fn sensors(&self) -> &SensorRegistry {
        &self.sensors
    }

    /// Give the SPI device back to the caller
    pub fn release(self) -> SPI {
        self.bus.release()
    }

    /// Unconfigure all sensors, float all motors, restore motor limits and
    /// position gains, and return the LED to the firmware
    pub fn reset_all(&mut self) -> Result<()> {
        info!("Resetting board at address {}", self.address());
        self.set_sensor_type(&SensorPort::ALL, SensorType::None)?;
        self.set_motor_power(&MotorPort::ALL, MOTOR_FLOAT)?;
        self.set_motor_limits(&MotorPort::ALL, 0, 0)?;
        self.set_motor_position_kp(&MotorPort::ALL, DEFAULT_POSITION_KP)?;
        self.set_motor_position_kd(&MotorPort::ALL, DEFAULT_POSITION_KD)?;
        self.set_led(LED_FIRMWARE_CONTROL)
    }
}
