// Sensor ports, sensor types and their configuration parameters

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use serde::Serialize;

use crate::protocol::MessageType;

/// Sensor ports 1 to 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SensorPort {
    Port1,
    Port2,
    Port3,
    Port4,
}

impl SensorPort {
    pub const ALL: [SensorPort; 4] = [
        SensorPort::Port1,
        SensorPort::Port2,
        SensorPort::Port3,
        SensorPort::Port4,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit selecting this port in a port mask
    pub const fn mask(self) -> u8 {
        1 << self.index()
    }

    /// Port mask covering all of `ports`
    pub fn mask_of(ports: &[SensorPort]) -> u8 {
        ports.iter().fold(0, |mask, p| mask | p.mask())
    }

    pub const fn read_message(self) -> MessageType {
        match self {
            SensorPort::Port1 => MessageType::GetSensor1,
            SensorPort::Port2 => MessageType::GetSensor2,
            SensorPort::Port3 => MessageType::GetSensor3,
            SensorPort::Port4 => MessageType::GetSensor4,
        }
    }

    pub const fn i2c_message(self) -> MessageType {
        match self {
            SensorPort::Port1 => MessageType::I2cTransact1,
            SensorPort::Port2 => MessageType::I2cTransact2,
            SensorPort::Port3 => MessageType::I2cTransact3,
            SensorPort::Port4 => MessageType::I2cTransact4,
        }
    }
}

impl fmt::Display for SensorPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port S{}", self.index() + 1)
    }
}

impl FromStr for SensorPort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches(['S', 's']) {
            "1" => Ok(SensorPort::Port1),
            "2" => Ok(SensorPort::Port2),
            "3" => Ok(SensorPort::Port3),
            "4" => Ok(SensorPort::Port4),
            other => Err(format!("unknown sensor port '{}', expected 1-4", other)),
        }
    }
}

/// Sensor types supported by the firmware
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    #[default]
    None = 1,
    I2c = 2,
    Custom = 3,
    Touch = 4,
    NxtTouch = 5,
    Ev3Touch = 6,
    NxtLightOn = 7,
    NxtLightOff = 8,
    NxtColorRed = 9,
    NxtColorGreen = 10,
    NxtColorBlue = 11,
    NxtColorFull = 12,
    NxtColorOff = 13,
    NxtUltrasonic = 14,
    Ev3GyroAbs = 15,
    Ev3GyroDps = 16,
    Ev3GyroAbsDps = 17,
    Ev3ColorReflected = 18,
    Ev3ColorAmbient = 19,
    Ev3ColorColor = 20,
    Ev3ColorRawReflected = 21,
    Ev3ColorColorComponents = 22,
    Ev3UltrasonicCm = 23,
    Ev3UltrasonicInches = 24,
    Ev3UltrasonicListen = 25,
    Ev3InfraredProximity = 26,
    Ev3InfraredSeek = 27,
    Ev3InfraredRemote = 28,
}

impl SensorType {
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// True when a reply echoing `code` belongs to a port configured as `self`
    ///
    /// A generic `Touch` port reports whichever touch sensor is plugged in.
    pub fn accepts_echo(self, code: u8) -> bool {
        code == self.code()
            || (self == SensorType::Touch
                && (code == SensorType::NxtTouch.code() || code == SensorType::Ev3Touch.code()))
    }
}

/// Data state reported in the second byte of a sensor reply
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorState {
    ValidData = 0,
    NotConfigured = 1,
    Configuring = 2,
    NoData = 3,
    I2cError = 4,
}

impl SensorState {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SensorState::ValidData),
            1 => Some(SensorState::NotConfigured),
            2 => Some(SensorState::Configuring),
            3 => Some(SensorState::NoData),
            4 => Some(SensorState::I2cError),
            _ => None,
        }
    }
}

/// Pin configuration word for `SensorType::Custom`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CustomConfig(pub u16);

impl CustomConfig {
    /// 9V on pin 1 (NXT ultrasonic)
    pub const PIN1_9V: CustomConfig = CustomConfig(0x0002);
    /// Pin 5 as output; input otherwise
    pub const PIN5_OUT: CustomConfig = CustomConfig(0x0010);
    /// Pin 5 output level, only with PIN5_OUT
    pub const PIN5_STATE: CustomConfig = CustomConfig(0x0020);
    pub const PIN6_OUT: CustomConfig = CustomConfig(0x0100);
    pub const PIN6_STATE: CustomConfig = CustomConfig(0x0200);
    /// ADC on pin 1 (NXT analog sensors)
    pub const PIN1_ADC: CustomConfig = CustomConfig(0x1000);
    pub const PIN6_ADC: CustomConfig = CustomConfig(0x4000);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: CustomConfig) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CustomConfig {
    type Output = CustomConfig;

    fn bitor(self, rhs: Self) -> Self {
        CustomConfig(self.0 | rhs.0)
    }
}

/// Flags for `SensorType::I2c`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I2cSettings(pub u8);

impl I2cSettings {
    /// Clock pulse between write and read (NXT ultrasonic)
    pub const MID_CLOCK: I2cSettings = I2cSettings(0x01);
    /// 9V pullup on pin 1
    pub const PIN1_9V: I2cSettings = I2cSettings(0x02);
    /// Keep repeating the same transaction
    pub const SAME: I2cSettings = I2cSettings(0x04);
    pub const ALLOW_STRETCH_ACK: I2cSettings = I2cSettings(0x08);
    pub const ALLOW_STRETCH_ANY: I2cSettings = I2cSettings(0x10);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: I2cSettings) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for I2cSettings {
    type Output = I2cSettings;

    fn bitor(self, rhs: Self) -> Self {
        I2cSettings(self.0 | rhs.0)
    }
}

/// Transaction the firmware repeats on its own when `I2cSettings::SAME` is set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I2cRepeat {
    /// Delay between transactions in microseconds
    pub delay_us: u32,
    pub address: u8,
    pub out: Vec<u8>,
    pub in_bytes: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct I2cConfig {
    pub settings: I2cSettings,
    /// Target clock period in microseconds
    pub speed_us: u8,
    pub repeat: Option<I2cRepeat>,
}

/// What to configure a sensor port as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorConfig {
    Type(SensorType),
    Custom(CustomConfig),
    I2c(I2cConfig),
}

impl SensorConfig {
    pub fn sensor_type(&self) -> SensorType {
        match self {
            SensorConfig::Type(t) => *t,
            SensorConfig::Custom(_) => SensorType::Custom,
            SensorConfig::I2c(_) => SensorType::I2c,
        }
    }
}

impl From<SensorType> for SensorConfig {
    fn from(t: SensorType) -> Self {
        match t {
            SensorType::Custom => SensorConfig::Custom(CustomConfig::default()),
            SensorType::I2c => SensorConfig::I2c(I2cConfig::default()),
            other => SensorConfig::Type(other),
        }
    }
}
