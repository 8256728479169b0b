// Sensor reply decoding
//
// The reply layout depends only on the sensor type configured on the port.
// Payload (bytes after the sentinel):
//   [0] echoed sensor type, [1] sensor state, [2..] family-specific data

use serde::Serialize;
use tracing::warn;

use super::types::{SensorPort, SensorState, SensorType};
use crate::protocol::codec::{be_unsigned, sign_extend};
use crate::protocol::{BrickError, Result};

/// Echoed type + state bytes ahead of the sensor data
pub const HEADER_LEN: usize = 2;

pub(crate) const NOT_CONFIGURED: &str = "sensor not configured or not supported";

/// Groups of sensor types sharing a reply length and interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFamily {
    /// One byte: touch state, colour index, NXT ultrasonic cm, proximity
    State,
    /// One big-endian 16-bit value
    Scalar16,
    /// Two 12-bit ADC readings and two digital pins
    CustomPins,
    /// Detected colour plus four 10-bit channels
    NxtColorFull,
    /// Two big-endian 16-bit values
    Pair16,
    /// Four big-endian 16-bit values
    ColorComponents,
    /// Heading/distance for four beacon channels, raw
    InfraredSeek,
    /// One button code per remote channel
    InfraredRemote,
    /// Bytes read from the I2C device
    I2c,
}

impl DecodeFamily {
    pub fn of(sensor_type: SensorType) -> Option<Self> {
        use SensorType::*;
        let family = match sensor_type {
            None => return Option::None,
            Touch | NxtTouch | Ev3Touch | NxtUltrasonic | Ev3ColorReflected | Ev3ColorAmbient
            | Ev3ColorColor | Ev3UltrasonicListen | Ev3InfraredProximity => DecodeFamily::State,
            NxtLightOn | NxtLightOff | NxtColorRed | NxtColorGreen | NxtColorBlue
            | NxtColorOff | Ev3GyroAbs | Ev3GyroDps | Ev3UltrasonicCm | Ev3UltrasonicInches => {
                DecodeFamily::Scalar16
            }
            Custom => DecodeFamily::CustomPins,
            NxtColorFull => DecodeFamily::NxtColorFull,
            Ev3ColorRawReflected | Ev3GyroAbsDps => DecodeFamily::Pair16,
            Ev3ColorColorComponents => DecodeFamily::ColorComponents,
            Ev3InfraredSeek => DecodeFamily::InfraredSeek,
            Ev3InfraredRemote => DecodeFamily::InfraredRemote,
            I2c => DecodeFamily::I2c,
        };
        Some(family)
    }

    /// Sensor data bytes following the echoed type and state
    pub fn data_len(self, i2c_in_bytes: u8) -> usize {
        match self {
            DecodeFamily::State => 1,
            DecodeFamily::Scalar16 => 2,
            DecodeFamily::CustomPins => 4,
            DecodeFamily::NxtColorFull => 6,
            DecodeFamily::Pair16 => 4,
            DecodeFamily::ColorComponents => 8,
            DecodeFamily::InfraredSeek => 8,
            DecodeFamily::InfraredRemote => 4,
            DecodeFamily::I2c => i2c_in_bytes as usize,
        }
    }

    /// Reply payload length to request, header included
    pub fn payload_len(self, i2c_in_bytes: u8) -> usize {
        HEADER_LEN + self.data_len(i2c_in_bytes)
    }
}

/// Pin readings of a `Custom` sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CustomPins {
    /// 0-4095 on a 5V scale
    pub pin1_adc: u16,
    /// 0-4095 on a 3.3V scale
    pub pin6_adc: u16,
    pub pin5_digital: bool,
    pub pin6_digital: bool,
}

/// NXT colour sensor in full-colour mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NxtColor {
    pub color: u8,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub ambient: u16,
}

/// Decoded sensor reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorValue {
    State(u8),
    Scalar(i32),
    Custom(CustomPins),
    NxtColor(NxtColor),
    Pair([i32; 2]),
    ColorComponents([u16; 4]),
    InfraredSeek([u8; 8]),
    InfraredRemote([u8; 4]),
    I2c(Vec<u8>),
}

impl SensorValue {
    /// Single numeric value, for the one-value families
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            SensorValue::State(v) => Some(*v as i32),
            SensorValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// (heading, distance) per channel for an infrared seek reading
    ///
    /// Heading is -25..25; distance is 0..100, or -128 when no beacon is seen.
    pub fn seek_channels(&self) -> Option<[(i8, i8); 4]> {
        match self {
            SensorValue::InfraredSeek(raw) => {
                let mut channels = [(0i8, 0i8); 4];
                for (c, pair) in raw.chunks_exact(2).enumerate() {
                    channels[c] = (pair[0] as i8, pair[1] as i8);
                }
                Some(channels)
            }
            _ => None,
        }
    }
}

/// Infrared remote button code to a red-up/red-down/blue-up/blue-down/beacon bit pattern
pub const fn remote_buttons(code: u8) -> u8 {
    match code {
        1 => 0b10000,
        2 => 0b01000,
        3 => 0b00100,
        4 => 0b00010,
        5 => 0b10100,
        6 => 0b10010,
        7 => 0b01100,
        8 => 0b01010,
        9 => 0b00001,
        10 => 0b11000,
        11 => 0b00110,
        _ => 0b00000,
    }
}

/// Decode the payload of a sensor read on a port configured as `configured`
pub fn decode(
    port: SensorPort,
    configured: SensorType,
    i2c_in_bytes: u8,
    payload: &[u8],
) -> Result<SensorValue> {
    let family = DecodeFamily::of(configured).ok_or(BrickError::NoResponse {
        message: port.read_message(),
        reason: NOT_CONFIGURED,
    })?;

    let expected = family.payload_len(i2c_in_bytes);
    if payload.len() < expected {
        return Err(BrickError::Sensor {
            port,
            reason: format!("expected {} reply bytes, got {}", expected, payload.len()),
        });
    }

    let (echo, state) = (payload[0], payload[1]);
    if !configured.accepts_echo(echo) {
        warn!("{} configured as {:?} reported type {}", port, configured, echo);
        return Err(BrickError::Sensor {
            port,
            reason: format!("configured as {:?}, board reports type {}", configured, echo),
        });
    }
    if state != SensorState::ValidData as u8 {
        let reason = match SensorState::from_code(state) {
            Some(s) => format!("sensor state {:?}", s),
            None => format!("unknown sensor state {}", state),
        };
        return Err(BrickError::Sensor { port, reason });
    }

    let data = &payload[HEADER_LEN..expected];
    let value = match family {
        DecodeFamily::State => SensorValue::State(data[0]),
        DecodeFamily::Scalar16 => {
            let raw = be_unsigned(data);
            let value = match configured {
                SensorType::Ev3GyroAbs | SensorType::Ev3GyroDps => sign_extend(raw, 16),
                SensorType::Ev3UltrasonicCm | SensorType::Ev3UltrasonicInches => raw as i32 / 10,
                _ => raw as i32,
            };
            SensorValue::Scalar(value)
        }
        // reply[6] pin flags, [7] pin-6 ADC high, [8] pin-6 low | pin-1 high nibbles, [9] pin-1 ADC low
        DecodeFamily::CustomPins => SensorValue::Custom(CustomPins {
            pin1_adc: (((data[2] & 0x0F) as u16) << 8) | data[3] as u16,
            pin6_adc: (((data[2] >> 4) & 0x0F) as u16) | ((data[1] as u16) << 4),
            pin5_digital: data[0] & 0x01 != 0,
            pin6_digital: (data[0] >> 1) & 0x01 != 0,
        }),
        DecodeFamily::NxtColorFull => {
            let low = data[5];
            let channel = |byte: u8, shift: u32| ((byte as u16) << 2) | ((low >> shift) & 0x03) as u16;
            SensorValue::NxtColor(NxtColor {
                color: data[0],
                red: channel(data[1], 6),
                green: channel(data[2], 4),
                blue: channel(data[3], 2),
                ambient: channel(data[4], 0),
            })
        }
        DecodeFamily::Pair16 => {
            let mut values = [be_unsigned(&data[0..2]) as i32, be_unsigned(&data[2..4]) as i32];
            if configured == SensorType::Ev3GyroAbsDps {
                values = values.map(|v| sign_extend(v as u32, 16));
            }
            // second value on the wire comes first
            SensorValue::Pair([values[1], values[0]])
        }
        DecodeFamily::ColorComponents => {
            let mut values = [0u16; 4];
            for (i, pair) in data.chunks_exact(2).enumerate() {
                values[i] = be_unsigned(pair) as u16;
            }
            SensorValue::ColorComponents(values)
        }
        DecodeFamily::InfraredSeek => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(data);
            SensorValue::InfraredSeek(raw)
        }
        DecodeFamily::InfraredRemote => {
            let mut buttons = [0u8; 4];
            for (b, &code) in buttons.iter_mut().zip(data) {
                *b = remote_buttons(code);
            }
            SensorValue::InfraredRemote(buttons)
        }
        DecodeFamily::I2c => SensorValue::I2c(data.to_vec()),
    };

    Ok(value)
}
