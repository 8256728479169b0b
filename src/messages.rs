// Records returned by board and motor queries
//
// All of them serialize to JSON for the diagnostic binary.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::protocol::BrickError;

/// Firmware/hardware version packed as major * 1_000_000 + minor * 1000 + patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl From<u32> for Version {
    fn from(packed: u32) -> Self {
        Self {
            major: packed / 1_000_000,
            minor: (packed / 1000) % 1000,
            patch: packed % 1000,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = BrickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BrickError::Validation(format!("'{}' is not a major.minor.patch version", s));
        let mut parts = s.trim().split('.').map(|p| p.parse::<u32>().map_err(|_| bad()));
        let version = Version {
            major: parts.next().ok_or_else(bad)??,
            minor: parts.next().ok_or_else(bad)??,
            patch: parts.next().ok_or_else(bad)??,
        };
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(version)
    }
}

/// 128-bit board serial number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SerialId(pub [u8; 16]);

impl SerialId {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for SerialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl FromStr for SerialId {
    type Err = BrickError;

    /// Parse the 32 hex digit form printed by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(BrickError::Validation(format!(
                "serial id must be 32 hex digits, got {} characters",
                s.len()
            )));
        }
        let mut id = [0u8; 16];
        hex::decode_to_slice(s, &mut id)
            .map_err(|e| BrickError::Validation(format!("serial id '{}': {}", s, e)))?;
        Ok(SerialId(id))
    }
}

impl Serialize for SerialId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Identity of the board, read once when connecting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardInfo {
    pub manufacturer: String,
    pub board: String,
    pub hardware_version: Version,
    pub firmware_version: Version,
    pub id: SerialId,
}

/// Rail voltages in volts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Voltages {
    pub v3_3: f64,
    pub v5: f64,
    pub v9: f64,
    pub battery: f64,
}

/// Motor status flag bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct MotorFlags(pub u8);

impl MotorFlags {
    pub const ALL_OK: MotorFlags = MotorFlags(0x00);
    /// Motors disabled because the battery is too low
    pub const LOW_VOLTAGE_FLOAT: MotorFlags = MotorFlags(0x01);
    /// Motor is not close to its position or speed target
    pub const OVERLOADED: MotorFlags = MotorFlags(0x02);

    pub const fn contains(self, other: MotorFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn low_voltage_float(self) -> bool {
        self.contains(Self::LOW_VOLTAGE_FLOAT)
    }

    pub fn overloaded(self) -> bool {
        self.contains(Self::OVERLOADED)
    }
}

/// Snapshot of one motor, fetched fresh on every query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MotorStatus {
    pub flags: MotorFlags,
    /// Raw PWM power in percent
    pub speed: i8,
    /// Encoder position in degrees
    pub encoder: i32,
    /// Speed in degrees per second
    pub dps: i16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_unpacking() {
        let v = Version::from(1_004_007);
        assert_eq!(v, Version { major: 1, minor: 4, patch: 7 });
        assert_eq!(v.to_string(), "1.4.7");
        assert_eq!(Version::from(3_000_012).to_string(), "3.0.12");
    }

    #[test]
    fn test_version_parse() {
        assert_eq!("1.4.7".parse::<Version>().unwrap(), Version::from(1_004_007));
        assert!("1.4".parse::<Version>().is_err());
        assert!("1.4.x".parse::<Version>().is_err());
        assert!("1.4.7.1".parse::<Version>().is_err());
    }

    #[test]
    fn test_serial_id_hex() {
        let id: SerialId = "00112233445566778899AABBCCDDEEFF".parse().unwrap();
        assert_eq!(id.0[0], 0x00);
        assert_eq!(id.0[10], 0xAA);
        assert_eq!(id.to_string(), "00112233445566778899AABBCCDDEEFF");
        let lower: SerialId = "00112233445566778899aabbccddeeff".parse().unwrap();
        assert_eq!(lower, id);
    }

    #[test]
    fn test_serial_id_rejects_malformed() {
        assert!(matches!(
            "0011".parse::<SerialId>(),
            Err(BrickError::Validation(_))
        ));
        assert!(matches!(
            "G0112233445566778899AABBCCDDEEFF".parse::<SerialId>(),
            Err(BrickError::Validation(_))
        ));
    }

    #[test]
    fn test_motor_flags() {
        let flags = MotorFlags(0x03);
        assert!(flags.low_voltage_float());
        assert!(flags.overloaded());
        assert!(!MotorFlags::ALL_OK.overloaded());
    }

    #[test]
    fn test_board_info_json() {
        let info = BoardInfo {
            manufacturer: "Dexter Industries".to_string(),
            board: "BrickPi3".to_string(),
            hardware_version: Version::from(3_002_001),
            firmware_version: Version::from(1_004_004),
            id: SerialId([0xAB; 16]),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["board"], "BrickPi3");
        assert_eq!(json["hardware_version"]["major"], 3);
        assert_eq!(json["id"], "AB".repeat(16));
    }
}
