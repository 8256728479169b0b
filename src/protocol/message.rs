// SPI message types understood by the BrickPi3 firmware
//
// The discriminant is the second byte of every request frame.

use std::fmt;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    None = 0,
    GetManufacturer = 1,
    GetName = 2,
    GetHardwareVersion = 3,
    GetFirmwareVersion = 4,
    GetId = 5,
    SetLed = 6,
    GetVoltage3v3 = 7,
    GetVoltage5v = 8,
    GetVoltage9v = 9,
    GetVoltageVcc = 10,
    SetAddress = 11,
    SetSensorType = 12,
    GetSensor1 = 13,
    GetSensor2 = 14,
    GetSensor3 = 15,
    GetSensor4 = 16,
    I2cTransact1 = 17,
    I2cTransact2 = 18,
    I2cTransact3 = 19,
    I2cTransact4 = 20,
    SetMotorPower = 21,
    SetMotorPosition = 22,
    SetMotorPositionKp = 23,
    SetMotorPositionKd = 24,
    SetMotorDps = 25,
    SetMotorDpsKp = 26,
    SetMotorDpsKd = 27,
    SetMotorLimits = 28,
    OffsetMotorEncoder = 29,
    GetMotorAEncoder = 30,
    GetMotorBEncoder = 31,
    GetMotorCEncoder = 32,
    GetMotorDEncoder = 33,
    GetMotorAStatus = 34,
    GetMotorBStatus = 35,
    GetMotorCStatus = 36,
    GetMotorDStatus = 37,
}

impl MessageType {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (0x{:02X})", self, self.code())
    }
}
