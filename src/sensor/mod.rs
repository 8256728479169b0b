// Sensor subsystem
//
// Provides:
// - Port and sensor type enumerations
// - Per-port configured-type registry
// - Reply decoding per sensor type
// - Mode cycling for the LEGO sensors

pub mod decode;
pub mod modes;
pub mod registry;
mod types;

pub use decode::{CustomPins, DecodeFamily, NxtColor, SensorValue};
pub use modes::ModeCycle;
pub use registry::SensorRegistry;
pub use types::{
    CustomConfig, I2cConfig, I2cRepeat, I2cSettings, SensorConfig, SensorPort, SensorState,
    SensorType,
};
