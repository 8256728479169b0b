// BrickPi3 SPI protocol
//
// Provides:
// - Message type numbering
// - Frame encoding for reads and writes
// - The single-exchange transaction engine

mod bus;
pub mod codec;
mod message;

pub use bus::{BrickError, Result, SpiBus};
pub use codec::Width;
pub use message::MessageType;
