// Frame layout for the BrickPi3 SPI protocol
//
// Request: [address, message type, params...]
// Reply:   same length as the request; reply[3] == 0xA5 when the board handled
//          the request, payload starts at reply[4].
// Multi-byte values are big-endian.

use super::message::MessageType;

/// Marker the board writes at `SENTINEL_INDEX` of a handled reply
pub const SENTINEL: u8 = 0xA5;
pub const SENTINEL_INDEX: usize = 3;
pub const PAYLOAD_OFFSET: usize = 4;

/// Width of a numeric payload on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W24,
    W32,
}

impl Width {
    pub const fn bytes(self) -> usize {
        match self {
            Width::W8 => 1,
            Width::W16 => 2,
            Width::W24 => 3,
            Width::W32 => 4,
        }
    }
}

/// Append the low `width` bytes of `value`, most significant first
pub fn push_be(frame: &mut Vec<u8>, value: i32, width: Width) {
    let bytes = value.to_be_bytes();
    frame.extend_from_slice(&bytes[4 - width.bytes()..]);
}

/// `[address, message, value...]`
pub fn encode_value(address: u8, message: MessageType, value: i32, width: Width) -> Vec<u8> {
    let mut frame = Vec::with_capacity(2 + width.bytes());
    frame.push(address);
    frame.push(message.code());
    push_be(&mut frame, value, width);
    frame
}

/// `[address, message, port_mask, value...]` used by the per-port motor commands
pub fn encode_port_value(
    address: u8,
    message: MessageType,
    port_mask: u8,
    value: i32,
    width: Width,
) -> Vec<u8> {
    let mut frame = Vec::with_capacity(3 + width.bytes());
    frame.push(address);
    frame.push(message.code());
    frame.push(port_mask);
    push_be(&mut frame, value, width);
    frame
}

/// `[address, message, params...]`
pub fn encode_command(address: u8, message: MessageType, params: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(2 + params.len());
    frame.push(address);
    frame.push(message.code());
    frame.extend_from_slice(params);
    frame
}

/// Zero-padded read request with room for `payload_len` reply bytes
pub fn encode_read(address: u8, message: MessageType, payload_len: usize) -> Vec<u8> {
    let mut frame = vec![0u8; PAYLOAD_OFFSET + payload_len];
    frame[0] = address;
    frame[1] = message.code();
    frame
}

/// Big-endian unsigned value from up to four bytes
pub fn be_unsigned(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32)
}

/// Two's-complement interpretation of the low `bits` bits of `raw`
pub fn sign_extend(raw: u32, bits: u32) -> i32 {
    debug_assert!((1..=32).contains(&bits));
    let shift = 32 - bits;
    ((raw << shift) as i32) >> shift
}
