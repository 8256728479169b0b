#![allow(dead_code)]

use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

pub const ADDRESS: u8 = 1;

/// Expectations for one full-duplex exchange
pub fn exchange(write: Vec<u8>, read: Vec<u8>) -> Vec<SpiTransaction<u8>> {
    vec![
        SpiTransaction::transaction_start(),
        SpiTransaction::transfer(write, read),
        SpiTransaction::transaction_end(),
    ]
}

/// SPI mock expecting `exchanges` in order
pub fn spi(exchanges: Vec<(Vec<u8>, Vec<u8>)>) -> SpiMock<u8> {
    let expectations: Vec<SpiTransaction<u8>> = exchanges
        .into_iter()
        .flat_map(|(write, read)| exchange(write, read))
        .collect();
    SpiMock::new(&expectations)
}

/// Zero-padded read request for `payload_len` reply bytes
pub fn read_request(address: u8, message: u8, payload_len: usize) -> Vec<u8> {
    let mut frame = vec![0u8; 4 + payload_len];
    frame[0] = address;
    frame[1] = message;
    frame
}

/// Reply carrying the sentinel and `payload`
pub fn reply(payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![0, 0, 0, 0xA5];
    frame.extend_from_slice(payload);
    frame
}

/// Reply without the sentinel
pub fn silent(len: usize) -> Vec<u8> {
    vec![0xFF; len]
}

/// A write is answered with filler the driver ignores
pub fn write(frame: Vec<u8>) -> (Vec<u8>, Vec<u8>) {
    let len = frame.len();
    (frame, vec![0; len])
}

/// NUL-padded 20-byte name field
pub fn name(s: &str) -> Vec<u8> {
    let mut field = s.as_bytes().to_vec();
    field.resize(20, 0);
    field
}
