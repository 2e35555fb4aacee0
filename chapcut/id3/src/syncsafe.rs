/*!
    Syncsafe integers: 28-bit values stored as four 7-bit bytes so the
    encoded form never contains a false MPEG sync pattern.
*/

use crate::error::{Id3Error, Id3Result};

/// Largest value representable as a syncsafe integer.
pub const MAX: u32 = (1 << 28) - 1;

/**
    Decode a 4-byte syncsafe integer.

    Fails if any byte has its high bit set.
*/
pub fn decode(bytes: &[u8; 4]) -> Id3Result<u32> {
    if bytes.iter().any(|&b| b & 0x80 != 0) {
        return Err(Id3Error::InvalidSyncsafe);
    }
    Ok(bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | u32::from(b)))
}

/**
    Encode a value as a 4-byte syncsafe integer.
*/
pub fn encode(value: u32) -> Id3Result<[u8; 4]> {
    if value > MAX {
        return Err(Id3Error::TooLarge("syncsafe integer"));
    }
    Ok([
        ((value >> 21) & 0x7f) as u8,
        ((value >> 14) & 0x7f) as u8,
        ((value >> 7) & 0x7f) as u8,
        (value & 0x7f) as u8,
    ])
}
