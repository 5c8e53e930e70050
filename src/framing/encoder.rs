use super::{unpack_bits, Crc16, DeframerConfig};
use crate::prelude::*;

/// Build the wire bits of a frame carrying `payload`, one bit per byte.
///
/// The frame is the sync word, the length byte, the payload and, if `config.has_crc`, the
/// big-endian CRC trailer computed with `config.crc_polynomial`.
///
/// # Errors
/// [Error::PayloadTooLong] if `payload` does not fit the 8-bit length field.
pub fn frame_bits(config: &DeframerConfig, payload: &[u8]) -> Result<Vec<u8>> {
    let length =
        u8::try_from(payload.len()).map_err(|_| Error::PayloadTooLong(payload.len()))?;

    let mut bytes = Vec::with_capacity(payload.len() + 3);
    bytes.push(length);
    bytes.extend_from_slice(payload);
    if config.has_crc {
        let crc = Crc16::new(config.crc_polynomial).frame_checksum(length, payload);
        bytes.extend_from_slice(&crc.to_be_bytes());
    }

    let mut bits: Vec<u8> = config.sync.bits().collect();
    bits.extend(unpack_bits(&bytes));
    Ok(bits)
}
