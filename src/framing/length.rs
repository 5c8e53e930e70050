/// Decodes the 8-bit length field that immediately follows a sync word.
#[derive(Debug, Clone, Default)]
pub struct LengthDecoder {
    reg: u8,
    count: u8,
}

impl LengthDecoder {
    /// Width of the length field in bits.
    pub const BITS: u8 = 8;

    #[must_use]
    pub fn new() -> Self {
        LengthDecoder::default()
    }

    /// Shift in the next bit, MSB-first. Returns the decoded length once all
    /// [LengthDecoder::BITS] bits have been received.
    pub fn push(&mut self, bit: bool) -> Option<u8> {
        debug_assert!(self.count < Self::BITS, "length field already decoded");
        self.reg = (self.reg << 1) | u8::from(bit);
        self.count += 1;
        (self.count == Self::BITS).then_some(self.reg)
    }
}

/// Sizing of a frame body, produced once the length field is known and consumed by the
/// [PayloadAccumulator](super::PayloadAccumulator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLayout {
    /// Payload length in bytes, as received.
    pub length: u8,
    /// Whether a 16-bit CRC trailer follows the payload.
    pub has_crc: bool,
}

impl PayloadLayout {
    pub const CRC_BITS: usize = 16;

    #[must_use]
    pub fn new(length: u8, has_crc: bool) -> Self {
        PayloadLayout { length, has_crc }
    }

    /// Total number of bits in the frame body, including any CRC trailer.
    #[must_use]
    pub fn num_bits(&self) -> usize {
        usize::from(self.length) * 8 + if self.has_crc { Self::CRC_BITS } else { 0 }
    }
}
