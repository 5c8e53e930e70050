use std::collections::TryReserveError;

use super::{pack_bits, Crc16, PayloadLayout};

/// Collects the bits of a single frame body.
///
/// The bit buffer is sized from the [PayloadLayout] when the accumulator is created and
/// never grows; bits past its end are ignored.
#[derive(Debug, Clone)]
pub struct PayloadAccumulator {
    layout: PayloadLayout,
    buf: Vec<u8>,
    index: usize,
}

impl PayloadAccumulator {
    /// Allocate the bit buffer for `layout`.
    ///
    /// # Errors
    /// If the buffer cannot be allocated.
    pub fn new(layout: PayloadLayout) -> Result<Self, TryReserveError> {
        let num_bits = layout.num_bits();
        let mut buf = Vec::new();
        buf.try_reserve_exact(num_bits)?;
        buf.resize(num_bits, 0);
        Ok(PayloadAccumulator {
            layout,
            buf,
            index: 0,
        })
    }

    #[must_use]
    pub fn layout(&self) -> PayloadLayout {
        self.layout
    }

    /// Store the next bit and return true once the buffer is full.
    pub fn push(&mut self, bit: bool) -> bool {
        if self.index < self.buf.len() {
            self.buf[self.index] = u8::from(bit);
            self.index += 1;
        }
        self.is_complete()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.index == self.buf.len()
    }

    /// Pack the accumulated bits into a [Frame], or `None` if the buffer is not yet full.
    #[must_use]
    pub fn finish(self) -> Option<Frame> {
        if !self.is_complete() {
            return None;
        }
        let mut payload = pack_bits(&self.buf);
        let crc = if self.layout.has_crc {
            let trailer = payload.split_off(payload.len() - 2);
            Some(u16::from_be_bytes([trailer[0], trailer[1]]))
        } else {
            None
        };
        Some(Frame {
            length: self.layout.length,
            payload,
            crc,
        })
    }
}

/// A fully accumulated frame body, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub length: u8,
    pub payload: Vec<u8>,
    /// Received big-endian CRC trailer, if the frame has one.
    pub crc: Option<u16>,
}

impl Frame {
    /// Checksum over the length field and payload, for comparison with [Frame::crc].
    #[must_use]
    pub fn checksum(&self, crc: &Crc16) -> u16 {
        crc.frame_checksum(self.length, &self.payload)
    }
}
