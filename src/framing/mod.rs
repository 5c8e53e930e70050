//! Bit-stream deframing.
//!
//! Frames on the wire are a sync word, an 8-bit payload length, the payload and an
//! optional big-endian CRC-16 trailer:
//!
//! ```text
//! | sync (W bits) | length (8 bits) | payload (length * 8 bits) | crc (16 bits, optional) |
//! ```
//!
//! The CRC covers the length byte followed by the payload.
mod bits;
mod deframer;
mod encoder;
mod integrity;
mod length;
mod payload;
mod pipeline;
mod sink;
mod synchronizer;

pub use bits::*;
pub use deframer::*;
pub use encoder::*;
pub use integrity::*;
pub use length::*;
pub use payload::*;
pub use pipeline::*;
pub use sink::*;
pub use synchronizer::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A deframed packet handed to a [PacketSink].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Packet {
    /// Length field as received.
    pub length: u8,
    /// Payload bytes, without any CRC trailer.
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes"))]
    pub data: Vec<u8>,
    /// Received CRC trailer, if frames carry one.
    pub crc: Option<u16>,
    /// `None` if frames carry no CRC trailer.
    pub integrity: Option<Integrity>,
}

impl Packet {
    /// Number of payload bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Per-frame conditions that caused a frame to be dropped.
///
/// Diagnostics never interrupt the bit stream; the deframer resumes searching for the
/// next sync word with the bit following the dropped frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Diagnostic {
    /// The received CRC trailer did not match the computed checksum.
    CrcMismatch {
        length: u8,
        computed: u16,
        received: u16,
    },
    /// The length field exceeds the configured maximum payload length.
    PayloadTooLong { length: u8, max: usize },
    /// The payload buffer could not be allocated.
    AllocationFailed { length: u8 },
}
