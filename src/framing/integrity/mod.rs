mod crc16;

pub use crc16::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integrity status of an emitted [Packet](super::Packet).
///
/// Packets that fail verification are never emitted; they surface as a
/// [Diagnostic::CrcMismatch](super::Diagnostic::CrcMismatch) instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Integrity {
    /// The CRC trailer matched the computed checksum.
    Ok,
    /// A CRC trailer was present but checking is disabled.
    NotChecked,
}
