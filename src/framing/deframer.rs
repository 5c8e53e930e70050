use std::mem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::{
    Crc16, Diagnostic, Integrity, LengthDecoder, Packet, PacketSink, PayloadAccumulator,
    PayloadLayout, SyncWord, Synchronizer,
};
use crate::prelude::*;

/// Deframer configuration, fixed for the lifetime of a [Deframer].
///
/// # Examples
/// ```
/// use deframer::framing::{DeframerConfig, SyncWord};
///
/// let config = DeframerConfig::new(SyncWord::new(0xd391, 16))
///     .with_crc(true)
///     .with_max_payload_len(64);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DeframerConfig {
    pub sync: SyncWord,
    /// Frames carry a 16-bit CRC trailer.
    pub has_crc: bool,
    /// Verify the CRC trailer and drop frames that fail. Requires `has_crc`.
    pub check_crc: bool,
    pub crc_polynomial: u16,
    /// Frames with a length field larger than this are dropped without buffering.
    pub max_payload_len: usize,
}

impl DeframerConfig {
    pub const DEFAULT_MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

    /// Create a configuration for frames without a CRC trailer.
    #[must_use]
    pub fn new(sync: SyncWord) -> Self {
        DeframerConfig {
            sync,
            has_crc: false,
            check_crc: false,
            crc_polynomial: Crc16::DEFAULT_POLY,
            max_payload_len: Self::DEFAULT_MAX_PAYLOAD_LEN,
        }
    }

    /// Frames carry a CRC trailer, verified if `check` is true.
    #[must_use]
    pub fn with_crc(mut self, check: bool) -> Self {
        self.has_crc = true;
        self.check_crc = check;
        self
    }

    #[must_use]
    pub fn with_polynomial(mut self, poly: u16) -> Self {
        self.crc_polynomial = poly;
        self
    }

    #[must_use]
    pub fn with_max_payload_len(mut self, max: usize) -> Self {
        self.max_payload_len = max;
        self
    }

    /// # Errors
    /// If the sync word is invalid, `check_crc` is set without `has_crc`, or
    /// `max_payload_len` is not in `1..=255`.
    pub fn validate(&self) -> Result<()> {
        self.sync.validate()?;
        if self.check_crc && !self.has_crc {
            return Err(Error::CrcCheckWithoutTrailer);
        }
        if self.max_payload_len == 0 || self.max_payload_len > Self::DEFAULT_MAX_PAYLOAD_LEN {
            return Err(Error::InvalidMaxPayload(self.max_payload_len));
        }
        Ok(())
    }
}

impl Default for DeframerConfig {
    fn default() -> Self {
        DeframerConfig::new(SyncWord::DEFAULT)
    }
}

/// Running counters for a [Deframer].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stats {
    /// Total bits consumed.
    pub bits: u64,
    /// Sync words found.
    pub syncs: u64,
    /// Packets emitted.
    pub packets: u64,
    /// Frames dropped due to a CRC mismatch.
    pub crc_mismatches: u64,
    /// Frames dropped because their payload was too long or could not be buffered.
    pub rejected: u64,
}

/// The externally visible state of a [Deframer].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Searching,
    ReadingLength,
    ReadingPayload,
}

#[derive(Debug)]
enum State {
    Searching(Synchronizer),
    ReadingLength(LengthDecoder),
    ReadingPayload(PayloadAccumulator),
}

/// Streaming deframer driven one bit at a time.
///
/// The deframer searches for the configured sync word, decodes the following 8-bit
/// length field, accumulates the payload (and CRC trailer, if configured) and then hands
/// the validated packet to a [PacketSink]. Whether or not the frame is valid, it then
/// returns to searching. Sync words occurring inside a frame are not looked for.
///
/// # Examples
/// ```
/// use deframer::framing::{frame_bits, Deframer, DeframerConfig, Packet};
///
/// let config = DeframerConfig::default().with_crc(true);
/// let bits = frame_bits(&config, b"ABC").unwrap();
///
/// let mut deframer = Deframer::new(config).unwrap();
/// let mut packets: Vec<Packet> = Vec::new();
/// assert_eq!(deframer.work(&bits, &mut packets), bits.len());
/// assert_eq!(packets[0].data, b"ABC");
/// ```
#[derive(Debug)]
pub struct Deframer {
    config: DeframerConfig,
    crc: Crc16,
    state: State,
    stats: Stats,
}

impl Deframer {
    /// # Errors
    /// If `config` is not valid, see [DeframerConfig::validate].
    pub fn new(config: DeframerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Deframer {
            config,
            crc: Crc16::new(config.crc_polynomial),
            state: State::Searching(Synchronizer::new(config.sync)),
            stats: Stats::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &DeframerConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        self.stats
    }

    #[must_use]
    pub fn state(&self) -> StateKind {
        match self.state {
            State::Searching(_) => StateKind::Searching,
            State::ReadingLength(_) => StateKind::ReadingLength,
            State::ReadingPayload(_) => StateKind::ReadingPayload,
        }
    }

    /// Abandon any frame in progress and start searching for a sync word with a cleared
    /// register. Stats are retained.
    pub fn reset(&mut self) {
        self.state = State::Searching(Synchronizer::new(self.config.sync));
    }

    /// Process `bits` in order, one bit decision per byte where any non-zero value is a
    /// 1, and return the number of bits consumed, which is always `bits.len()`.
    pub fn work<S>(&mut self, bits: &[u8], sink: &mut S) -> usize
    where
        S: PacketSink + ?Sized,
    {
        for &bit in bits {
            self.push(bit != 0, sink);
        }
        bits.len()
    }

    /// Process a single bit.
    pub fn push<S>(&mut self, bit: bool, sink: &mut S)
    where
        S: PacketSink + ?Sized,
    {
        self.stats.bits += 1;
        match &mut self.state {
            State::Searching(synchronizer) => {
                if synchronizer.push(bit) {
                    self.stats.syncs += 1;
                    trace!(bit = self.stats.bits, "sync word found");
                    self.state = State::ReadingLength(LengthDecoder::new());
                }
            }
            State::ReadingLength(decoder) => {
                if let Some(length) = decoder.push(bit) {
                    self.begin_payload(length, sink);
                }
            }
            State::ReadingPayload(accumulator) => {
                if accumulator.push(bit) {
                    self.complete_payload(sink);
                }
            }
        }
    }

    fn begin_payload<S>(&mut self, length: u8, sink: &mut S)
    where
        S: PacketSink + ?Sized,
    {
        let layout = PayloadLayout::new(length, self.config.has_crc);
        trace!(length, bits = layout.num_bits(), "length decoded");

        let max = self.config.max_payload_len;
        if usize::from(length) > max {
            debug!(length, max, "payload length exceeds maximum, dropping frame");
            self.stats.rejected += 1;
            sink.diagnostic(Diagnostic::PayloadTooLong { length, max });
            self.reset();
            return;
        }

        match PayloadAccumulator::new(layout) {
            Ok(accumulator) => {
                let complete = accumulator.is_complete();
                self.state = State::ReadingPayload(accumulator);
                // zero-length payload without a trailer; nothing more to read
                if complete {
                    self.complete_payload(sink);
                }
            }
            Err(err) => {
                debug!(length, "failed to allocate payload buffer, dropping frame: {err}");
                self.stats.rejected += 1;
                sink.diagnostic(Diagnostic::AllocationFailed { length });
                self.reset();
            }
        }
    }

    fn complete_payload<S>(&mut self, sink: &mut S)
    where
        S: PacketSink + ?Sized,
    {
        let searching = State::Searching(Synchronizer::new(self.config.sync));
        let State::ReadingPayload(accumulator) = mem::replace(&mut self.state, searching) else {
            return;
        };
        let Some(frame) = accumulator.finish() else {
            return;
        };

        let integrity = match frame.crc {
            None => None,
            Some(received) if self.config.check_crc => {
                let computed = frame.checksum(&self.crc);
                if computed != received {
                    warn!(
                        length = frame.length,
                        "crc mismatch calc:{computed:#06x} rx:{received:#06x}, dropping frame"
                    );
                    self.stats.crc_mismatches += 1;
                    sink.diagnostic(Diagnostic::CrcMismatch {
                        length: frame.length,
                        computed,
                        received,
                    });
                    return;
                }
                Some(Integrity::Ok)
            }
            Some(_) => Some(Integrity::NotChecked),
        };

        debug!(length = frame.length, integrity = ?integrity, "packet");
        self.stats.packets += 1;
        sink.packet(Packet {
            length: frame.length,
            data: frame.payload,
            crc: frame.crc,
            integrity,
        });
    }
}
