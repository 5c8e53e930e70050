#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// A sync pattern of `width` bits marking the start of a frame.
///
/// The pattern is matched MSB-first, i.e., bit `width - 1` of `pattern` is the first bit
/// expected on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyncWord {
    pub pattern: u64,
    pub width: u32,
}

impl SyncWord {
    pub const DEFAULT_WIDTH: u32 = 16;
    pub const MAX_WIDTH: u32 = 64;
    /// Default 16-bit sync word.
    pub const DEFAULT: SyncWord = SyncWord {
        pattern: 0xd391,
        width: Self::DEFAULT_WIDTH,
    };

    #[must_use]
    pub const fn new(pattern: u64, width: u32) -> Self {
        SyncWord { pattern, width }
    }

    /// Mask selecting the low `width` bits.
    #[must_use]
    pub fn mask(&self) -> u64 {
        if self.width >= Self::MAX_WIDTH {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    /// # Errors
    /// [Error::InvalidSyncWidth] if width is 0 or larger than 64, [Error::SyncWordTooWide]
    /// if pattern has bits set above `width`.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.width > Self::MAX_WIDTH {
            return Err(Error::InvalidSyncWidth { width: self.width });
        }
        if self.pattern & !self.mask() != 0 {
            return Err(Error::SyncWordTooWide {
                sync_word: self.pattern,
                width: self.width,
            });
        }
        Ok(())
    }

    /// The pattern as wire-order bits.
    pub fn bits(&self) -> impl Iterator<Item = u8> {
        let pattern = self.pattern;
        (0..self.width)
            .rev()
            .map(move |i| u8::from((pattern >> i) & 1 == 1))
    }
}

impl Default for SyncWord {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scans a bit stream for a [SyncWord] using a shift register over the most recent
/// `width` bits.
///
/// The register starts zeroed and a match is only declared once at least `width` bits
/// have been shifted in, so zero-valued leading pattern bits cannot match the initial
/// register contents.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    sync: SyncWord,
    mask: u64,
    reg: u64,
    filled: u32,
}

impl Synchronizer {
    #[must_use]
    pub fn new(sync: SyncWord) -> Self {
        Synchronizer {
            sync,
            mask: sync.mask(),
            reg: 0,
            filled: 0,
        }
    }

    /// Shift `bit` into the register, returning true if the register now equals the
    /// sync word.
    pub fn push(&mut self, bit: bool) -> bool {
        self.reg = ((self.reg << 1) & self.mask) | u64::from(bit);
        if self.filled < self.sync.width {
            self.filled += 1;
        }
        self.filled == self.sync.width && self.reg == self.sync.pattern
    }

    /// Current register contents, most recent bit in the low-order position.
    #[must_use]
    pub fn register(&self) -> u64 {
        self.reg
    }

    pub fn reset(&mut self) {
        self.reg = 0;
        self.filled = 0;
    }
}
