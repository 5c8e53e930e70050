use crc::{Crc, CRC_16_CMS};

static CMS: Crc<u16> = Crc::<u16>::new(&CRC_16_CMS);

/// CRC-16 over a configurable generator polynomial.
///
/// The register is initialized to `0xFFFF` and bytes are consumed MSB-first, with no
/// input/output reflection and no final XOR. With the default polynomial `0x8005`
/// this is the catalogued CRC-16/CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    poly: u16,
}

impl Crc16 {
    pub const DEFAULT_POLY: u16 = 0x8005;
    /// Register value at the start of every computation.
    pub const INIT: u16 = 0xFFFF;

    #[must_use]
    pub const fn new(poly: u16) -> Self {
        Crc16 { poly }
    }

    #[must_use]
    pub fn poly(&self) -> u16 {
        self.poly
    }

    /// Shift `data` through the register `reg` bit-serially and return the new register.
    ///
    /// For each bit, from the most-significant, the polynomial is applied when the
    /// register's top bit differs from the data bit.
    #[must_use]
    pub fn update(&self, mut reg: u16, data: &[u8]) -> u16 {
        for &byte in data {
            let mut x = byte;
            for _ in 0..8 {
                let top = reg & 0x8000 != 0;
                let bit = x & 0x80 != 0;
                reg <<= 1;
                if top ^ bit {
                    reg ^= self.poly;
                }
                x <<= 1;
            }
        }
        reg
    }

    /// Compute the checksum of `data`.
    #[must_use]
    pub fn checksum(&self, data: &[u8]) -> u16 {
        if self.poly == Self::DEFAULT_POLY {
            return CMS.checksum(data);
        }
        self.update(Self::INIT, data)
    }

    /// Compute the checksum of a frame's length field followed by its payload.
    ///
    /// The length byte is a message prefix only; it is never part of the payload bits.
    #[must_use]
    pub fn frame_checksum(&self, length: u8, payload: &[u8]) -> u16 {
        if self.poly == Self::DEFAULT_POLY {
            let mut digest = CMS.digest();
            digest.update(&[length]);
            digest.update(payload);
            return digest.finalize();
        }
        let reg = self.update(Self::INIT, &[length]);
        self.update(reg, payload)
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Crc16::new(Self::DEFAULT_POLY)
    }
}

/// Compute the CRC-16 of `data` using `poly`. See [Crc16].
#[must_use]
pub fn crc16(data: &[u8], poly: u16) -> u16 {
    Crc16::new(poly).checksum(data)
}
