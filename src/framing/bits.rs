use std::io::{BufReader, ErrorKind, Read};

use crate::prelude::*;

/// Pack unpacked bits (one bit per byte, any non-zero value is a 1) into bytes.
///
/// Bits are packed MSB-first: the earliest bit of each group of 8 becomes the high bit of
/// its byte. A trailing partial group is padded with zeros in its low bits.
#[must_use]
pub fn pack_bits(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &b)| acc | (u8::from(b != 0) << (7 - i)))
        })
        .collect()
}

/// Unpack bytes into bits, one bit per item, MSB-first.
pub fn unpack_bits(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..8u8).rev().map(move |i| (byte >> i) & 1))
}

/// Iterator of bits read from a byte stream. Created by [read_bits].
///
/// ## Errors
/// Reading stops at end of stream. Any other read error is yielded once, after which
/// the iterator is exhausted.
pub struct BitReader<R>
where
    R: Read,
{
    reader: R,
    packed: bool,
    done: bool,
    buf: [u8; 1],
    // bits of the current byte not yet yielded
    remaining: u8,
}

impl<R> BitReader<R>
where
    R: Read,
{
    fn new(reader: R, packed: bool) -> Self {
        BitReader {
            reader,
            packed,
            done: false,
            buf: [0u8; 1],
            remaining: 0,
        }
    }

    fn read_byte(&mut self) -> Option<Result<u8>> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => return Some(Ok(self.buf[0])),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Some(Err(Error::Io(err))),
            }
        }
    }
}

impl<R> Iterator for BitReader<R>
where
    R: Read,
{
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            return Some(Ok((self.buf[0] >> self.remaining) & 1));
        }
        match self.read_byte() {
            None => {
                self.done = true;
                None
            }
            Some(Err(err)) => {
                self.done = true;
                Some(Err(err))
            }
            Some(Ok(byte)) if self.packed => {
                self.remaining = 7;
                Some(Ok((byte >> 7) & 1))
            }
            Some(Ok(byte)) => Some(Ok(u8::from(byte != 0))),
        }
    }
}

/// Read bits from `reader`.
///
/// When `packed` is true every byte carries 8 bits, MSB-first. Otherwise every byte is a
/// single bit decision, where any non-zero value is a 1.
pub fn read_bits<R>(reader: R, packed: bool) -> BitReader<BufReader<R>>
where
    R: Read,
{
    BitReader::new(BufReader::new(reader), packed)
}
