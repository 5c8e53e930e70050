use std::collections::VecDeque;

use super::{Deframer, DeframerConfig, Packet, Stats};
use crate::prelude::*;

/// Iterator of [Packet]s deframed from a bit iterator. Created by [deframe].
pub struct DeframeIter<I>
where
    I: Iterator<Item = u8>,
{
    bits: I,
    deframer: Deframer,
    ready: VecDeque<Packet>,
}

impl<I> DeframeIter<I>
where
    I: Iterator<Item = u8>,
{
    /// Counters for the bits consumed so far.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.deframer.stats()
    }
}

impl<I> Iterator for DeframeIter<I>
where
    I: Iterator<Item = u8>,
{
    type Item = Packet;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(packet) = self.ready.pop_front() {
                return Some(packet);
            }
            let bit = self.bits.next()?;
            self.deframer.push(bit != 0, &mut self.ready);
        }
    }
}

/// Lazily deframe `bits`, one bit decision per item.
///
/// Bits are only pulled from `bits` as needed to produce the next packet. Dropped frames
/// are not reported; use a [Deframer] with a [PacketSink](super::PacketSink) for that.
///
/// # Example
/// ```
/// use deframer::framing::{deframe, read_bits, DeframerConfig};
///
/// let stream: &[u8] = &[0xd3, 0x91, 0x02, 0x68, 0x69, 0x00];
/// let bits = read_bits(stream, true).map_while(Result::ok);
/// let payloads: Vec<Vec<u8>> = deframe(bits, DeframerConfig::default())
///     .unwrap()
///     .map(|p| p.data)
///     .collect();
/// assert_eq!(payloads, vec![b"hi".to_vec()]);
/// ```
///
/// # Errors
/// If `config` is not valid.
pub fn deframe<I>(bits: I, config: DeframerConfig) -> Result<DeframeIter<I::IntoIter>>
where
    I: IntoIterator<Item = u8>,
{
    Ok(DeframeIter {
        bits: bits.into_iter(),
        deframer: Deframer::new(config)?,
        ready: VecDeque::new(),
    })
}
