use std::collections::VecDeque;

use crossbeam::channel::Sender;
use tracing::debug;

use super::{Diagnostic, Packet};

/// Receives the output of a [Deframer](super::Deframer).
///
/// Packets and diagnostics are delivered synchronously, in the order their frames
/// complete in the bit stream.
pub trait PacketSink {
    fn packet(&mut self, packet: Packet);

    /// Called for each dropped frame. Ignored by default.
    fn diagnostic(&mut self, _diagnostic: Diagnostic) {}
}

impl PacketSink for Vec<Packet> {
    fn packet(&mut self, packet: Packet) {
        self.push(packet);
    }
}

impl PacketSink for VecDeque<Packet> {
    fn packet(&mut self, packet: Packet) {
        self.push_back(packet);
    }
}

/// Forwards packets to a channel. Packets sent after the receiver is dropped are
/// discarded.
impl PacketSink for Sender<Packet> {
    fn packet(&mut self, packet: Packet) {
        if let Err(err) = self.send(packet) {
            debug!("failed to send packet: {err}");
        }
    }
}

/// Records packets and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    pub packets: Vec<Packet>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Collector {
    #[must_use]
    pub fn new() -> Self {
        Collector::default()
    }
}

impl PacketSink for Collector {
    fn packet(&mut self, packet: Packet) {
        self.packets.push(packet);
    }

    fn diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
