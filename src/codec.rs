//! Mode-dispatching codec facade.
//!
//! A [`Codec`] is a single handle that can be reset into encode or decode
//! mode and drives the corresponding engine through the symmetric
//! `feed` / `draw` surface. The mode is a sum type: operations on a handle
//! that was never reset fail with the StateError kind, and switching modes
//! requires an explicit reset.

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::CodecError;

/// Operating mode of a [`Codec`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Producing output packets from source packets.
    Encode,
    /// Reconstructing source packets from received packets.
    Decode,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Encoding(Encoder),
    Decoding(Decoder),
}

/// A codec handle, parameterized by mode at reset time.
#[derive(Debug, Default)]
pub struct Codec {
    state: State,
}

impl Codec {
    /// Creates an idle handle. Reset it into a mode before use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode, if the handle has been reset into one.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        match self.state {
            State::Idle => None,
            State::Encoding(_) => Some(Mode::Encode),
            State::Decoding(_) => Some(Mode::Decode),
        }
    }

    /// Resets into encode mode for a batch of `batch_size` source packets.
    ///
    /// # Errors
    ///
    /// Fails with the InvalidArgument kind unless `1 <= batch_size <= 256`;
    /// the handle keeps its previous state in that case.
    pub fn reset_encode(&mut self, batch_size: usize) -> Result<(), CodecError> {
        self.state = State::Encoding(Encoder::new(batch_size)?);
        Ok(())
    }

    /// Resets into decode mode, waiting for the first received packet.
    pub fn reset_decode(&mut self) {
        self.state = State::Decoding(Decoder::new());
    }

    /// Feeds one packet to the active engine.
    ///
    /// In decode mode this never fails: unusable packets are dropped per
    /// the decoder's tolerance policy.
    ///
    /// # Errors
    ///
    /// StateError kind when the handle is idle; encoder feed errors in
    /// encode mode.
    pub fn feed(&mut self, packet: &[u8]) -> Result<(), CodecError> {
        match &mut self.state {
            State::Idle => Err(CodecError::NotConfigured),
            State::Encoding(encoder) => encoder.feed(packet),
            State::Decoding(decoder) => {
                decoder.feed(packet);
                Ok(())
            }
        }
    }

    /// Feeds a sequence of packets in listed order.
    ///
    /// # Errors
    ///
    /// As for [`Codec::feed`]; in encode mode the first failure stops the
    /// sequence.
    pub fn feed_many<I, P>(&mut self, packets: I) -> Result<(), CodecError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        match &mut self.state {
            State::Idle => Err(CodecError::NotConfigured),
            State::Encoding(encoder) => encoder.feed_many(packets),
            State::Decoding(decoder) => {
                decoder.feed_many(packets);
                Ok(())
            }
        }
    }

    /// Draws up to `count` packets from the active engine into `out`,
    /// returning how many were appended. A shortfall is not an error.
    ///
    /// # Errors
    ///
    /// StateError kind when the handle is idle; encoder draw errors in
    /// encode mode.
    pub fn draw(&mut self, count: usize, out: &mut Vec<Vec<u8>>) -> Result<usize, CodecError> {
        match &mut self.state {
            State::Idle => Err(CodecError::NotConfigured),
            State::Encoding(encoder) => encoder.draw(count, out),
            State::Decoding(decoder) => Ok(decoder.draw(count, out)),
        }
    }

    /// Draws a single packet into `out`, returning whether one was
    /// produced.
    ///
    /// # Errors
    ///
    /// As for [`Codec::draw`].
    pub fn draw_one(&mut self, out: &mut Vec<u8>) -> Result<bool, CodecError> {
        let mut packets = Vec::with_capacity(1);
        if self.draw(1, &mut packets)? == 0 {
            return Ok(false);
        }
        if let Some(packet) = packets.pop() {
            *out = packet;
        }
        Ok(true)
    }
}
