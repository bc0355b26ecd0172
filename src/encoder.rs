//! Systematic streaming encoder.
//!
//! The encoder accepts up to `k` source packets and emits output packets on
//! demand. The first `k` outputs are the source packets themselves with a
//! two-byte trailer appended; further outputs are parity packets produced
//! by multiplying generator rows into the batch's message matrix.
//!
//! The message matrix is built lazily on the first parity request. Callers
//! that only ever draw the systematic packets never pay for it; once built,
//! later draws reuse it. Building the matrix closes the source phase:
//! feeding afterwards is a state error.

use crate::error::CodecError;
use crate::generator::{generator_row, MAX_BATCH_PACKETS, MAX_ROW_INDEX};
use crate::matrix::Matrix;

/// Longest source packet the 16-bit length suffix can represent.
pub const MAX_SOURCE_PACKET_LEN: usize = u16::MAX as usize;

/// Systematic encoder for a single batch.
#[derive(Debug)]
pub struct Encoder {
    batch_size: usize,
    source: Vec<Vec<u8>>,
    longest: usize,
    /// Next generator row to emit; doubles as the output packet index.
    cursor: usize,
    /// Built on the first parity request; `Some` means the source phase is
    /// over.
    message: Option<Matrix>,
}

impl Encoder {
    /// Creates an encoder for a batch of `batch_size` source packets.
    ///
    /// # Errors
    ///
    /// Fails with the InvalidArgument kind unless `1 <= batch_size <= 256`
    /// (the trailer byte stores `batch_size - 1`).
    pub fn new(batch_size: usize) -> Result<Self, CodecError> {
        if batch_size == 0 || batch_size > MAX_BATCH_PACKETS {
            return Err(CodecError::InvalidBatchSize {
                requested: batch_size,
            });
        }
        Ok(Self {
            batch_size,
            source: Vec::with_capacity(batch_size),
            longest: 0,
            cursor: 0,
            message: None,
        })
    }

    /// Batch size this encoder was created with.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of source packets fed so far.
    #[must_use]
    pub fn packets_fed(&self) -> usize {
        self.source.len()
    }

    /// True while the encoder still accepts source packets.
    #[must_use]
    pub const fn is_reading_source(&self) -> bool {
        self.message.is_none()
    }

    /// Appends one source packet to the batch.
    ///
    /// A failing feed leaves the encoder unchanged.
    ///
    /// # Errors
    ///
    /// - InvalidArgument kind: the packet is empty or longer than
    ///   [`MAX_SOURCE_PACKET_LEN`].
    /// - StateError kind: parity generation already began.
    /// - CapacityExceeded kind: the batch already holds `batch_size`
    ///   packets.
    pub fn feed(&mut self, packet: &[u8]) -> Result<(), CodecError> {
        if packet.is_empty() {
            return Err(CodecError::EmptySourcePacket);
        }
        if packet.len() > MAX_SOURCE_PACKET_LEN {
            return Err(CodecError::SourcePacketTooLong { len: packet.len() });
        }
        if self.message.is_some() {
            return Err(CodecError::SourcePhaseOver);
        }
        if self.source.len() >= self.batch_size {
            return Err(CodecError::BatchFull {
                batch_size: self.batch_size,
            });
        }
        self.longest = self.longest.max(packet.len());
        self.source.push(packet.to_vec());
        Ok(())
    }

    /// Feeds a sequence of source packets in order, stopping at the first
    /// failure.
    ///
    /// # Errors
    ///
    /// Propagates the first [`Encoder::feed`] error; packets before it are
    /// retained.
    pub fn feed_many<I, P>(&mut self, packets: I) -> Result<(), CodecError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        for packet in packets {
            self.feed(packet.as_ref())?;
        }
        Ok(())
    }

    /// Appends up to `count` output packets to `out` and returns how many
    /// were appended.
    ///
    /// Systematic packets are emitted first, one per fed source packet. A
    /// request that reaches beyond the fed systematic packets while the
    /// batch is still incomplete returns short; a short draw is not a
    /// failure. Once all `batch_size` source packets are in, the remainder
    /// of the request is served with parity packets.
    ///
    /// # Errors
    ///
    /// Fails with the OutOfCodeSpace kind when the request would push the
    /// generator cursor past row 255 (a batch yields at most 256 output
    /// packets). Packets appended before the failure remain in `out`.
    pub fn draw(&mut self, count: usize, out: &mut Vec<Vec<u8>>) -> Result<usize, CodecError> {
        let mut produced = 0;

        // Systematic region: source bytes pass through untouched.
        while produced < count && self.cursor < self.batch_size {
            if self.cursor >= self.source.len() {
                return Ok(produced);
            }
            let source = &self.source[self.cursor];
            let mut packet = Vec::with_capacity(source.len() + 2);
            packet.extend_from_slice(source);
            packet.push(self.cursor as u8);
            packet.push((self.batch_size - 1) as u8);
            out.push(packet);
            self.cursor += 1;
            produced += 1;
        }

        let remaining = count - produced;
        if remaining == 0 {
            return Ok(produced);
        }
        if self.source.len() < self.batch_size {
            return Ok(produced);
        }
        if self.cursor + remaining - 1 > MAX_ROW_INDEX {
            return Err(CodecError::OutOfCodeSpace);
        }

        if self.message.is_none() {
            self.message = Some(self.build_message_matrix());
            tracing::debug!(
                batch_size = self.batch_size,
                longest = self.longest,
                "message matrix built; source phase closed"
            );
        }
        let message = self
            .message
            .as_ref()
            .expect("message matrix is built before parity generation");

        // One (remaining x k) by (k x longest+2) product covers the whole
        // request.
        let first_row = self.cursor;
        let mut generator = Matrix::new(remaining, self.batch_size);
        for i in 0..remaining {
            generator_row(generator.row_mut(i), first_row + i, self.batch_size);
        }
        let encoded = generator.mul(message)?;

        for i in 0..remaining {
            let payload = encoded.row(i);
            let mut packet = Vec::with_capacity(payload.len() + 2);
            packet.extend_from_slice(payload);
            packet.push((first_row + i) as u8);
            packet.push((self.batch_size - 1) as u8);
            out.push(packet);
        }
        self.cursor = first_row + remaining;

        Ok(count)
    }

    /// Builds the (k, longest + 2) message matrix: each source packet
    /// left-aligned and zero-padded, with its original length appended
    /// big-endian in the final two columns.
    fn build_message_matrix(&self) -> Matrix {
        let mut matrix = Matrix::new(self.batch_size, self.longest + 2);
        for (index, source) in self.source.iter().enumerate() {
            let row = matrix.row_mut(index);
            row[..source.len()].copy_from_slice(source);
            row[self.longest] = (source.len() >> 8) as u8;
            row[self.longest + 1] = (source.len() & 0xFF) as u8;
        }
        matrix
    }
}
