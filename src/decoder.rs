//! Erasure decoder.
//!
//! The decoder ingests output packets in any order, with duplicates and
//! packets from other batches tolerated, and reconstructs the original
//! source packets on demand.
//!
//! # Input tolerance
//!
//! `feed` never fails. Packets arrive over a lossy channel, so invalid
//! bytes are a legitimate input; the decoder's contract is to tolerate them
//! without disturbing reconstruction state. Every dropped packet emits a
//! trace event naming the reason, so the policy is silent on the API but
//! not to observability.
//!
//! # Stuck state
//!
//! Inconsistencies that cannot be recovered from (parity packets of
//! different lengths, a singular generator submatrix, an impossible
//! recovered length) latch the decoder into a terminal stuck state: all
//! further feeds are dropped and draws return zero. The transition is
//! monotonic.

use crate::generator::generator_row;
use crate::gf256::gf256_addmul_slice;
use crate::matrix::Matrix;

/// Erasure decoder for a single batch.
#[derive(Debug, Default)]
pub struct Decoder {
    /// Learned from the trailer of the first accepted packet.
    batch_size: Option<usize>,
    /// One slot per source index; `Some` once received or reconstructed.
    slots: Vec<Option<Vec<u8>>>,
    /// Parity packets in arrival order, trailer included.
    parity: Vec<Vec<u8>>,
    /// Number of occupied slots.
    filled: usize,
    /// Next source index to hand out from `draw`.
    cursor: usize,
    stuck: bool,
}

impl Decoder {
    /// Creates an empty decoder waiting for its first packet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all state, returning the decoder to waiting-for-first-packet.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Batch size, once learned from the first accepted packet.
    #[must_use]
    pub const fn batch_size(&self) -> Option<usize> {
        self.batch_size
    }

    /// True once the decoder has latched an unrecoverable inconsistency.
    #[must_use]
    pub const fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Ingests one received packet. Never fails; packets that cannot be
    /// used are dropped.
    pub fn feed(&mut self, packet: &[u8]) {
        if self.stuck {
            tracing::trace!("dropping packet: decoder is stuck");
            return;
        }
        if packet.len() <= 2 {
            tracing::trace!(len = packet.len(), "dropping packet: no payload");
            return;
        }

        let series = packet[packet.len() - 1] as usize + 1;
        match self.batch_size {
            None => {
                self.batch_size = Some(series);
                self.slots = vec![None; series];
                tracing::debug!(batch_size = series, "batch size learned from first packet");
            }
            Some(k) if k != series => {
                tracing::trace!(
                    expected = k,
                    found = series,
                    "dropping packet: wrong batch"
                );
                return;
            }
            Some(_) => {}
        }
        let k = self.slots.len();

        let index = packet[packet.len() - 2] as usize;
        if index < k {
            if self.slots[index].is_some() {
                tracing::trace!(index, "dropping duplicate systematic packet");
                return;
            }
            self.slots[index] = Some(packet[..packet.len() - 2].to_vec());
            self.filled += 1;
        } else {
            self.parity.push(packet.to_vec());
        }
    }

    /// Feeds a sequence of packets in listed order.
    pub fn feed_many<I, P>(&mut self, packets: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        for packet in packets {
            self.feed(packet.as_ref());
        }
    }

    /// Appends up to `count` reconstructed source packets to `out`, in
    /// index order 0, 1, 2, ..., and returns how many were appended.
    ///
    /// A missing slot triggers reconstruction from the buffered parity;
    /// when reconstruction is not (yet) possible the draw stops short.
    /// A shortfall is the caller's signal to accept loss or await more
    /// input, not an error.
    pub fn draw(&mut self, count: usize, out: &mut Vec<Vec<u8>>) -> usize {
        if self.stuck {
            return 0;
        }
        let Some(k) = self.batch_size else {
            return 0;
        };

        let mut produced = 0;
        while produced < count && self.cursor < k {
            if self.slots[self.cursor].is_none() && !self.reconstruct(k) {
                break;
            }
            let Some(data) = self.slots[self.cursor].as_ref() else {
                break;
            };
            out.push(data.clone());
            self.cursor += 1;
            produced += 1;
        }
        produced
    }

    /// Recovers every missing slot from the buffered parity packets, or
    /// reports that decoding is not possible with what has arrived so far.
    fn reconstruct(&mut self, k: usize) -> bool {
        let missing = k - self.filled;
        if missing == 0 {
            return true;
        }
        if self.parity.len() < missing {
            return false;
        }

        // Pick the first `missing` parity packets with pairwise-distinct
        // row indices, in arrival order. Duplicates stay in the tail but
        // are never selected twice.
        let mut chosen: Vec<usize> = Vec::with_capacity(missing);
        let mut chosen_rows: Vec<usize> = Vec::with_capacity(missing);
        let mut seen = [0u64; 4];
        for (i, parity) in self.parity.iter().enumerate() {
            let row = parity[parity.len() - 2] as usize;
            let mask = 1u64 << (row & 0x3F);
            if seen[row >> 6] & mask != 0 {
                continue;
            }
            seen[row >> 6] |= mask;
            chosen.push(i);
            chosen_rows.push(row);
            if chosen.len() == missing {
                break;
            }
        }
        if chosen.len() < missing {
            return false;
        }

        // Every parity packet of a batch has the same length; a mismatch
        // means the stream is malformed beyond repair.
        let parity_len = self.parity[chosen[0]].len();
        if chosen.iter().any(|&i| self.parity[i].len() != parity_len) {
            self.mark_stuck("parity packets with mismatched lengths");
            return false;
        }
        let width = parity_len - 2;
        if width < 2 {
            self.mark_stuck("parity payload too short for a length suffix");
            return false;
        }

        let mut generator = Matrix::new(missing, k);
        for (i, &row) in chosen_rows.iter().enumerate() {
            generator_row(generator.row_mut(i), row, k);
        }

        let mut parity_message = Matrix::new(missing, width);
        for (i, &p) in chosen.iter().enumerate() {
            parity_message
                .row_mut(i)
                .copy_from_slice(&self.parity[p][..width]);
        }

        // Subtract the contribution of every known slot from the parity
        // message; the columns of the unknown slots form the square system
        // to invert.
        let mut system = Matrix::new(missing, missing);
        let mut system_col = 0;
        let mut message_row = vec![0u8; width];
        for s in 0..k {
            if let Some(data) = &self.slots[s] {
                message_row.fill(0);
                let body = data.len().min(width - 2);
                message_row[..body].copy_from_slice(&data[..body]);
                message_row[width - 2] = (data.len() >> 8) as u8;
                message_row[width - 1] = (data.len() & 0xFF) as u8;
                for i in 0..missing {
                    let coeff = generator.get(i, s);
                    gf256_addmul_slice(parity_message.row_mut(i), &message_row, coeff);
                }
            } else {
                for i in 0..missing {
                    let value = generator.get(i, s);
                    system.set(i, system_col, value);
                }
                system_col += 1;
            }
        }

        // A singular submatrix cannot happen for a Cauchy code; it signals
        // upstream corruption.
        if system.invert().is_err() {
            self.mark_stuck("singular generator submatrix");
            return false;
        }
        let decoded = match system.mul(&parity_message) {
            Ok(decoded) => decoded,
            Err(_) => {
                self.mark_stuck("generator algebra failed");
                return false;
            }
        };

        let mut decoded_row = 0;
        for s in 0..k {
            if self.slots[s].is_some() {
                continue;
            }
            let row = decoded.row(decoded_row);
            let length = (usize::from(row[width - 2]) << 8) | usize::from(row[width - 1]);
            if length > width - 2 {
                self.mark_stuck("recovered length exceeds parity width");
                return false;
            }
            self.slots[s] = Some(row[..length].to_vec());
            self.filled += 1;
            decoded_row += 1;
        }
        true
    }

    fn mark_stuck(&mut self, reason: &'static str) {
        self.stuck = true;
        tracing::debug!(reason, "decoder entered stuck state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;

    fn encode(sources: &[&[u8]], total: usize) -> Vec<Vec<u8>> {
        let mut encoder = Encoder::new(sources.len()).unwrap();
        encoder.feed_many(sources).unwrap();
        let mut out = Vec::new();
        assert_eq!(encoder.draw(total, &mut out).unwrap(), total);
        out
    }

    fn drain(decoder: &mut Decoder, count: usize) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        decoder.draw(count, &mut out);
        out
    }

    #[test]
    fn learns_batch_size_from_first_packet() {
        let packets = encode(&[b"aa", b"b", b"ccc"], 3);
        let mut decoder = Decoder::new();
        assert_eq!(decoder.batch_size(), None);
        decoder.feed(&packets[1]);
        assert_eq!(decoder.batch_size(), Some(3));
    }

    #[test]
    fn drops_packets_without_payload() {
        let mut decoder = Decoder::new();
        decoder.feed(&[]);
        decoder.feed(&[0x01]);
        decoder.feed(&[0x01, 0x02]);
        assert_eq!(decoder.batch_size(), None);
    }

    #[test]
    fn drops_packets_from_other_batches() {
        let batch_a = encode(&[b"aa", b"bb"], 2);
        let batch_b = encode(&[b"x", b"y", b"z", b"w", b"v"], 5);
        let mut decoder = Decoder::new();
        decoder.feed(&batch_a[0]);
        // Wrong trailer byte: dropped without disturbing state.
        decoder.feed(&batch_b[1]);
        decoder.feed(&batch_a[1]);
        assert_eq!(drain(&mut decoder, 2), vec![b"aa".to_vec(), b"bb".to_vec()]);
    }

    #[test]
    fn duplicate_systematic_packets_are_dropped() {
        let packets = encode(&[b"aa", b"bb"], 2);
        let mut decoder = Decoder::new();
        decoder.feed(&packets[0]);
        decoder.feed(&packets[0]);
        decoder.feed(&packets[1]);
        assert_eq!(drain(&mut decoder, 2), vec![b"aa".to_vec(), b"bb".to_vec()]);
    }

    #[test]
    fn all_systematic_passes_through_without_algebra() {
        let packets = encode(&[b"alpha", b"br", b"charlie!"], 3);
        let mut decoder = Decoder::new();
        decoder.feed_many(&packets);
        assert_eq!(
            drain(&mut decoder, 3),
            vec![b"alpha".to_vec(), b"br".to_vec(), b"charlie!".to_vec()]
        );
    }

    #[test]
    fn single_loss_recovers_via_ones_row() {
        // k = 2 with one systematic loss exercises the XOR-only path.
        let packets = encode(&[&[0x01], &[0x02]], 3);
        let mut decoder = Decoder::new();
        decoder.feed(&packets[0]);
        decoder.feed(&packets[2]);
        assert_eq!(
            drain(&mut decoder, 2),
            vec![vec![0x01], vec![0x02]]
        );
    }

    #[test]
    fn any_single_output_recovers_a_one_packet_batch() {
        let packets = encode(&[&[0x42]], 2);
        for packet in &packets {
            let mut decoder = Decoder::new();
            decoder.feed(packet);
            assert_eq!(drain(&mut decoder, 1), vec![vec![0x42]]);
        }
    }

    #[test]
    fn duplicate_parity_is_filtered_by_row_index() {
        let packets = encode(&[&[0x01], &[0x02]], 3);
        let mut decoder = Decoder::new();
        decoder.feed(&packets[2]);
        decoder.feed(&packets[2]);
        decoder.feed(&packets[0]);
        assert_eq!(
            drain(&mut decoder, 2),
            vec![vec![0x01], vec![0x02]]
        );
        assert!(!decoder.is_stuck());
    }

    #[test]
    fn insufficient_packets_yield_only_the_known_prefix() {
        let packets = encode(&[b"aa", b"bb", b"cc"], 6);
        let mut decoder = Decoder::new();
        decoder.feed(&packets[0]);
        decoder.feed(&packets[1]);
        let out = drain(&mut decoder, 3);
        assert_eq!(out, vec![b"aa".to_vec(), b"bb".to_vec()]);
        assert!(!decoder.is_stuck());
        // The missing packet arrives later; the draw cursor resumes.
        decoder.feed(&packets[2]);
        assert_eq!(drain(&mut decoder, 3), vec![b"cc".to_vec()]);
    }

    #[test]
    fn mismatched_parity_lengths_latch_stuck() {
        // Hand-craft two parity packets of different lengths claiming the
        // same batch (k = 3, trailer byte 2). Both losses force the decoder
        // to select both packets.
        let systematic = encode(&[b"aa", b"bb", b"cc"], 3);
        let mut decoder = Decoder::new();
        decoder.feed(&systematic[0]);
        decoder.feed(&[0x10, 0x20, 0x30, 0x40, 0x50, 0x03, 0x02]);
        decoder.feed(&[0x10, 0x20, 0x30, 0x40, 0x04, 0x02]);
        let out = drain(&mut decoder, 3);
        assert_eq!(out.len(), 1);
        assert!(decoder.is_stuck());
        // Stuck absorbs further input, even a packet that would have
        // completed the batch.
        decoder.feed(&systematic[1]);
        decoder.feed(&systematic[2]);
        assert_eq!(drain(&mut decoder, 3).len(), 0);
    }

    #[test]
    fn impossible_recovered_length_latches_stuck() {
        // A forged parity packet whose decoded length suffix exceeds the
        // payload width. k = 1, so the ones row makes the forged payload
        // decode as-is: claimed length 0x0100 > width - 2 = 1.
        let mut decoder = Decoder::new();
        decoder.feed(&[0xAB, 0x01, 0x00, 0x01, 0x00]);
        assert_eq!(drain(&mut decoder, 1).len(), 0);
        assert!(decoder.is_stuck());
    }

    #[test]
    fn draw_after_reset_starts_over() {
        let packets = encode(&[b"aa", b"bb"], 2);
        let mut decoder = Decoder::new();
        decoder.feed_many(&packets);
        assert_eq!(drain(&mut decoder, 2).len(), 2);
        decoder.reset();
        assert_eq!(decoder.batch_size(), None);
        assert_eq!(drain(&mut decoder, 2).len(), 0);
        decoder.feed_many(&packets);
        assert_eq!(drain(&mut decoder, 2).len(), 2);
    }

    #[test]
    fn extra_feeds_after_full_decode_change_nothing() {
        let packets = encode(&[b"one", b"two", b"three"], 5);
        let mut decoder = Decoder::new();
        decoder.feed(&packets[4]);
        decoder.feed(&packets[1]);
        decoder.feed(&packets[3]);
        let first = drain(&mut decoder, 3);
        assert_eq!(
            first,
            vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]
        );
        // Late duplicates and fresh systematic packets are absorbed
        // without disturbing anything.
        decoder.feed_many(&packets);
        assert!(!decoder.is_stuck());
        assert_eq!(drain(&mut decoder, 3).len(), 0);
    }
}
