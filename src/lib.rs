//! Systematic Cauchy Reed-Solomon erasure codec over GF(2^8).
//!
//! # Overview
//!
//! `cauchy-fec` turns a batch of up to 256 variable-length source packets
//! into a stream of output packets with the maximum-distance-separable
//! property: any subset of output packets the size of the batch is enough
//! to recover every source packet. The code is systematic, so the first
//! outputs are the source packets themselves and decoding costs nothing
//! when nothing was lost. This fits unreliable datagram transports (UDP,
//! radio links, storage shards) where retransmission is impossible or too
//! slow.
//!
//! # Wire format
//!
//! Every output packet ends with a two-byte trailer
//! `[generator_row_index, batch_size - 1]`:
//!
//! ```text
//! systematic (row < k):  source bytes ................ | row | k-1
//! parity     (row >= k): encoded row (longest + 2) ... | row | k-1
//! ```
//!
//! The decoder learns the batch size from the trailer of the first packet
//! it accepts and silently drops anything that does not belong: short
//! packets, duplicates, packets from other batches.
//!
//! # Module structure
//!
//! - [`gf256`]: GF(2^8) arithmetic with compile-time log/exp tables
//! - [`matrix`]: dense matrix algebra and Gauss-Jordan inversion
//! - [`generator`]: generator-row construction (identity, ones, Cauchy)
//! - [`encoder`]: systematic streaming encoder
//! - [`decoder`]: erasure decoder with a latched stuck state
//! - [`codec`]: mode-dispatching facade
//! - [`error`]: error types and kinds
//!
//! # Example
//!
//! ```
//! use cauchy_fec::Codec;
//!
//! # fn main() -> Result<(), cauchy_fec::CodecError> {
//! let mut sender = Codec::new();
//! sender.reset_encode(3)?;
//! sender.feed(b"alpha")?;
//! sender.feed(b"br")?;
//! sender.feed(b"charlie!")?;
//! let mut emitted = Vec::new();
//! sender.draw(5, &mut emitted)?; // 3 systematic + 2 parity packets
//!
//! // Two packets are lost in transit; any three of the five suffice.
//! let mut receiver = Codec::new();
//! receiver.reset_decode();
//! receiver.feed(&emitted[4])?;
//! receiver.feed(&emitted[0])?;
//! receiver.feed(&emitted[3])?;
//! let mut recovered = Vec::new();
//! receiver.draw(3, &mut recovered)?;
//! assert_eq!(recovered[1], b"br");
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! The field tables are compile-time constants, so there is no global
//! initialization step. A codec handle is single-threaded; independent
//! handles may run on as many threads as desired.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::should_implement_trait)]

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod generator;
pub mod gf256;
pub mod matrix;

pub use codec::{Codec, Mode};
pub use decoder::Decoder;
pub use encoder::{Encoder, MAX_SOURCE_PACKET_LEN};
pub use error::{CodecError, ErrorKind, MatrixError};
pub use generator::{generator_row, MAX_BATCH_PACKETS, MAX_ROW_INDEX};
pub use gf256::Gf256;
pub use matrix::Matrix;
