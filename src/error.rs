//! Error types for the codec surface and the matrix algebra layer.
//!
//! Errors are explicit and typed. The codec surface exposes a flat
//! [`ErrorKind`] next to the descriptive [`CodecError`] variants so callers
//! can branch on the class of failure without matching every variant.

/// The kind of codec error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An argument was outside its documented domain.
    InvalidArgument,
    /// The operation is not valid in the codec's current state.
    StateError,
    /// A buffer or batch limit was reached.
    CapacityExceeded,
    /// The generator row space for this batch is exhausted.
    OutOfCodeSpace,
    /// An internal algebra failure surfaced to the caller.
    Internal,
}

/// Errors produced by the matrix algebra layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("matrix dimensions are mismatched: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// (rows, columns) of the left operand (or the expected shape).
        left: (usize, usize),
        /// (rows, columns) of the right operand (or the found shape).
        right: (usize, usize),
    },
    /// Inversion was requested for a non-square matrix.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Row count of the offending matrix.
        rows: usize,
        /// Column count of the offending matrix.
        cols: usize,
    },
    /// No non-zero pivot could be found; the matrix has no inverse.
    #[error("matrix is singular")]
    Singular,
}

/// Errors produced by the encoder and the codec facade.
///
/// Decoder-side inconsistencies are not reported here: the decoder latches
/// its terminal stuck state and signals it through a `draw` shortfall.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A zero-byte source packet was fed to the encoder.
    #[error("source packets must be non-empty")]
    EmptySourcePacket,
    /// A source packet does not fit the 16-bit length suffix.
    #[error("source packet of {len} bytes exceeds the 65535-byte limit")]
    SourcePacketTooLong {
        /// Length of the offending packet.
        len: usize,
    },
    /// The requested batch size cannot be expressed in the trailer byte.
    #[error("batch size {requested} is outside 1..=256")]
    InvalidBatchSize {
        /// The rejected batch size.
        requested: usize,
    },
    /// A source packet arrived after parity generation began.
    #[error("source phase is over; reset required before feeding")]
    SourcePhaseOver,
    /// More source packets were fed than the batch holds.
    #[error("all {batch_size} source packets already fed")]
    BatchFull {
        /// Batch size of the encoder.
        batch_size: usize,
    },
    /// The generator cursor would advance past row 255.
    #[error("generator row space exhausted: a batch yields at most 256 packets")]
    OutOfCodeSpace,
    /// The codec handle has not been reset into a mode.
    #[error("codec must be reset into encode or decode mode first")]
    NotConfigured,
    /// The algebra layer failed underneath the encoder. Not expected for
    /// well-formed batches; indicates a bug or corrupted state.
    #[error("matrix algebra failed: {0}")]
    Matrix(#[from] MatrixError),
}

impl CodecError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptySourcePacket
            | Self::SourcePacketTooLong { .. }
            | Self::InvalidBatchSize { .. } => ErrorKind::InvalidArgument,
            Self::SourcePhaseOver | Self::NotConfigured => ErrorKind::StateError,
            Self::BatchFull { .. } => ErrorKind::CapacityExceeded,
            Self::OutOfCodeSpace => ErrorKind::OutOfCodeSpace,
            Self::Matrix(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_taxonomy() {
        assert_eq!(
            CodecError::EmptySourcePacket.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            CodecError::SourcePacketTooLong { len: 70_000 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            CodecError::InvalidBatchSize { requested: 0 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(CodecError::SourcePhaseOver.kind(), ErrorKind::StateError);
        assert_eq!(CodecError::NotConfigured.kind(), ErrorKind::StateError);
        assert_eq!(
            CodecError::BatchFull { batch_size: 4 }.kind(),
            ErrorKind::CapacityExceeded
        );
        assert_eq!(CodecError::OutOfCodeSpace.kind(), ErrorKind::OutOfCodeSpace);
        assert_eq!(
            CodecError::Matrix(MatrixError::Singular).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn matrix_errors_convert() {
        let err: CodecError = MatrixError::NotSquare { rows: 2, cols: 3 }.into();
        assert!(matches!(
            err,
            CodecError::Matrix(MatrixError::NotSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn display_is_descriptive() {
        let err = CodecError::BatchFull { batch_size: 8 };
        assert_eq!(err.to_string(), "all 8 source packets already fed");
        let err = MatrixError::ShapeMismatch {
            left: (2, 3),
            right: (4, 5),
        };
        assert!(err.to_string().contains("(2, 3)"));
    }
}
