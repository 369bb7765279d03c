//! Error types for the stream format
//!
//! Every error is fatal to the call in progress and nothing is retried
//! internally. A failed deserialization leaves the target arena unchanged.

use auxlist_graph::GraphError;
use std::io;

/// Coarse classification of a [`WireError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Truncated, oversized or undecodable record, or an inconsistent sequence
    MalformedRecord,
    /// An auxiliary id that no record defines
    UnresolvedReference,
    /// The underlying stream failed or cannot hold a record
    IoFailure,
    /// A node handle passed by the caller is not in its arena
    InvalidHandle,
}

/// Why a record was rejected
#[derive(Debug, thiserror::Error)]
pub enum MalformedReason {
    /// Stream ended inside a length prefix
    #[error("length prefix truncated after {read} of 4 bytes")]
    TruncatedPrefix {
        /// Bytes of the prefix that were present
        read: usize,
    },

    /// Length prefix promises more bytes than the stream holds
    #[error("payload truncated: expected {expected} bytes, found {found}")]
    TruncatedPayload {
        /// Length announced by the prefix
        expected: u32,
        /// Bytes actually available
        found: usize,
    },

    /// Length exceeds the reader's configured limit
    #[error("record of {len} bytes exceeds limit of {max}")]
    Oversized {
        /// Announced or actual length
        len: u64,
        /// Configured maximum
        max: u32,
    },

    /// Payload bytes could not be decoded
    #[error("payload does not decode: {0}")]
    Decode(#[from] CodecError),
}

/// Payload codec failures
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Compact binary codec failed
    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),

    /// JSON codec failed
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main error type for serialization and deserialization
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A record could not be read
    #[error("malformed record at index {index}: {reason}")]
    MalformedRecord {
        /// Zero-based position of the record in the stream
        index: usize,
        /// What was wrong with it
        reason: MalformedReason,
    },

    /// A record could not be encoded
    #[error("record {index} could not be encoded: {source}")]
    Encode {
        /// Zero-based position of the record
        index: usize,
        /// Codec failure
        source: CodecError,
    },

    /// An encoded record is longer than a length prefix can express
    #[error("record {index} of {len} bytes does not fit a u32 length prefix")]
    PayloadTooLarge {
        /// Zero-based position of the record
        index: usize,
        /// Encoded payload length
        len: u64,
    },

    /// The decoded sequence does not describe a chain
    #[error("invalid record sequence: {0}")]
    Graph(#[from] GraphError),

    /// Underlying stream failure
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
}

impl WireError {
    /// Build a [`WireError::MalformedRecord`]
    #[inline]
    pub fn malformed(index: usize, reason: impl Into<MalformedReason>) -> Self {
        Self::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }

    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRecord { .. } | Self::Encode { .. } => ErrorKind::MalformedRecord,
            Self::Io(_) | Self::PayloadTooLarge { .. } => ErrorKind::IoFailure,
            Self::Graph(e) if e.is_unresolved_reference() => ErrorKind::UnresolvedReference,
            Self::Graph(GraphError::NodeNotFound(_)) => ErrorKind::InvalidHandle,
            Self::Graph(_) => ErrorKind::MalformedRecord,
        }
    }

    /// Whether re-running the whole call against a fresh stream may succeed
    ///
    /// Only transient I/O conditions qualify; malformed input stays malformed.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxlist_graph::IdentityToken;

    #[test]
    fn kinds_follow_error_categories() {
        let truncated = WireError::malformed(3, MalformedReason::TruncatedPrefix { read: 2 });
        assert_eq!(truncated.kind(), ErrorKind::MalformedRecord);

        let unresolved = WireError::from(GraphError::UnresolvedReference {
            token: IdentityToken::from_u128(1),
            pending: 1,
        });
        assert_eq!(unresolved.kind(), ErrorKind::UnresolvedReference);

        let empty = WireError::from(GraphError::EmptySequence);
        assert_eq!(empty.kind(), ErrorKind::MalformedRecord);

        let io = WireError::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert_eq!(io.kind(), ErrorKind::IoFailure);
        assert!(!io.is_retryable());
    }

    #[test]
    fn interrupted_io_is_retryable() {
        let err = WireError::from(io::Error::from(io::ErrorKind::Interrupted));
        assert!(err.is_retryable());
        assert!(!WireError::from(GraphError::EmptySequence).is_retryable());
    }

    #[test]
    fn display_names_the_record() {
        let err = WireError::malformed(
            7,
            MalformedReason::TruncatedPayload {
                expected: 10,
                found: 4,
            },
        );
        assert_eq!(
            err.to_string(),
            "malformed record at index 7: payload truncated: expected 10 bytes, found 4"
        );
    }
}
