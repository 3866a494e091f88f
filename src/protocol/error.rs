//! MSP error types

use thiserror::Error;

use super::Direction;

/// MSP codec errors
///
/// Malformed bytes on the receive path are never reported through this type;
/// the decoder turns them into [`Outcome`](super::Outcome) values instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Payload does not fit in an encodable frame
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Capture record ended before its declared length
    #[error("truncated capture record: need {needed} bytes, got {got}")]
    TruncatedCapture {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Why the decoder dropped a structurally complete frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Running XOR did not match the trailing checksum byte
    #[error("checksum mismatch: computed {expected:#04x}, received {found:#04x}")]
    ChecksumMismatch {
        /// Checksum computed over the received bytes
        expected: u8,
        /// Checksum byte read from the wire
        found: u8,
    },

    /// Frame carries the marker this endpoint sends, i.e. our own traffic
    #[error("echo of outgoing traffic ({direction})")]
    Echo {
        /// Direction marker of the echoed frame
        direction: Direction,
    },

    /// Command code is not in the recognized set
    #[error("unknown command code")]
    UnknownCommand,
}

impl RejectReason {
    /// Whether the frame failed its integrity check
    #[must_use]
    pub const fn is_checksum(self) -> bool {
        matches!(self, Self::ChecksumMismatch { .. })
    }
}
