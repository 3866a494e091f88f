//! Decoded MSP frames and decoder outcomes

use bytes::Bytes;

use super::{Direction, MspCode, RejectReason};

/// A complete, checksum-verified MSP frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    code: MspCode,
    direction: Direction,
    payload: Bytes,
}

impl Frame {
    /// Create a frame
    pub fn new(code: MspCode, direction: Direction, payload: impl Into<Bytes>) -> Self {
        Self {
            code,
            direction,
            payload: payload.into(),
        }
    }

    /// Get command code
    #[must_use]
    pub const fn code(&self) -> MspCode {
        self.code
    }

    /// Get direction marker
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Get payload
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Take the payload
    #[must_use]
    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}

/// A frame the decoder refused to deliver.
///
/// The payload is whatever was accumulated before the verdict and must not
/// be trusted; it is kept for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Why the frame was dropped
    pub reason: RejectReason,
    /// Command code as read from the wire
    pub code: MspCode,
    /// Untrusted payload bytes
    pub payload: Bytes,
}

/// Result of pushing one byte into the [`Decoder`](super::Decoder)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Byte consumed, no complete frame yet
    Pending,
    /// Verified frame addressed to this endpoint
    Frame(Frame),
    /// Peer marked the command as unsupported. The payload is best effort and
    /// is delivered even if the checksum failed.
    RejectedUnsupported {
        /// Command code the peer refused
        code: MspCode,
        /// Payload carried by the refusal
        payload: Bytes,
    },
    /// Frame failed its checksum, was an echo of local traffic, or used an
    /// unrecognized command code
    Rejected(Rejection),
}

impl Outcome {
    /// Whether the byte completed nothing
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether this outcome counts as a decode error
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::RejectedUnsupported { .. } | Self::Rejected(_))
    }

    /// The delivered frame, if any
    #[must_use]
    pub fn into_frame(self) -> Option<Frame> {
        match self {
            Self::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    /// Command code of the completed frame, if one completed
    #[must_use]
    pub fn code(&self) -> Option<MspCode> {
        match self {
            Self::Pending => None,
            Self::Frame(frame) => Some(frame.code()),
            Self::RejectedUnsupported { code, .. } => Some(*code),
            Self::Rejected(rejection) => Some(rejection.code),
        }
    }
}
