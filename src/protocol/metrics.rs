#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::RejectReason;

/// Counters owned by a single decoder.
#[derive(Debug, Default, Clone)]
pub(crate) struct Metrics {
    bytes_received: u64,
    frames_decoded: u64,
    checksum_errors: u64,
    echo_frames: u64,
    unknown_commands: u64,
    unsupported_commands: u64,
    discarded_bytes: u64,
    resyncs: u64,
    errors: u64,
}

impl Metrics {
    #[inline]
    pub(crate) fn record_byte(&mut self) {
        self.bytes_received += 1;
    }

    #[inline]
    pub(crate) fn record_frame(&mut self) {
        self.frames_decoded += 1;
    }

    #[inline]
    pub(crate) fn record_discard(&mut self) {
        self.discarded_bytes += 1;
    }

    #[inline]
    pub(crate) fn record_resync(&mut self) {
        self.resyncs += 1;
    }

    #[inline]
    pub(crate) fn record_unsupported(&mut self) {
        self.unsupported_commands += 1;
        self.errors += 1;
    }

    #[inline]
    pub(crate) fn record_rejection(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::ChecksumMismatch { .. } => self.checksum_errors += 1,
            RejectReason::Echo { .. } => self.echo_frames += 1,
            RejectReason::UnknownCommand => self.unknown_commands += 1,
        }
        self.errors += 1;
    }

    #[inline]
    pub(crate) const fn errors(&self) -> u64 {
        self.errors
    }

    #[inline]
    pub(crate) fn reset_errors(&mut self) {
        self.errors = 0;
    }

    #[inline]
    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bytes_received: self.bytes_received,
            frames_decoded: self.frames_decoded,
            checksum_errors: self.checksum_errors,
            echo_frames: self.echo_frames,
            unknown_commands: self.unknown_commands,
            unsupported_commands: self.unsupported_commands,
            discarded_bytes: self.discarded_bytes,
            resyncs: self.resyncs,
            errors: self.errors,
        }
    }
}

/// Point-in-time copy of a decoder's counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricsSnapshot {
    /// Bytes passed to the decoder
    pub bytes_received: u64,
    /// Frames delivered as [`Outcome::Frame`](super::Outcome::Frame)
    pub frames_decoded: u64,
    /// Frames dropped on checksum mismatch
    pub checksum_errors: u64,
    /// Frames dropped as echoes of local traffic
    pub echo_frames: u64,
    /// Frames dropped for an unrecognized command code
    pub unknown_commands: u64,
    /// Frames the peer marked as unsupported
    pub unsupported_commands: u64,
    /// Bytes thrown away while hunting for a frame start
    pub discarded_bytes: u64,
    /// Times a checksum byte was reused as the next frame's `$`
    pub resyncs: u64,
    /// Error count since the last reset
    pub errors: u64,
}

impl MetricsSnapshot {
    /// Rejected frames of every kind, regardless of error-count resets
    #[must_use]
    pub const fn total_rejected(&self) -> u64 {
        self.checksum_errors + self.echo_frames + self.unknown_commands + self.unsupported_commands
    }

    /// Share of completed frames that were delivered, `None` before any frame
    #[must_use]
    pub fn delivery_ratio(&self) -> Option<f64> {
        let completed = self.frames_decoded + self.total_rejected();
        if completed == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.frames_decoded as f64 / completed as f64)
    }
}
