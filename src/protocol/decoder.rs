//! Byte-at-a-time MSP frame decoder
//!
//! The decoder is a state machine fed one byte at a time by whatever owns the
//! link. It never fails: noise, truncated frames and frames meant for someone
//! else all surface as [`Outcome`] values, and the parser always falls back to
//! hunting for the next `$M` preamble.
//!
//! ```text
//! Sync1 -'$'-> Sync2 -'M'-> Direction -'<' '>' '!'-> Length -> Code -> Payload -> Checksum
//!   ^            |              |                                                    |
//!   +------------+--------------+-------------------- verdict ----------------------+
//! ```
//!
//! A decoder holds one in-progress frame and is driven through `&mut self`;
//! share it between threads only behind a lock or by moving it.

use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use super::metrics::Metrics;
use super::{
    CodecConfig, Direction, Frame, JUMBO_LENGTH_MARKER, MetricsSnapshot, MspCode, Outcome,
    RejectReason, Rejection, Role, SYNC_PROTOCOL, SYNC_START,
};
#[cfg(feature = "debug-tools")]
use crate::capture::CaptureRecorder;

/// Position of the decoder within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserState {
    /// Waiting for `$`
    Sync1,
    /// Waiting for `M`
    Sync2,
    /// Waiting for the direction marker
    Direction,
    /// Waiting for the length byte
    Length,
    /// Waiting for the command code
    Code,
    /// Reading jumbo length bytes, then payload
    Payload,
    /// Waiting for the checksum byte
    Checksum,
}

/// Stateful MSP frame decoder for one link.
#[derive(Debug)]
pub struct Decoder {
    config: CodecConfig,
    state: ParserState,
    /// Last request/response marker seen. `!` leaves it untouched.
    direction: Direction,
    unsupported: bool,
    expected_len: usize,
    jumbo_remaining: u8,
    checksum: u8,
    code: u8,
    payload: BytesMut,
    metrics: Metrics,
    #[cfg(feature = "debug-tools")]
    recorder: Option<CaptureRecorder>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::with_config(CodecConfig::default())
    }
}

impl Decoder {
    /// Decoder with default settings for `role`
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self::with_config(CodecConfig::for_role(role))
    }

    /// Decoder with explicit settings
    #[must_use]
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            state: ParserState::Sync1,
            direction: config.role.inbound_direction(),
            unsupported: false,
            expected_len: 0,
            jumbo_remaining: 0,
            checksum: 0,
            code: 0,
            payload: BytesMut::with_capacity(config.initial_payload_capacity),
            metrics: Metrics::default(),
            #[cfg(feature = "debug-tools")]
            recorder: None,
        }
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Role this decoder receives for
    #[must_use]
    pub const fn role(&self) -> Role {
        self.config.role
    }

    /// Current parser state
    #[must_use]
    pub const fn state(&self) -> ParserState {
        self.state
    }

    /// Rejected and unsupported frames since creation or the last
    /// [`reset_error_count`](Self::reset_error_count)
    #[must_use]
    pub const fn error_count(&self) -> u64 {
        self.metrics.errors()
    }

    /// Zero the error count. Classified counters are kept.
    pub fn reset_error_count(&mut self) {
        self.metrics.reset_errors();
    }

    /// Snapshot of this decoder's counters
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Drop any partial frame and wait for a fresh `$`.
    pub fn reset(&mut self) {
        self.state = ParserState::Sync1;
        self.unsupported = false;
        self.expected_len = 0;
        self.jumbo_remaining = 0;
        self.checksum = 0;
        self.payload.clear();
    }

    /// Mirror every chunk passed to [`feed`](Self::feed) into a capture file.
    #[cfg(feature = "debug-tools")]
    pub fn set_recorder(&mut self, recorder: CaptureRecorder) {
        self.recorder = Some(recorder);
    }

    /// Advance through a chunk of received bytes.
    ///
    /// Returns every non-pending outcome in the order the terminating bytes
    /// were consumed. Identical to calling [`advance`](Self::advance) per byte.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Outcome> {
        #[cfg(feature = "debug-tools")]
        if let Some(recorder) = &self.recorder {
            if let Err(err) = recorder.record(bytes) {
                debug!(error = ?err, "failed to record inbound bytes");
            }
        }

        bytes
            .iter()
            .map(|&byte| self.advance(byte))
            .filter(|outcome| !outcome.is_pending())
            .collect()
    }

    /// Consume one byte.
    pub fn advance(&mut self, byte: u8) -> Outcome {
        self.metrics.record_byte();

        match self.state {
            ParserState::Sync1 => {
                if byte == SYNC_START {
                    self.state = ParserState::Sync2;
                } else {
                    self.discard(byte, "'$'");
                }
            }
            ParserState::Sync2 => {
                if byte == SYNC_PROTOCOL {
                    self.state = ParserState::Direction;
                } else {
                    self.discard(byte, "'M'");
                    self.state = ParserState::Sync1;
                }
            }
            ParserState::Direction => match Direction::from_u8(byte) {
                Some(Direction::Unsupported) => {
                    self.unsupported = true;
                    self.state = ParserState::Length;
                }
                Some(direction) => {
                    self.direction = direction;
                    self.unsupported = false;
                    self.state = ParserState::Length;
                }
                None => {
                    self.discard(byte, "direction marker");
                    self.state = ParserState::Sync1;
                }
            },
            ParserState::Length => {
                self.checksum = byte;
                if byte == JUMBO_LENGTH_MARKER {
                    self.jumbo_remaining = 2;
                    self.expected_len = 0;
                } else {
                    self.jumbo_remaining = 0;
                    self.expected_len = usize::from(byte);
                }
                self.payload.clear();
                self.state = ParserState::Code;
            }
            ParserState::Code => {
                self.code = byte;
                self.checksum ^= byte;
                self.state = if self.expected_len > 0 || self.jumbo_remaining > 0 {
                    ParserState::Payload
                } else {
                    ParserState::Checksum
                };
            }
            ParserState::Payload => {
                self.checksum ^= byte;
                if self.jumbo_remaining > 0 {
                    self.read_jumbo_length(byte);
                } else {
                    self.payload.put_u8(byte);
                    if self.payload.len() >= self.expected_len {
                        self.state = ParserState::Checksum;
                    }
                }
            }
            ParserState::Checksum => return self.finish_frame(byte),
        }

        Outcome::Pending
    }

    /// Jumbo length bytes arrive low byte first, right after the command code.
    fn read_jumbo_length(&mut self, byte: u8) {
        self.jumbo_remaining -= 1;
        let shift = if self.jumbo_remaining == 0 { 8 } else { 0 };
        self.expected_len += usize::from(byte) << shift;

        if self.jumbo_remaining == 0 {
            if self.expected_len == 0 {
                self.state = ParserState::Checksum;
            } else {
                self.payload.reserve(self.expected_len);
            }
        }
    }

    fn discard(&mut self, byte: u8, expected: &'static str) {
        self.metrics.record_discard();
        trace!(expected, got = byte, "discarding byte outside frame");
    }

    fn finish_frame(&mut self, received: u8) -> Outcome {
        self.state = ParserState::Sync1;

        let code = MspCode::from_u8(self.code);
        let payload = self.payload.split().freeze();
        let checksum_ok = self.checksum == received;
        let echo = self.direction == self.config.role.outbound_direction();

        if checksum_ok && code.is_known() && !echo && !self.unsupported {
            self.metrics.record_frame();
            trace!(%code, len = payload.len(), "frame decoded");
            return Outcome::Frame(Frame::new(code, self.direction, payload));
        }

        if self.unsupported {
            self.metrics.record_unsupported();
            debug!(%code, checksum_ok, "peer reports unsupported command");
            return Outcome::RejectedUnsupported { code, payload };
        }

        let reason = if !checksum_ok {
            RejectReason::ChecksumMismatch {
                expected: self.checksum,
                found: received,
            }
        } else if echo {
            RejectReason::Echo {
                direction: self.direction,
            }
        } else {
            RejectReason::UnknownCommand
        };
        self.metrics.record_rejection(reason);
        debug!(%code, %reason, len = payload.len(), "frame rejected");

        // Lossy radio links often drop a byte, which puts the next frame's
        // '$' where the checksum was expected.
        if !checksum_ok && received == SYNC_START {
            self.metrics.record_resync();
            debug!("checksum byte is '$', resyncing on it");
            self.state = ParserState::Sync2;
        }

        Outcome::Rejected(Rejection {
            reason,
            code,
            payload,
        })
    }
}
