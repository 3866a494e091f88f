//! MSP v1 protocol core
//!
//! This module provides the wire format, command codes, the stateless encoder
//! and the resynchronizing byte-at-a-time decoder.

mod code;
mod codec;
mod config;
mod decoder;
mod error;
mod frame;
mod header;
mod metrics;
mod types;

pub use code::MspCode;
pub use codec::{Encoder, encode};
pub use config::CodecConfig;
pub use decoder::{Decoder, ParserState};
pub use error::{Error, RejectReason, Result};
pub use frame::{Frame, Outcome, Rejection};
pub use header::FrameHeader;
pub use metrics::MetricsSnapshot;
pub use types::{Direction, Role};

/// First preamble byte: `$`
pub const SYNC_START: u8 = b'$';

/// Second preamble byte: `M` (MSP v1)
pub const SYNC_PROTOCOL: u8 = b'M';

/// Length byte announcing a two-byte extended length
pub const JUMBO_LENGTH_MARKER: u8 = 0xFF;

/// Largest payload expressible in the single length byte
pub const MAX_COMPACT_PAYLOAD_SIZE: usize = 254;

/// Largest payload expressible with a jumbo length
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Header size in bytes: preamble, direction, length, code
pub const HEADER_SIZE: usize = 5;

/// Header size in bytes when the two jumbo length bytes follow the code
pub const JUMBO_HEADER_SIZE: usize = HEADER_SIZE + 2;

/// Checksum size in bytes
pub const CHECKSUM_SIZE: usize = 1;

/// Minimum frame size (empty payload)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + CHECKSUM_SIZE;
