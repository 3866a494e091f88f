//! MSP (MultiWii Serial Protocol) v1 codec
//!
//! This library frames and unframes MSP messages exchanged between a ground
//! station and a Cleanflight/Betaflight/iNav flight controller. It stops at
//! "command code plus raw payload": transports and payload interpretation
//! belong to the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use msp_codec::{Decoder, Encoder, MspCode, Outcome, Role};
//!
//! // The flight controller answers an MSP_IDENT request
//! let reply = Encoder::new(Role::FlightController).encode(MspCode::Ident, &[1, 2, 3])?;
//!
//! // The ground station decodes it byte by byte
//! let mut decoder = Decoder::new(Role::GroundStation);
//! let outcomes = decoder.feed(&reply);
//! assert!(matches!(&outcomes[..], [Outcome::Frame(frame)] if frame.code() == MspCode::Ident));
//! # Ok::<(), msp_codec::Error>(())
//! ```
//!
//! # Features
//!
//! - **Byte-level resynchronization** - noise and dropped bytes never wedge the parser
//! - **Jumbo frames** - payloads up to 64 KiB, encoded and decoded
//! - **Typed command codes** - closed enum with an explicit `Unknown` fallback
//! - **Capture files** - record raw link traffic for offline analysis

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod capture;
pub mod protocol;
pub mod stream;

pub use capture::{CaptureReader, CaptureRecord, CaptureRecorder, CaptureWriter};
pub use protocol::{
    CodecConfig, Decoder, Direction, Encoder, Error, Frame, MAX_PAYLOAD_SIZE, MetricsSnapshot,
    MspCode, Outcome, ParserState, RejectReason, Rejection, Result, Role, encode,
};
pub use stream::FrameReader;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
