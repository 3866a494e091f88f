//! MSP v1 frame header
//!
//! # Wire Format
//!
//! ```text
//! compact (payload 0..=254 bytes):
//! +-----+-----+-----+--------+------+-----------------+----------+
//! | '$' | 'M' | dir | length | code | payload (length)| checksum |
//! +-----+-----+-----+--------+------+-----------------+----------+
//!
//! jumbo (payload 255..=65535 bytes):
//! +-----+-----+-----+------+------+--------+--------+---------+----------+
//! | '$' | 'M' | dir | 0xFF | code | len lo | len hi | payload | checksum |
//! +-----+-----+-----+------+------+--------+--------+---------+----------+
//! ```
//!
//! The checksum is the XOR of every byte from the length field up to the end
//! of the payload, jumbo length bytes included.

use bytes::BufMut;

use super::{
    CHECKSUM_SIZE, Direction, Error, HEADER_SIZE, JUMBO_HEADER_SIZE, JUMBO_LENGTH_MARKER,
    MAX_COMPACT_PAYLOAD_SIZE, MAX_PAYLOAD_SIZE, MspCode, Result, SYNC_PROTOCOL, SYNC_START,
};

/// Header of an outbound MSP frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    direction: Direction,
    code: MspCode,
    payload_len: u16,
}

impl FrameHeader {
    /// Create a header, refusing payloads no frame can describe
    pub fn new(direction: Direction, code: MspCode, payload_len: usize) -> Result<Self> {
        let payload_len = u16::try_from(payload_len).map_err(|_| Error::PayloadTooLarge {
            size: payload_len,
            max: MAX_PAYLOAD_SIZE,
        })?;
        Ok(Self {
            direction,
            code: code.canonical(),
            payload_len,
        })
    }

    /// Get direction marker
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Get command code
    #[must_use]
    pub const fn code(&self) -> MspCode {
        self.code
    }

    /// Get payload length
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.payload_len as usize
    }

    /// Whether the length needs the extended encoding
    #[must_use]
    pub const fn is_jumbo(&self) -> bool {
        self.payload_len as usize > MAX_COMPACT_PAYLOAD_SIZE
    }

    /// Header size on the wire
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        if self.is_jumbo() {
            JUMBO_HEADER_SIZE
        } else {
            HEADER_SIZE
        }
    }

    /// Complete frame size: header, payload and checksum
    #[must_use]
    pub const fn frame_len(&self) -> usize {
        self.encoded_len() + self.payload_len() + CHECKSUM_SIZE
    }

    /// Header bytes covered by the checksum, in wire order
    fn checksummed(&self) -> ([u8; 4], usize) {
        let code = self.code.as_u8();
        if self.is_jumbo() {
            let [lo, hi] = self.payload_len.to_le_bytes();
            ([JUMBO_LENGTH_MARKER, code, lo, hi], 4)
        } else {
            // Compact lengths are at most 254, so the cast is lossless.
            ([self.payload_len as u8, code, 0, 0], 2)
        }
    }

    /// XOR of the header bytes that feed the checksum
    #[must_use]
    pub fn checksum_seed(&self) -> u8 {
        let (bytes, len) = self.checksummed();
        bytes[..len].iter().fold(0u8, |acc, b| acc ^ b)
    }

    /// Append the header to `buf`
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        let (bytes, len) = self.checksummed();
        buf.put_u8(SYNC_START);
        buf.put_u8(SYNC_PROTOCOL);
        buf.put_u8(self.direction.as_u8());
        buf.put_slice(&bytes[..len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::MIN_FRAME_SIZE;

    #[test]
    fn test_compact_header_layout() {
        let header = FrameHeader::new(Direction::Request, MspCode::Ident, 7).unwrap();
        let mut bytes = Vec::new();
        header.write_to(&mut bytes);

        assert_eq!(bytes, [b'$', b'M', b'<', 7, 100]);
        assert_eq!(header.encoded_len(), HEADER_SIZE);
        assert_eq!(header.frame_len(), HEADER_SIZE + 7 + CHECKSUM_SIZE);
        assert_eq!(header.checksum_seed(), 7 ^ 100);
    }

    #[test]
    fn test_jumbo_header_layout() {
        let header = FrameHeader::new(Direction::Response, MspCode::DataflashRead, 513).unwrap();
        let mut bytes = Vec::new();
        header.write_to(&mut bytes);

        assert!(header.is_jumbo());
        assert_eq!(bytes, [b'$', b'M', b'>', 0xFF, 71, 1, 2]);
        assert_eq!(header.encoded_len(), JUMBO_HEADER_SIZE);
        assert_eq!(header.checksum_seed(), 0xFF ^ 71 ^ 1 ^ 2);
    }

    #[test]
    fn test_length_255_is_jumbo() {
        let header = FrameHeader::new(Direction::Request, MspCode::Status, 255).unwrap();
        assert!(header.is_jumbo());
        let header = FrameHeader::new(Direction::Request, MspCode::Status, 254).unwrap();
        assert!(!header.is_jumbo());
    }

    #[test]
    fn test_empty_frame_is_minimum_size() {
        let header = FrameHeader::new(Direction::Request, MspCode::Status, 0).unwrap();
        assert_eq!(header.frame_len(), MIN_FRAME_SIZE);
    }

    #[test]
    fn test_unknown_alias_canonicalized() {
        let header = FrameHeader::new(Direction::Request, MspCode::Unknown(100), 0).unwrap();
        assert_eq!(header.code(), MspCode::Ident);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let result = FrameHeader::new(Direction::Request, MspCode::Status, MAX_PAYLOAD_SIZE + 1);
        assert!(matches!(
            result,
            Err(Error::PayloadTooLarge { size, max }) if size == MAX_PAYLOAD_SIZE + 1 && max == MAX_PAYLOAD_SIZE
        ));
    }
}
