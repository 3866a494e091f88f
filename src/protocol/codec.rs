//! MSP frame encoder
//!
//! Encoding is stateless: an [`Encoder`] only holds its configuration, so one
//! instance can be shared freely between threads.

use bytes::{BufMut, BytesMut};

use super::{CodecConfig, Error, FrameHeader, MspCode, Result, Role};

/// Builds outbound MSP frames for one endpoint role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoder {
    config: CodecConfig,
}

impl Encoder {
    /// Encoder with default settings for `role`
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self::with_config(CodecConfig::for_role(role))
    }

    /// Encoder with explicit settings
    #[must_use]
    pub const fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a frame to bytes
    ///
    /// # Format
    ///
    /// ```text
    /// ['$' 'M' DIR] [LENGTH] [CODE] ([LEN LO] [LEN HI]) [PAYLOAD] [CHECKSUM]
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] when the payload does not fit the
    /// configured framing. Payloads are never truncated.
    pub fn encode(&self, code: MspCode, payload: &[u8]) -> Result<Vec<u8>> {
        let header = self.header(code, payload)?;
        let mut bytes = Vec::with_capacity(header.frame_len());
        write_frame(&header, payload, &mut bytes);
        Ok(bytes)
    }

    /// Encode a frame, appending it to `buf`
    pub fn encode_into(&self, code: MspCode, payload: &[u8], buf: &mut BytesMut) -> Result<()> {
        let header = self.header(code, payload)?;
        buf.reserve(header.frame_len());
        write_frame(&header, payload, buf);
        Ok(())
    }

    fn header(&self, code: MspCode, payload: &[u8]) -> Result<FrameHeader> {
        let max = self.config.max_payload_len();
        if payload.len() > max {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max,
            });
        }
        FrameHeader::new(self.config.role.outbound_direction(), code, payload.len())
    }
}

/// Encode a frame sent by `role` with default settings
pub fn encode(role: Role, code: MspCode, payload: &[u8]) -> Result<Vec<u8>> {
    Encoder::new(role).encode(code, payload)
}

fn write_frame<B: BufMut>(header: &FrameHeader, payload: &[u8], buf: &mut B) {
    header.write_to(buf);
    buf.put_slice(payload);
    let checksum = payload.iter().fold(header.checksum_seed(), |acc, b| acc ^ b);
    buf.put_u8(checksum);
}
