//! Codec configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Role;

/// Settings shared by [`Encoder`](super::Encoder) and [`Decoder`](super::Decoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodecConfig {
    /// Which end of the link this codec serves.
    pub role: Role,
    /// Emit jumbo frames for payloads longer than 254 bytes. When disabled the
    /// encoder refuses such payloads. The decoder always accepts jumbo frames.
    pub jumbo_frames: bool,
    /// Bytes reserved up front for the decoder's payload buffer.
    pub initial_payload_capacity: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            role: Role::GroundStation,
            jumbo_frames: true,
            initial_payload_capacity: 64,
        }
    }
}

impl CodecConfig {
    /// Default configuration for the given role
    #[must_use]
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    /// Enable or disable jumbo frame encoding
    #[must_use]
    pub const fn with_jumbo_frames(mut self, enabled: bool) -> Self {
        self.jumbo_frames = enabled;
        self
    }

    /// Set the initial payload buffer capacity
    #[must_use]
    pub const fn with_initial_payload_capacity(mut self, capacity: usize) -> Self {
        self.initial_payload_capacity = capacity;
        self
    }

    /// Largest payload the encoder accepts under this configuration
    #[must_use]
    pub const fn max_payload_len(&self) -> usize {
        if self.jumbo_frames {
            super::MAX_PAYLOAD_SIZE
        } else {
            super::MAX_COMPACT_PAYLOAD_SIZE
        }
    }
}
