//! MSP direction markers and endpoint roles

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction marker (third byte of every frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Direction {
    /// Request travelling to the flight controller (`<`)
    Request = b'<',
    /// Response travelling to the ground station (`>`)
    Response = b'>',
    /// Peer reports the command as unsupported (`!`)
    Unsupported = b'!',
}

impl Direction {
    /// Convert from byte
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            b'<' => Some(Self::Request),
            b'>' => Some(Self::Response),
            b'!' => Some(Self::Unsupported),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Request => "request",
            Self::Response => "response",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{name}")
    }
}

/// Which end of the link this codec sits on.
///
/// The role decides which direction marker is written by the encoder and
/// which one the decoder accepts. A frame carrying the role's own outbound
/// marker is treated as an echo of local traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    /// Configurator / ground-control side: sends requests, receives responses
    #[default]
    GroundStation,
    /// Vehicle side: receives requests, sends responses
    FlightController,
}

impl Role {
    /// Marker written on frames this role sends
    #[must_use]
    pub const fn outbound_direction(self) -> Direction {
        match self {
            Self::GroundStation => Direction::Request,
            Self::FlightController => Direction::Response,
        }
    }

    /// Marker expected on frames addressed to this role
    #[must_use]
    pub const fn inbound_direction(self) -> Direction {
        match self {
            Self::GroundStation => Direction::Response,
            Self::FlightController => Direction::Request,
        }
    }

    /// The role on the other end of the link
    #[must_use]
    pub const fn peer(self) -> Self {
        match self {
            Self::GroundStation => Self::FlightController,
            Self::FlightController => Self::GroundStation,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GroundStation => "ground-station",
            Self::FlightController => "flight-controller",
        };
        write!(f, "{name}")
    }
}
