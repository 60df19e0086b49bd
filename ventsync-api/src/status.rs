use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};

/// Window state shared by both nodes. Discriminants are the on-air codes and
/// share one numbering space with [`crate::PeerCommand`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WindowStatus {
    NoConnection = 0,
    #[default]
    Closed = 1,
    Open = 2,
    Closing = 3,
    Opening = 4,
    /// Stopped mid-travel by an override, a cancel or an obstruction
    OpenPartial = 5,
}

impl WindowStatus {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::NoConnection),
            1 => Ok(Self::Closed),
            2 => Ok(Self::Open),
            3 => Ok(Self::Closing),
            4 => Ok(Self::Opening),
            5 => Ok(Self::OpenPartial),
            other => Err(FrameError::UnknownStatus(other)),
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Open as far as automatic mode and the peer are concerned
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open | Self::OpenPartial)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NoConnection => "No link",
            Self::Closed => "Closed",
            Self::Open => "Open",
            Self::Closing => "Closing",
            Self::Opening => "Opening",
            Self::OpenPartial => "Partial",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(WindowStatus::NoConnection.code(), 0);
        assert_eq!(WindowStatus::Closed.code(), 1);
        assert_eq!(WindowStatus::Open.code(), 2);
        assert_eq!(WindowStatus::Closing.code(), 3);
        assert_eq!(WindowStatus::Opening.code(), 4);
        assert_eq!(WindowStatus::OpenPartial.code(), 5);
    }

    #[test]
    fn test_status_from_u8() {
        assert_eq!(WindowStatus::from_u8(2).unwrap(), WindowStatus::Open);
        assert_eq!(
            WindowStatus::from_u8(0xFF),
            Err(FrameError::UnknownStatus(0xFF))
        );
    }

    #[test]
    fn test_defaults_to_closed() {
        assert_eq!(WindowStatus::default(), WindowStatus::Closed);
    }

    #[test]
    fn test_partial_counts_as_open() {
        assert!(WindowStatus::OpenPartial.is_open());
        assert!(!WindowStatus::Closed.is_open());
        assert!(!WindowStatus::Opening.is_open());
    }
}
