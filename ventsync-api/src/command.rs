use serde::{Deserialize, Serialize};

use crate::frame::RadioFrame;
use crate::status::WindowStatus;

/// Command code asking the window to reconfigure automatic mode. It collides
/// with `WindowStatus::Closing` on purpose: a status is never sent towards the
/// window, so the window reads code 3 as this command.
pub const CONFIGURE_AUTO_CODE: u8 = 3;

/// Motion request consumed by the window's motor controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Close to the end stop
    CloseAll,
    /// Close by a short nudge
    Close,
    /// Open to the end stop
    OpenAll,
    /// Open by a short nudge
    Open,
    Stop,
}

impl Command {
    pub fn is_opening(self) -> bool {
        matches!(self, Self::OpenAll | Self::Open)
    }

    pub fn is_closing(self) -> bool {
        matches!(self, Self::CloseAll | Self::Close)
    }

    pub fn is_full_travel(self) -> bool {
        matches!(self, Self::OpenAll | Self::CloseAll)
    }
}

/// Command carried by a frame from the remote node.
///
/// `Close` and `Open` reuse the status codes of `Closed` (1) and `Open` (2).
/// `ConfigureAuto` (code 3) overloads the payload: `max` sits in the
/// `temp_out` byte and `min` in the `auto_flag` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerCommand {
    Close,
    Open,
    ConfigureAuto { max: i8, min: i8 },
}

impl PeerCommand {
    /// Reads the command out of a received frame. Codes without a meaning are
    /// ignored rather than rejected.
    pub fn decode(frame: &RadioFrame) -> Option<Self> {
        match frame.code {
            c if c == WindowStatus::Closed.code() => Some(Self::Close),
            c if c == WindowStatus::Open.code() => Some(Self::Open),
            CONFIGURE_AUTO_CODE => Some(Self::ConfigureAuto {
                max: frame.temp_out,
                min: frame.auto_flag as i8,
            }),
            _ => None,
        }
    }

    pub fn encode(self) -> RadioFrame {
        match self {
            Self::Close => RadioFrame::new(0, 0, WindowStatus::Closed.code(), 0),
            Self::Open => RadioFrame::new(0, 0, WindowStatus::Open.code(), 0),
            Self::ConfigureAuto { max, min } => {
                RadioFrame::new(0, max, CONFIGURE_AUTO_CODE, min as u8)
            }
        }
    }

    /// Direct open/close requests, as opposed to configuration
    pub fn is_manual(self) -> bool {
        matches!(self, Self::Close | Self::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_open_close() {
        assert_eq!(
            PeerCommand::decode(&RadioFrame::new(72, 68, 2, 0)),
            Some(PeerCommand::Open)
        );
        assert_eq!(
            PeerCommand::decode(&RadioFrame::new(0, 0, 1, 0)),
            Some(PeerCommand::Close)
        );
    }

    #[test]
    fn test_configure_auto_overload() {
        let frame = PeerCommand::ConfigureAuto { max: 80, min: 63 }.encode();
        assert_eq!(frame.to_bytes(), [0, 80, 3, 63]);
        assert_eq!(
            PeerCommand::decode(&frame),
            Some(PeerCommand::ConfigureAuto { max: 80, min: 63 })
        );

        let freezing = RadioFrame::from_bytes([0, 40, 3, 0xF6]);
        assert_eq!(
            PeerCommand::decode(&freezing),
            Some(PeerCommand::ConfigureAuto { max: 40, min: -10 })
        );
    }

    #[test]
    fn test_unknown_codes_ignored() {
        for code in [0u8, 4, 5, 6, 0x7F, 0xFF] {
            assert_eq!(PeerCommand::decode(&RadioFrame::new(0, 0, code, 0)), None);
        }
    }

    #[test]
    fn test_command_classification() {
        assert!(Command::OpenAll.is_opening());
        assert!(Command::Open.is_opening());
        assert!(Command::Close.is_closing());
        assert!(!Command::Stop.is_opening());
        assert!(!Command::Stop.is_closing());
        assert!(Command::CloseAll.is_full_travel());
        assert!(!Command::Close.is_full_travel());
        assert!(PeerCommand::Open.is_manual());
        assert!(!PeerCommand::ConfigureAuto { max: 1, min: 0 }.is_manual());
    }
}
