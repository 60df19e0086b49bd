use serde::{Deserialize, Serialize};

/// Payload length configured on both radios
pub const FRAME_LEN: usize = 4;

/// The fixed radio payload, used in both directions.
///
/// Layout: `[temp_in: i8][temp_out: i8][code: u8][auto_flag: u8]`. Whether
/// `code` is a status or a command depends on which node reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RadioFrame {
    pub temp_in: i8,
    pub temp_out: i8,
    pub code: u8,
    pub auto_flag: u8,
}

impl RadioFrame {
    pub fn new(temp_in: i8, temp_out: i8, code: u8, auto_flag: u8) -> Self {
        Self {
            temp_in,
            temp_out,
            code,
            auto_flag,
        }
    }

    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        [
            self.temp_in as u8,
            self.temp_out as u8,
            self.code,
            self.auto_flag,
        ]
    }

    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self {
            temp_in: bytes[0] as i8,
            temp_out: bytes[1] as i8,
            code: bytes[2],
            auto_flag: bytes[3],
        }
    }
}
