use serde::{Deserialize, Serialize};

use crate::frame::RadioFrame;
use crate::readings::TemperatureReading;
use crate::status::WindowStatus;

/// Status byte sent while the force-fault latch is set (`-1` on the wire)
pub const FAULT_CODE: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportedStatus {
    Window(WindowStatus),
    /// Force sensor fault latched, true window state withheld
    Fault,
    Unknown(u8),
}

impl ReportedStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Window(status) => status.code(),
            Self::Fault => FAULT_CODE,
            Self::Unknown(code) => code,
        }
    }

    pub fn from_code(code: u8) -> Self {
        if code == FAULT_CODE {
            return Self::Fault;
        }
        WindowStatus::from_u8(code)
            .map(Self::Window)
            .unwrap_or(Self::Unknown(code))
    }
}

/// Status frame pushed by the window node every radio cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub reading: TemperatureReading,
    pub status: ReportedStatus,
    pub auto: bool,
}

impl StatusReport {
    pub fn encode(&self) -> RadioFrame {
        RadioFrame::new(
            self.reading.indoor,
            self.reading.outdoor,
            self.status.code(),
            self.auto as u8,
        )
    }

    pub fn decode(frame: &RadioFrame) -> Self {
        Self {
            reading: TemperatureReading::new(frame.temp_in, frame.temp_out),
            status: ReportedStatus::from_code(frame.code),
            auto: frame.auto_flag != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_encoding() {
        let report = StatusReport {
            reading: TemperatureReading::new(72, 68),
            status: ReportedStatus::Window(WindowStatus::Open),
            auto: false,
        };
        assert_eq!(report.encode().to_bytes(), [72, 68, 2, 0]);
    }

    #[test]
    fn test_fault_report() {
        let report = StatusReport {
            reading: TemperatureReading::new(70, 50),
            status: ReportedStatus::Fault,
            auto: true,
        };
        let frame = report.encode();
        assert_eq!(frame.to_bytes(), [70, 50, 0xFF, 1]);
        assert_eq!(StatusReport::decode(&frame).status, ReportedStatus::Fault);
    }

    #[test]
    fn test_unknown_status_code_preserved() {
        let report = StatusReport::decode(&RadioFrame::new(0, 0, 42, 7));
        assert_eq!(report.status, ReportedStatus::Unknown(42));
        assert!(report.auto);
    }
}
