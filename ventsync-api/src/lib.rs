#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod command;
pub mod error;
pub mod frame;
pub mod readings;
pub mod report;
pub mod status;

pub use command::{CONFIGURE_AUTO_CODE, Command, PeerCommand};
pub use error::FrameError;
pub use frame::{FRAME_LEN, RadioFrame};
pub use readings::{AutoConfig, TemperatureReading};
pub use report::{FAULT_CODE, ReportedStatus, StatusReport};
pub use status::WindowStatus;
