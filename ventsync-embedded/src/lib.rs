#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod control;
pub mod error;
pub mod hal;
pub mod node;
pub mod radio;
pub mod remote;
pub mod scheduler;
pub mod sensor;
pub mod stepper;
pub mod tasks;

pub use config::*;
pub use control::*;
pub use error::*;
pub use hal::*;
pub use node::WindowNode;
pub use radio::*;
pub use remote::*;
pub use scheduler::*;
pub use sensor::*;
pub use stepper::*;
