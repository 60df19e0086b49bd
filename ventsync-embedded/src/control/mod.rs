mod auto;
mod fault;
mod manual;
mod motion;
mod motor;
mod position;

pub use auto::{AutoState, decide};
pub use fault::FaultState;
pub use manual::ManualState;
pub use motion::{Energized, Motion, MotionOutcome};
pub use motor::MotorController;
pub use position::Position;

use log::debug;
use ventsync_api::{AutoConfig, Command, TemperatureReading, WindowStatus};

/// Who asked for a motor command. Later variants outrank earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandSource {
    Auto,
    Peer,
    Manual,
}

/// Single pending command consumed by the motor task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandSlot {
    pending: Option<(Command, CommandSource)>,
}

impl CommandSlot {
    /// Stores `command` unless a higher-ranked source already owns the slot.
    pub fn submit(&mut self, command: Command, source: CommandSource) -> bool {
        if let Some((held, owner)) = self.pending {
            if owner > source {
                debug!("{:?} {:?} dropped, slot held by {:?} {:?}", source, command, owner, held);
                return false;
            }
        }

        self.pending = Some((command, source));
        true
    }

    pub fn take(&mut self) -> Option<Command> {
        self.pending.take().map(|(command, _)| command)
    }

    pub fn peek(&self) -> Option<(Command, CommandSource)> {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

/// Window state shared by every task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedState {
    pub status: WindowStatus,
    pub reading: TemperatureReading,
    pub auto: AutoConfig,
    /// Force sensor declared faulty; cleared only by the reset input
    pub force_fault: bool,
    pub pending: CommandSlot,
}
