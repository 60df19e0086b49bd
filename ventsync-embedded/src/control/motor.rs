use ventsync_api::Command;

use crate::config::NodeConfig;
use crate::hal::WindowHal;

use super::{Energized, Motion, MotionOutcome, Position};

/// Owns the window position and the motion in flight, if any.
#[derive(Debug, Default)]
pub struct MotorController {
    position: Position,
    motion: Option<Motion>,
}

impl MotorController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn motion(&self) -> Option<&Motion> {
        self.motion.as_ref()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Plans the travel for `command`. Returns `false` when there is nothing
    /// to do: already at the requested end, or `Stop`.
    pub fn start(&mut self, command: Command, force_checks: bool, config: &NodeConfig) -> bool {
        let nudge = (!command.is_full_travel()).then_some(config.nudge_revolutions);

        let motion = match command {
            Command::OpenAll | Command::Open if !self.position.is_open(config.rev_open) => {
                Motion::opening(self.position, nudge, config)
            }
            Command::CloseAll | Command::Close if !self.position.is_closed() => {
                Motion::closing(self.position, nudge, force_checks, config)
            }
            _ => return false,
        };

        self.motion = Some(motion);
        true
    }

    /// Drops the motion in flight, if any.
    pub fn cancel(&mut self) -> Option<Motion> {
        self.motion.take()
    }

    /// Treats the window as seated shut without moving.
    pub fn reset_closed(&mut self) {
        self.motion = None;
        self.position = Position::CLOSED;
    }

    /// Advances the motion in flight by one half-step. Anything but
    /// [`MotionOutcome::Running`] ends it.
    pub fn step<H>(
        &mut self,
        driver: &mut Energized<'_, H>,
        peer_pending: bool,
        config: &NodeConfig,
    ) -> MotionOutcome
    where
        H: WindowHal,
    {
        let Some(motion) = self.motion.as_mut() else {
            return MotionOutcome::Completed;
        };

        let outcome = motion.step(driver, &mut self.position, peer_pending, config);
        if outcome != MotionOutcome::Running {
            self.motion = None;
        }
        outcome
    }
}
