use crate::config::NodeConfig;
use crate::hal::{Input, WindowHal};
use crate::stepper::{Direction, SpeedRamp};

use super::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    /// More half-steps to go
    Running,
    /// Target reached (and, closing with a healthy force sensor, contact felt)
    Completed,
    /// Peer frame, stop button or limit switch
    Cancelled,
    /// Force threshold crossed while closing
    Obstructed,
    /// Seating at the closed end never saw contact
    Stalled,
}

/// Motor driver held enabled for as long as this guard lives. Dropping it
/// parks the step, direction and enable lines whichever way the motion ends.
pub struct Energized<'a, H>
where
    H: WindowHal,
{
    hal: &'a mut H,
}

impl<'a, H> Energized<'a, H>
where
    H: WindowHal,
{
    pub fn new(hal: &'a mut H, direction: Direction) -> Self {
        hal.set_direction(direction);
        hal.set_enable(true);
        Self { hal }
    }

    pub fn hal(&mut self) -> &mut H {
        self.hal
    }
}

impl<H> Drop for Energized<'_, H>
where
    H: WindowHal,
{
    fn drop(&mut self) {
        self.hal.release_motor();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Travel,
    /// Position reads closed; keep driving until the force sensor confirms
    Seating,
}

/// One open or close travel, advanced a half-step at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motion {
    direction: Direction,
    target: u32,
    ramp: SpeedRamp,
    force_checks: bool,
    phase: Phase,
    /// Half-steps driven at revolution 0 without contact
    unconfirmed: u16,
}

impl Motion {
    /// Opens fully, or by `nudge` revolutions.
    pub fn opening(from: Position, nudge: Option<u8>, config: &NodeConfig) -> Self {
        let full = Position::fully_open(config.rev_open).pulses(config.steps_per_rev);
        let target = match nudge {
            Some(revolutions) => from
                .pulses(config.steps_per_rev)
                .saturating_add(u32::from(revolutions) * u32::from(config.steps_per_rev))
                .min(full),
            None => full,
        };

        Self {
            direction: Direction::Open,
            target,
            ramp: SpeedRamp::new(config.ramp_start_us, config.open_floor_us),
            force_checks: false,
            phase: Phase::Travel,
            unconfirmed: 0,
        }
    }

    /// Closes fully, or by `nudge` revolutions. `force_checks` is off while
    /// the force sensor is latched faulty.
    pub fn closing(
        from: Position,
        nudge: Option<u8>,
        force_checks: bool,
        config: &NodeConfig,
    ) -> Self {
        let target = match nudge {
            Some(revolutions) => from
                .pulses(config.steps_per_rev)
                .saturating_sub(u32::from(revolutions) * u32::from(config.steps_per_rev)),
            None => 0,
        };

        Self {
            direction: Direction::Close,
            target,
            ramp: SpeedRamp::new(config.ramp_start_us, config.close_floor_us),
            force_checks,
            phase: Phase::Travel,
            unconfirmed: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Polls the cancel sources, then performs at most one half-step.
    pub fn step<H>(
        &mut self,
        driver: &mut Energized<'_, H>,
        position: &mut Position,
        peer_pending: bool,
        config: &NodeConfig,
    ) -> MotionOutcome
    where
        H: WindowHal,
    {
        let hal = driver.hal();
        if peer_pending || hal.read_digital(Input::StopButton) || hal.read_digital(Input::Limit) {
            return MotionOutcome::Cancelled;
        }

        match self.phase {
            Phase::Seating => {
                if hal.read_force() >= config.force_threshold {
                    return MotionOutcome::Completed;
                }
                if self.unconfirmed >= config.stall_bound {
                    return MotionOutcome::Stalled;
                }
                self.pulse(hal);
                self.unconfirmed += 1;
                MotionOutcome::Running
            }
            Phase::Travel => {
                if position.pulses(config.steps_per_rev) == self.target {
                    return self.arrive();
                }
                if self.direction == Direction::Close
                    && self.force_checks
                    && hal.read_force() >= config.force_threshold
                {
                    return MotionOutcome::Obstructed;
                }
                // The last revolution counts toward the stall bound too
                if self.seats() && position.revolutions == 0 {
                    if self.unconfirmed >= config.stall_bound {
                        return MotionOutcome::Stalled;
                    }
                    self.unconfirmed += 1;
                }

                self.pulse(hal);
                match self.direction {
                    Direction::Open => position.advance(config.steps_per_rev),
                    Direction::Close => position.retreat(config.steps_per_rev),
                }

                if position.pulses(config.steps_per_rev) == self.target {
                    self.arrive()
                } else {
                    MotionOutcome::Running
                }
            }
        }
    }

    /// Full close with a healthy force sensor: must end on felt contact.
    fn seats(&self) -> bool {
        self.direction == Direction::Close && self.target == 0 && self.force_checks
    }

    fn arrive(&mut self) -> MotionOutcome {
        if self.seats() {
            self.phase = Phase::Seating;
            MotionOutcome::Running
        } else {
            MotionOutcome::Completed
        }
    }

    fn pulse<H>(&mut self, hal: &mut H)
    where
        H: WindowHal,
    {
        let wait = self.ramp.next_wait();
        hal.step_motor(true);
        hal.delay_us(wait);
        hal.step_motor(false);
        hal.delay_us(wait);
    }
}
