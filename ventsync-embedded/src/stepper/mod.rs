mod ramp;
mod step_dir;

pub use ramp::SpeedRamp;
pub use step_dir::StepDirMotor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Open,
    Close,
}

pub trait Motor {
    fn set_direction(&mut self, direction: Direction);

    /// Drives the step line; a full pulse is `true` then `false`.
    fn set_step(&mut self, level: bool);

    fn enable(&mut self);

    /// De-energises the driver and parks every line in its idle level.
    fn disable(&mut self);
}
