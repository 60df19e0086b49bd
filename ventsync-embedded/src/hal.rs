//! Hardware capabilities consumed by the window node.
//!
//! [`WindowHal`] is the whole surface the control logic touches. [`Board`]
//! assembles it from embedded-hal parts; tests and simulators may implement
//! the trait directly.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::error::Result;
use crate::stepper::{Direction, Motor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Indoor,
    Outdoor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    OpenButton,
    CloseButton,
    /// Cancels a running motion
    StopButton,
    /// End-of-travel switch, also cancels a running motion
    Limit,
    /// Clears a latched force fault
    FaultReset,
}

impl Input {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            Input::OpenButton => 0,
            Input::CloseButton => 1,
            Input::StopButton => 2,
            Input::Limit => 3,
            Input::FaultReset => 4,
        }
    }
}

pub trait Thermometer {
    /// Blocking conversion, in whole degrees Fahrenheit
    fn read_fahrenheit(&mut self, channel: Channel) -> Result<i8>;
}

pub trait ForceSensor {
    fn read_force(&mut self) -> u16;
}

impl<F> ForceSensor for F
where
    F: FnMut() -> u16,
{
    fn read_force(&mut self) -> u16 {
        self()
    }
}

pub trait Inputs {
    /// `true` when the input is asserted, whatever its electrical polarity
    fn is_active(&mut self, input: Input) -> bool;
}

pub trait WindowHal {
    fn read_temperature(&mut self, channel: Channel) -> Result<i8>;

    fn read_force(&mut self) -> u16;

    fn step_motor(&mut self, level: bool);

    fn set_direction(&mut self, direction: Direction);

    fn set_enable(&mut self, enabled: bool);

    fn read_digital(&mut self, input: Input) -> bool;

    fn write_indicator(&mut self, on: bool);

    fn delay_us(&mut self, us: u32);

    /// Parks the motor lines: step low, direction idle, driver disabled.
    fn release_motor(&mut self) {
        self.step_motor(false);
        self.set_direction(Direction::Close);
        self.set_enable(false);
    }
}

/// Digital inputs backed by embedded-hal pins
pub struct PinInputs<Pin>
where
    Pin: InputPin,
{
    pins: [Pin; Input::COUNT],
    active_low: [bool; Input::COUNT],
}

impl<Pin> PinInputs<Pin>
where
    Pin: InputPin,
{
    /// Buttons wired to ground with pull-ups, so every input starts active-low.
    pub fn new(open: Pin, close: Pin, stop: Pin, limit: Pin, fault_reset: Pin) -> Self {
        Self {
            pins: [open, close, stop, limit, fault_reset],
            active_low: [true; Input::COUNT],
        }
    }

    pub fn with_active_low(mut self, input: Input, active_low: bool) -> Self {
        self.active_low[input.index()] = active_low;
        self
    }
}

impl<Pin> Inputs for PinInputs<Pin>
where
    Pin: InputPin,
{
    fn is_active(&mut self, input: Input) -> bool {
        let index = input.index();
        let active_low = self.active_low[index];
        self.pins[index]
            .is_high()
            .map(|high| high != active_low)
            .unwrap_or(false)
    }
}

/// Window-node board assembled from individual drivers
pub struct Board<M, T, F, I, L, D> {
    pub motor: M,
    pub thermometer: T,
    pub force: F,
    pub inputs: I,
    pub indicator: L,
    pub delay: D,
}

impl<M, T, F, I, L, D> Board<M, T, F, I, L, D>
where
    M: Motor,
    T: Thermometer,
    F: ForceSensor,
    I: Inputs,
    L: OutputPin,
    D: DelayNs,
{
    pub fn new(motor: M, thermometer: T, force: F, inputs: I, indicator: L, delay: D) -> Self {
        Self {
            motor,
            thermometer,
            force,
            inputs,
            indicator,
            delay,
        }
    }
}

impl<M, T, F, I, L, D> WindowHal for Board<M, T, F, I, L, D>
where
    M: Motor,
    T: Thermometer,
    F: ForceSensor,
    I: Inputs,
    L: OutputPin,
    D: DelayNs,
{
    fn read_temperature(&mut self, channel: Channel) -> Result<i8> {
        self.thermometer.read_fahrenheit(channel)
    }

    fn read_force(&mut self) -> u16 {
        self.force.read_force()
    }

    fn step_motor(&mut self, level: bool) {
        self.motor.set_step(level);
    }

    fn set_direction(&mut self, direction: Direction) {
        self.motor.set_direction(direction);
    }

    fn set_enable(&mut self, enabled: bool) {
        if enabled {
            self.motor.enable();
        } else {
            self.motor.disable();
        }
    }

    fn read_digital(&mut self, input: Input) -> bool {
        self.inputs.is_active(input)
    }

    fn write_indicator(&mut self, on: bool) {
        self.indicator.set_state(PinState::from(on)).ok();
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn release_motor(&mut self) {
        self.motor.disable();
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embedded_hal::digital::ErrorType;

    use super::*;

    struct LevelPin(bool);

    impl ErrorType for LevelPin {
        type Error = Infallible;
    }

    impl InputPin for LevelPin {
        fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
            Ok(!self.0)
        }
    }

    #[test]
    fn test_active_low_inputs() {
        let mut inputs = PinInputs::new(
            LevelPin(false),
            LevelPin(true),
            LevelPin(true),
            LevelPin(true),
            LevelPin(true),
        );

        assert!(inputs.is_active(Input::OpenButton));
        assert!(!inputs.is_active(Input::CloseButton));
        assert!(!inputs.is_active(Input::FaultReset));
    }

    #[test]
    fn test_active_high_override() {
        let mut inputs = PinInputs::new(
            LevelPin(true),
            LevelPin(true),
            LevelPin(true),
            LevelPin(true),
            LevelPin(true),
        )
        .with_active_low(Input::Limit, false);

        assert!(inputs.is_active(Input::Limit));
        assert!(!inputs.is_active(Input::StopButton));
    }

    #[test]
    fn test_closure_force_sensor() {
        let mut readings = [5u16, 120].into_iter();
        let mut sensor = move || readings.next().unwrap_or(0);

        assert_eq!(sensor.read_force(), 5);
        assert_eq!(sensor.read_force(), 120);
        assert_eq!(sensor.read_force(), 0);
    }
}
