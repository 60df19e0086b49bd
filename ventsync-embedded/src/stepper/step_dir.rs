use embedded_hal::digital::OutputPin;

use super::{Direction, Motor};

/// Step/direction/enable driver (A4988, DRV8825 and friends)
pub struct StepDirMotor<Pin>
where
    Pin: OutputPin,
{
    step_pin: Pin,
    dir_pin: Pin,
    enable_pin: Pin,
    step_pin_inverted: bool,
    dir_pin_inverted: bool,
    enable_pin_inverted: bool,
    enabled: bool,
}

impl<Pin> StepDirMotor<Pin>
where
    Pin: OutputPin,
{
    pub fn new(step_pin: Pin, dir_pin: Pin, enable_pin: Pin) -> Self {
        Self {
            step_pin,
            dir_pin,
            enable_pin,
            step_pin_inverted: false,
            dir_pin_inverted: false,
            // Most carrier boards pull ENABLE low to energise the coils
            enable_pin_inverted: true,
            enabled: false,
        }
    }

    pub fn with_inversion(mut self, step: bool, dir: bool, enable: bool) -> Self {
        self.step_pin_inverted = step;
        self.dir_pin_inverted = dir;
        self.enable_pin_inverted = enable;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn write(pin: &mut Pin, level: bool, inverted: bool) {
        if level != inverted {
            pin.set_high().ok();
        } else {
            pin.set_low().ok();
        }
    }
}

impl<Pin> Motor for StepDirMotor<Pin>
where
    Pin: OutputPin,
{
    fn set_direction(&mut self, direction: Direction) {
        Self::write(
            &mut self.dir_pin,
            direction == Direction::Open,
            self.dir_pin_inverted,
        );
    }

    fn set_step(&mut self, level: bool) {
        if !self.enabled {
            return;
        }
        Self::write(&mut self.step_pin, level, self.step_pin_inverted);
    }

    fn enable(&mut self) {
        self.enabled = true;
        Self::write(&mut self.enable_pin, true, self.enable_pin_inverted);
    }

    fn disable(&mut self) {
        self.enabled = false;
        Self::write(&mut self.step_pin, false, self.step_pin_inverted);
        Self::write(&mut self.dir_pin, false, self.dir_pin_inverted);
        Self::write(&mut self.enable_pin, false, self.enable_pin_inverted);
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;
    use core::convert::Infallible;

    use alloc::rc::Rc;
    use alloc::vec::Vec;

    use embedded_hal::digital::ErrorType;

    use super::*;

    #[derive(Debug, Default)]
    pub struct MockPin {
        pub states: Rc<RefCell<Vec<bool>>>,
    }

    impl MockPin {
        pub fn new() -> Self {
            Self {
                states: Rc::new(RefCell::new(Vec::new())),
            }
        }

        pub fn get_states(&self) -> Vec<bool> {
            self.states.borrow().clone()
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.states.borrow_mut().push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.states.borrow_mut().push(true);
            Ok(())
        }
    }

    fn motor() -> StepDirMotor<MockPin> {
        StepDirMotor::new(MockPin::new(), MockPin::new(), MockPin::new())
    }

    #[test]
    fn test_direction_control() {
        let mut motor = motor();

        motor.set_direction(Direction::Open);
        motor.set_direction(Direction::Close);

        let dir_states = motor.dir_pin.get_states();
        assert_eq!(dir_states, vec![true, false]);
    }

    #[test]
    fn test_step_pulse() {
        let mut motor = motor();

        motor.enable();
        motor.set_step(true);
        motor.set_step(false);

        assert_eq!(
            motor.step_pin.get_states(),
            vec![true, false],
            "Half-step should drive the line high then low"
        );
    }

    #[test]
    fn test_inverted_pins() {
        let mut motor = motor().with_inversion(true, true, false);

        motor.enable();
        motor.set_direction(Direction::Open);
        motor.set_step(true);

        assert_eq!(motor.step_pin.get_states(), vec![false]);
        assert_eq!(motor.dir_pin.get_states(), vec![false]);
        assert_eq!(motor.enable_pin.get_states(), vec![true]);
    }

    #[test]
    fn test_enable_disable() {
        let mut motor = motor();

        motor.set_step(true);
        assert!(
            motor.step_pin.get_states().is_empty(),
            "No step pulses should be generated when disabled"
        );

        motor.enable();
        assert!(motor.is_enabled());
        assert_eq!(
            motor.enable_pin.get_states(),
            vec![false],
            "Active-low enable is driven low"
        );

        motor.set_step(true);
        motor.disable();
        assert!(!motor.is_enabled());
        assert_eq!(motor.step_pin.get_states().last(), Some(&false));
        assert_eq!(motor.dir_pin.get_states().last(), Some(&false));
        assert_eq!(motor.enable_pin.get_states().last(), Some(&true));
    }
}
