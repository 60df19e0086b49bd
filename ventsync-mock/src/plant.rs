//! Physical side of the simulated window: sash and motor, force sensor,
//! room climate and the local buttons.

use std::cell::RefCell;
use std::convert::Infallible;
use std::f32::consts::PI;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use ventsync_embedded::{
    Board, Channel, Ds18b20, ForceSensor, Input, PinInputs, Result, ScratchpadSource,
    StepDirMotor,
};

use crate::settings::Climate;

pub type SharedPlant = Rc<RefCell<Plant>>;

pub type SimBoard = Board<
    StepDirMotor<PlantPin>,
    Ds18b20<ThermalBus>,
    SimForce,
    PinInputs<SimButton>,
    PlantPin,
    SimDelay,
>;

const INPUTS: [Input; 5] = [
    Input::OpenButton,
    Input::CloseButton,
    Input::StopButton,
    Input::Limit,
    Input::FaultReset,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Step,
    Dir,
    Enable,
    Indicator,
}

#[derive(Debug)]
pub struct Plant {
    /// Sash travel in half-step pulses from the frame
    pub travel: i64,
    pub full_travel: i64,
    pub obstruction: Option<i64>,
    pub force_sensor_ok: bool,
    pub contact_force: u16,
    pub indoor_f: f32,
    pub outdoor_f: f32,
    pub indicator: bool,
    /// Time burnt in motor delays
    pub motor_ns: u64,
    pub pulses: u64,
    climate: Climate,
    elapsed_secs: f64,
    step_level: bool,
    dir_open: bool,
    enabled: bool,
    pressed: [bool; 5],
}

impl Plant {
    pub fn shared(climate: &Climate, full_travel: i64, contact_force: u16) -> SharedPlant {
        Rc::new(RefCell::new(Self {
            travel: 0,
            full_travel,
            obstruction: None,
            force_sensor_ok: true,
            contact_force,
            indoor_f: climate.indoor_start_f,
            outdoor_f: climate.outdoor_mean_f,
            indicator: false,
            motor_ns: 0,
            pulses: 0,
            climate: climate.clone(),
            elapsed_secs: 0.0,
            step_level: false,
            dir_open: false,
            enabled: false,
            pressed: [false; 5],
        }))
    }

    fn drive(&mut self, line: Line, high: bool) {
        match line {
            Line::Step => {
                let rising = high && !self.step_level;
                self.step_level = high;
                if rising && self.enabled {
                    self.pulse();
                }
            }
            Line::Dir => self.dir_open = high,
            // Active-low enable
            Line::Enable => self.enabled = !high,
            Line::Indicator => self.indicator = high,
        }
    }

    fn pulse(&mut self) {
        self.pulses += 1;
        if self.dir_open {
            self.travel = (self.travel + 1).min(self.full_travel);
        } else if !self.blocked() {
            self.travel = (self.travel - 1).max(0);
        }
    }

    fn blocked(&self) -> bool {
        self.obstruction.is_some_and(|at| self.travel <= at)
    }

    pub fn force(&self) -> u16 {
        if self.force_sensor_ok && (self.travel == 0 || self.blocked()) {
            self.contact_force
        } else {
            0
        }
    }

    pub fn press(&mut self, input: Input, pressed: bool) {
        if let Some(index) = INPUTS.iter().position(|candidate| *candidate == input) {
            self.pressed[index] = pressed;
        }
    }

    pub fn is_pressed(&self, input: Input) -> bool {
        INPUTS
            .iter()
            .position(|candidate| *candidate == input)
            .is_some_and(|index| self.pressed[index])
    }

    pub fn open_fraction(&self) -> f32 {
        if self.full_travel == 0 {
            return 0.0;
        }
        self.travel as f32 / self.full_travel as f32
    }

    /// Advances the room climate by `secs`.
    pub fn advance_climate(&mut self, secs: f64) {
        self.elapsed_secs += secs;

        let day = self.climate.day_secs.max(1) as f64;
        let phase = ((self.elapsed_secs % day) / day) as f32 * 2.0 * PI;
        self.outdoor_f = self.climate.outdoor_mean_f + self.climate.outdoor_swing_f * phase.sin();

        let minutes = (secs / 60.0) as f32;
        let exchange = self.climate.leakage + self.climate.ventilation * self.open_fraction();
        self.indoor_f += (self.climate.indoor_gain
            + exchange * (self.outdoor_f - self.indoor_f))
            * minutes;
    }
}

/// Fahrenheit to a DS18B20 temperature register.
pub fn fahrenheit_to_scratchpad(fahrenheit: f32) -> [u8; 2] {
    let celsius = (fahrenheit - 32.0) * 5.0 / 9.0;
    let raw = (celsius * 16.0).round().clamp(-55.0 * 16.0, 125.0 * 16.0) as i16;
    raw.to_le_bytes()
}

pub struct PlantPin {
    plant: SharedPlant,
    line: Line,
}

impl PlantPin {
    pub fn new(plant: &SharedPlant, line: Line) -> Self {
        Self {
            plant: plant.clone(),
            line,
        }
    }
}

impl ErrorType for PlantPin {
    type Error = Infallible;
}

impl OutputPin for PlantPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.plant.borrow_mut().drive(self.line, false);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.plant.borrow_mut().drive(self.line, true);
        Ok(())
    }
}

/// Push button wired to ground: reads low while pressed.
pub struct SimButton {
    plant: SharedPlant,
    input: Input,
}

impl SimButton {
    pub fn new(plant: &SharedPlant, input: Input) -> Self {
        Self {
            plant: plant.clone(),
            input,
        }
    }
}

impl ErrorType for SimButton {
    type Error = Infallible;
}

impl InputPin for SimButton {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(!self.plant.borrow().is_pressed(self.input))
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(self.plant.borrow().is_pressed(self.input))
    }
}

pub struct SimForce {
    plant: SharedPlant,
}

impl ForceSensor for SimForce {
    fn read_force(&mut self) -> u16 {
        self.plant.borrow().force()
    }
}

/// One-wire bus with an indoor and an outdoor DS18B20.
pub struct ThermalBus {
    plant: SharedPlant,
}

impl ScratchpadSource for ThermalBus {
    fn read_scratchpad(&mut self, channel: Channel) -> Result<[u8; 2]> {
        let plant = self.plant.borrow();
        let fahrenheit = match channel {
            Channel::Indoor => plant.indoor_f,
            Channel::Outdoor => plant.outdoor_f,
        };
        Ok(fahrenheit_to_scratchpad(fahrenheit))
    }
}

/// Busy-wait stand-in that only accounts the time.
pub struct SimDelay {
    plant: SharedPlant,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.plant.borrow_mut().motor_ns += u64::from(ns);
    }
}

pub fn board(plant: &SharedPlant) -> SimBoard {
    let motor = StepDirMotor::new(
        PlantPin::new(plant, Line::Step),
        PlantPin::new(plant, Line::Dir),
        PlantPin::new(plant, Line::Enable),
    );
    let inputs = PinInputs::new(
        SimButton::new(plant, Input::OpenButton),
        SimButton::new(plant, Input::CloseButton),
        SimButton::new(plant, Input::StopButton),
        SimButton::new(plant, Input::Limit),
        SimButton::new(plant, Input::FaultReset),
    );

    Board::new(
        motor,
        Ds18b20::new(ThermalBus {
            plant: plant.clone(),
        }),
        SimForce {
            plant: plant.clone(),
        },
        inputs,
        PlantPin::new(plant, Line::Indicator),
        SimDelay {
            plant: plant.clone(),
        },
    )
}

#[cfg(test)]
mod tests {
    use ventsync_embedded::{Direction, WindowHal, scratchpad_to_fahrenheit};

    use super::*;

    fn climate() -> Climate {
        Climate {
            indoor_start_f: 70.0,
            outdoor_mean_f: 60.0,
            outdoor_swing_f: 0.0,
            day_secs: 600,
            indoor_gain: 0.0,
            ventilation: 0.5,
            leakage: 0.0,
        }
    }

    #[test]
    fn test_board_drives_sash() {
        let plant = Plant::shared(&climate(), 100, 180);
        let mut board = board(&plant);

        board.set_direction(Direction::Open);
        board.set_enable(true);
        for _ in 0..10 {
            board.step_motor(true);
            board.step_motor(false);
        }
        board.release_motor();
        board.step_motor(true);

        assert_eq!(plant.borrow().travel, 10);
        assert_eq!(plant.borrow().force(), 0);
    }

    #[test]
    fn test_buttons_read_through_active_low_inputs() {
        let plant = Plant::shared(&climate(), 100, 180);
        let mut board = board(&plant);

        assert!(!board.read_digital(Input::StopButton));
        plant.borrow_mut().press(Input::StopButton, true);
        assert!(board.read_digital(Input::StopButton));
        assert!(!board.read_digital(Input::Limit));
    }

    #[test]
    fn test_thermometer_round_trips_through_scratchpad() {
        assert_eq!(scratchpad_to_fahrenheit(fahrenheit_to_scratchpad(77.0)), Ok(77));
        assert_eq!(scratchpad_to_fahrenheit(fahrenheit_to_scratchpad(14.0)), Ok(14));
    }

    #[test]
    fn test_open_window_pulls_indoor_towards_outdoor() {
        let plant = Plant::shared(&climate(), 100, 180);
        plant.borrow_mut().travel = 100;

        plant.borrow_mut().advance_climate(60.0);
        let indoor = plant.borrow().indoor_f;
        assert!(indoor < 70.0 && indoor > 60.0, "indoor {indoor}");
    }
}
