use std::collections::VecDeque;

use ventsync_api::FRAME_LEN;
use ventsync_embedded::{Channel, Direction, Error, Input, RadioTransport, Result, WindowHal};

/// Force reported once the sash sits on the frame
pub const CONTACT_FORCE: u16 = 150;

/// Window board with a perfectly tracking motor and a sash that touches the
/// frame at the closed stop.
#[derive(Debug)]
pub struct SimHal {
    /// Physical travel in pulses from the closed stop
    pub plant: i64,
    pub direction: Direction,
    pub enabled: bool,
    pub pulses: u32,
    pub stepped_while_disabled: bool,
    /// `false` simulates a dead force sensor that never sees contact
    pub seat_sensing: bool,
    pub force_override: Option<u16>,
    /// Sash meets an obstacle at this travel while closing
    pub obstruction_at: Option<i64>,
    pub indoor: Option<i8>,
    pub outdoor: Option<i8>,
    pub open_button: bool,
    pub close_button: bool,
    pub stop_button: bool,
    pub limit: bool,
    pub fault_reset: bool,
    /// Stop button reads pressed once this many pulses have been driven
    pub stop_after_pulses: Option<u32>,
    pub indicator: Vec<bool>,
    pub delayed_us: u64,
}

impl SimHal {
    pub fn new() -> Self {
        Self {
            plant: 0,
            direction: Direction::Close,
            enabled: false,
            pulses: 0,
            stepped_while_disabled: false,
            seat_sensing: true,
            force_override: None,
            obstruction_at: None,
            indoor: Some(70),
            outdoor: Some(65),
            open_button: false,
            close_button: false,
            stop_button: false,
            limit: false,
            fault_reset: false,
            stop_after_pulses: None,
            indicator: Vec::new(),
            delayed_us: 0,
        }
    }
}

impl WindowHal for SimHal {
    fn read_temperature(&mut self, channel: Channel) -> Result<i8> {
        let value = match channel {
            Channel::Indoor => self.indoor,
            Channel::Outdoor => self.outdoor,
        };
        value.ok_or(Error::SensorUnavailable)
    }

    fn read_force(&mut self) -> u16 {
        if let Some(force) = self.force_override {
            return force;
        }
        let blocked = self.obstruction_at.is_some_and(|at| self.plant <= at);
        if blocked || (self.seat_sensing && self.plant <= 0) {
            CONTACT_FORCE
        } else {
            0
        }
    }

    fn step_motor(&mut self, level: bool) {
        if !level {
            return;
        }
        if !self.enabled {
            self.stepped_while_disabled = true;
            return;
        }

        self.pulses += 1;
        self.plant += match self.direction {
            Direction::Open => 1,
            Direction::Close => -1,
        };
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn set_enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn read_digital(&mut self, input: Input) -> bool {
        match input {
            Input::OpenButton => self.open_button,
            Input::CloseButton => self.close_button,
            Input::StopButton => {
                self.stop_button || self.stop_after_pulses.is_some_and(|n| self.pulses >= n)
            }
            Input::Limit => self.limit,
            Input::FaultReset => self.fault_reset,
        }
    }

    fn write_indicator(&mut self, on: bool) {
        self.indicator.push(on);
    }

    fn delay_us(&mut self, us: u32) {
        self.delayed_us += u64::from(us);
    }
}

/// Radio whose acknowledgements and incoming traffic are set by the test.
#[derive(Debug, Default)]
pub struct ScriptedRadio {
    pub inbox: VecDeque<[u8; FRAME_LEN]>,
    pub sent: Vec<[u8; FRAME_LEN]>,
    /// Retransmissions reported for every transmit
    pub retries: u8,
    pub receive_mode_resumed: usize,
    polls: u32,
    scheduled: Option<(u32, [u8; FRAME_LEN])>,
}

impl ScriptedRadio {
    /// Delivers `frame` once `data_ready` has been polled `polls` more times.
    pub fn deliver_after(&mut self, polls: u32, frame: [u8; FRAME_LEN]) {
        self.scheduled = Some((self.polls + polls, frame));
    }

    pub fn last_sent(&self) -> Option<[u8; FRAME_LEN]> {
        self.sent.last().copied()
    }
}

impl RadioTransport for ScriptedRadio {
    fn transmit(&mut self, payload: &[u8; FRAME_LEN]) {
        self.sent.push(*payload);
    }

    fn data_ready(&mut self) -> bool {
        self.polls += 1;
        if let Some((due, frame)) = self.scheduled {
            if self.polls >= due {
                self.inbox.push_back(frame);
                self.scheduled = None;
            }
        }
        !self.inbox.is_empty()
    }

    fn receive(&mut self, payload: &mut [u8; FRAME_LEN]) {
        if let Some(frame) = self.inbox.pop_front() {
            *payload = frame;
        }
    }

    fn retransmission_count(&mut self) -> u8 {
        self.retries
    }

    fn resume_receive_mode(&mut self) {
        self.receive_mode_resumed += 1;
    }
}
