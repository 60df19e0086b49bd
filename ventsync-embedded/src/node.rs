//! The window node: every piece of window state in one owned aggregate,
//! handed to each scheduled task by `&mut`.

use log::{debug, error, info, warn};
use ventsync_api::{
    AutoConfig, Command, PeerCommand, RadioFrame, ReportedStatus, StatusReport, WindowStatus,
};

use crate::config::{MotionMode, NodeConfig};
use crate::control::{
    AutoState, CommandSource, Energized, FaultState, ManualState, Motion, MotionOutcome,
    MotorController, Position, SharedState, decide,
};
use crate::error::Result;
use crate::hal::{Channel, Input, WindowHal};
use crate::radio::{Delivery, RadioSession, RadioTransport};
use crate::scheduler::Scheduler;
use crate::tasks;

pub struct WindowNode<H, R>
where
    H: WindowHal,
    R: RadioTransport,
{
    hal: H,
    radio: RadioSession<R>,
    motor: MotorController,
    shared: SharedState,
    config: NodeConfig,
}

impl<H, R> WindowNode<H, R>
where
    H: WindowHal,
    R: RadioTransport,
{
    /// Starts closed, at position zero, with automatic mode off.
    pub fn new(hal: H, transport: R, config: NodeConfig) -> Self {
        Self {
            hal,
            radio: RadioSession::new(transport, config.max_retransmissions),
            motor: MotorController::new(),
            shared: SharedState::default(),
            config,
        }
    }

    /// Scheduler with the six window tasks registered at their configured
    /// periods.
    pub fn scheduler(&self) -> Result<Scheduler<Self>>
    where
        H: 'static,
        R: 'static,
    {
        let periods = self.config.periods;
        let mut scheduler = Scheduler::new();

        scheduler.add_state_task("radio", periods.radio, (), tasks::radio)?;
        scheduler.add_state_task("motor", periods.motor, (), tasks::motor)?;
        scheduler.add_state_task("auto", periods.auto, AutoState::Off, tasks::auto)?;
        scheduler.add_state_task("manual", periods.manual, ManualState::Wait, tasks::manual)?;
        scheduler.add_state_task("fault", periods.fault, FaultState::Clear, tasks::fault)?;
        scheduler.add_state_task("sampler", periods.sampler, (), tasks::sampler)?;

        Ok(scheduler)
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    pub fn radio(&self) -> &RadioSession<R> {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut RadioSession<R> {
        &mut self.radio
    }

    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    pub fn shared_mut(&mut self) -> &mut SharedState {
        &mut self.shared
    }

    pub fn status(&self) -> WindowStatus {
        self.shared.status
    }

    pub fn position(&self) -> Position {
        self.motor.position()
    }

    pub fn is_moving(&self) -> bool {
        self.motor.is_moving()
    }

    /// Queues a motor command. A manual command also switches automatic
    /// mode off.
    pub fn submit(&mut self, command: Command, source: CommandSource) -> bool {
        if source == CommandSource::Manual && self.shared.auto.enabled {
            self.shared.auto.enabled = false;
            info!("Manual override, automatic mode off");
        }

        debug!("{:?} requested {:?}", source, command);
        self.shared.pending.submit(command, source)
    }

    /// Acts on a frame from the remote node. While automatic mode is on, a
    /// manual open/close only switches it off.
    pub fn handle_peer(&mut self, frame: &RadioFrame) {
        let Some(command) = PeerCommand::decode(frame) else {
            debug!("Ignoring frame with code {}", frame.code);
            return;
        };

        match command {
            command if command.is_manual() && self.shared.auto.enabled => {
                self.shared.auto.enabled = false;
                info!("Peer {:?} overrides automatic mode, now off", command);
            }
            PeerCommand::Open => {
                self.submit(Command::OpenAll, CommandSource::Peer);
            }
            PeerCommand::Close => {
                self.submit(Command::CloseAll, CommandSource::Peer);
            }
            PeerCommand::ConfigureAuto { max, min } => {
                self.shared.auto = AutoConfig {
                    enabled: true,
                    max,
                    min,
                };
                info!("Automatic mode on, open above {}F, close below {}F", max, min);
            }
        }
    }

    /// Where the window rests judging by position alone.
    fn resting_status(&self) -> WindowStatus {
        let position = self.motor.position();
        if position.is_closed() {
            WindowStatus::Closed
        } else if position.is_open(self.config.rev_open) {
            WindowStatus::Open
        } else {
            WindowStatus::OpenPartial
        }
    }

    /// Status frame as the remote node sees it. A latched fault hides the
    /// window state; partial and link-lost states are reported by position.
    pub fn status_report(&self) -> StatusReport {
        let status = if self.shared.force_fault {
            ReportedStatus::Fault
        } else {
            let window = match self.shared.status {
                WindowStatus::NoConnection | WindowStatus::OpenPartial => {
                    if self.motor.position().is_closed() {
                        WindowStatus::Closed
                    } else {
                        WindowStatus::Open
                    }
                }
                status => status,
            };
            ReportedStatus::Window(window)
        };

        StatusReport {
            reading: self.shared.reading,
            status,
            auto: self.shared.auto.enabled,
        }
    }

    pub fn send_status(&mut self) -> Delivery {
        let frame = self.status_report().encode();
        self.radio.send_and_confirm(&frame)
    }

    /// Opens fully and returns once the travel has ended.
    pub fn open(&mut self) {
        self.execute(Command::OpenAll);
    }

    /// Closes fully and returns once the travel has ended.
    pub fn close(&mut self) {
        self.execute(Command::CloseAll);
    }

    /// Runs `command` to its end, whatever the configured motion mode.
    pub fn execute(&mut self, command: Command) {
        if self.begin(command) {
            let outcome = self.advance_motion(None);
            self.finish(outcome);
        }
    }

    /// Ends the motion in flight as a cancellation.
    pub fn stop(&mut self) {
        if self.motor.cancel().is_some() {
            self.finish(MotionOutcome::Cancelled);
        }
    }

    /// Plans `command` and reports the motion as started. Returns `false`
    /// when nothing needs to move.
    pub fn begin(&mut self, command: Command) -> bool {
        if command == Command::Stop {
            self.stop();
            return false;
        }

        if command.is_closing()
            && !self.motor.position().is_closed()
            && !self.shared.force_fault
            && self.hal.read_force() >= self.config.force_threshold
        {
            info!("Force already at threshold, treating window as closed");
            self.motor.reset_closed();
            self.shared.status = WindowStatus::Closed;
            self.send_status();
            return false;
        }

        if !self
            .motor
            .start(command, !self.shared.force_fault, &self.config)
        {
            debug!("{:?} needs no motion at {:?}", command, self.motor.position());
            return false;
        }

        self.shared.status = if command.is_opening() {
            WindowStatus::Opening
        } else {
            WindowStatus::Closing
        };
        info!("{:?} from {:?}", command, self.motor.position());
        self.send_status();
        true
    }

    /// Steps the motion in flight until it ends or `budget` half-steps have
    /// run. The driver is released before returning.
    pub fn advance_motion(&mut self, budget: Option<u16>) -> MotionOutcome {
        let Some(direction) = self.motor.motion().map(Motion::direction) else {
            return MotionOutcome::Completed;
        };

        let mut driver = Energized::new(&mut self.hal, direction);
        let mut taken: u32 = 0;
        loop {
            let peer_pending = self.radio.data_ready();
            let outcome = self.motor.step(&mut driver, peer_pending, &self.config);
            if outcome != MotionOutcome::Running {
                return outcome;
            }

            taken += 1;
            if budget.is_some_and(|limit| taken >= u32::from(limit)) {
                return MotionOutcome::Running;
            }
        }
    }

    /// Settles status after a motion and reports it.
    pub fn finish(&mut self, outcome: MotionOutcome) {
        let status = match outcome {
            MotionOutcome::Running => return,
            MotionOutcome::Stalled => {
                self.shared.force_fault = true;
                error!(
                    "No contact within {} half-steps of the closed end, force sensor fault latched",
                    self.config.stall_bound
                );
                WindowStatus::Closed
            }
            MotionOutcome::Obstructed => {
                warn!("Obstruction at {:?}", self.motor.position());
                self.resting_status()
            }
            MotionOutcome::Cancelled => {
                info!("Motion cancelled at {:?}", self.motor.position());
                self.resting_status()
            }
            MotionOutcome::Completed => self.resting_status(),
        };

        self.shared.status = status;
        self.send_status();
    }

    /// Motor task body: takes the pending command and moves the window.
    pub fn run_motor(&mut self) {
        if let Some(command) = self.shared.pending.take() {
            if self.motor.is_moving() {
                self.stop();
            }

            match self.config.motion_mode {
                MotionMode::Blocking => {
                    self.execute(command);
                    return;
                }
                MotionMode::Incremental { .. } => {
                    if !self.begin(command) {
                        return;
                    }
                }
            }
        }

        if let MotionMode::Incremental { half_steps_per_tick } = self.config.motion_mode {
            if self.motor.is_moving() {
                let outcome = self.advance_motion(Some(half_steps_per_tick));
                self.finish(outcome);
            }
        }
    }

    /// Radio task body: handles one incoming frame, then reports status.
    pub fn radio_cycle(&mut self) -> Delivery {
        if let Some(frame) = self.radio.poll_incoming() {
            self.handle_peer(&frame);
        }

        let delivery = self.send_status();
        match delivery {
            Delivery::PeerUnreachable
                if !self.motor.is_moving() && self.shared.status != WindowStatus::NoConnection =>
            {
                self.shared.status = WindowStatus::NoConnection;
            }
            Delivery::Delivered if self.shared.status == WindowStatus::NoConnection => {
                self.shared.status = self.resting_status();
            }
            _ => {}
        }
        delivery
    }

    /// Automatic-mode task body.
    pub fn auto_cycle(&mut self, state: AutoState) -> AutoState {
        let next = AutoState::from(&self.shared.auto);
        if next != state {
            info!("Automatic mode {:?}", next);
        }

        if next == AutoState::On && !self.motor.is_moving() {
            let status = match self.shared.status {
                WindowStatus::NoConnection => self.resting_status(),
                status => status,
            };
            if let Some(command) = decide(status, self.shared.reading, &self.shared.auto) {
                self.submit(command, CommandSource::Auto);
            }
        }
        next
    }

    /// Push-button task body.
    pub fn manual_cycle(&mut self, state: ManualState) -> ManualState {
        let open = self.hal.read_digital(Input::OpenButton);
        let close = self.hal.read_digital(Input::CloseButton);
        let motor_idle = self.shared.pending.is_empty() && !self.motor.is_moving();

        let (next, command) = state.next(open, close, motor_idle, self.config.hold_ticks);
        if let Some(command) = command {
            self.submit(command, CommandSource::Manual);
        }
        next
    }

    /// Fault-indicator task body. The reset input clears the latch.
    pub fn fault_cycle(&mut self, state: FaultState) -> FaultState {
        if self.shared.force_fault && self.hal.read_digital(Input::FaultReset) {
            self.shared.force_fault = false;
            info!("Force fault cleared");
        }

        let (next, lit) = state.next(self.shared.force_fault);
        self.hal.write_indicator(lit);
        next
    }

    /// Sampler task body. A failed read keeps the previous value.
    pub fn sample(&mut self) {
        match self.hal.read_temperature(Channel::Indoor) {
            Ok(value) => self.shared.reading.indoor = value,
            Err(e) => warn!("Indoor temperature read failed: {}", e),
        }
        match self.hal.read_temperature(Channel::Outdoor) {
            Ok(value) => self.shared.reading.outdoor = value,
            Err(e) => warn!("Outdoor temperature read failed: {}", e),
        }
    }
}
