use ventsync_api::Command;

/// Local push-button state machine.
///
/// A short press nudges the window; holding a button for `hold_ticks` manual
/// ticks requests full travel. After full travel the buttons must be released
/// before the next press counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManualState {
    #[default]
    Wait,
    Open(u8),
    Close(u8),
    /// Full travel requested, waiting for the motor to take it
    All,
    Press,
}

impl ManualState {
    /// `motor_idle` is true once the slot is empty and nothing is moving.
    pub fn next(
        self,
        open_pressed: bool,
        close_pressed: bool,
        motor_idle: bool,
        hold_ticks: u8,
    ) -> (Self, Option<Command>) {
        match self {
            Self::Wait if open_pressed => (Self::Open(0), None),
            Self::Wait if close_pressed => (Self::Close(0), None),
            Self::Wait => (Self::Wait, None),
            Self::Open(held) => Self::held(held, open_pressed, hold_ticks, Self::Open, Command::Open),
            Self::Close(held) => {
                Self::held(held, close_pressed, hold_ticks, Self::Close, Command::Close)
            }
            Self::All if motor_idle => (Self::Press, None),
            Self::All => (Self::All, None),
            Self::Press if !open_pressed && !close_pressed => (Self::Wait, None),
            Self::Press => (Self::Press, None),
        }
    }

    fn held(
        held: u8,
        pressed: bool,
        hold_ticks: u8,
        holding: fn(u8) -> Self,
        nudge: Command,
    ) -> (Self, Option<Command>) {
        if !pressed {
            return (Self::Wait, Some(nudge));
        }

        let held = held.saturating_add(1);
        if held >= hold_ticks {
            let full = if nudge.is_opening() {
                Command::OpenAll
            } else {
                Command::CloseAll
            };
            (Self::All, Some(full))
        } else {
            (holding(held), None)
        }
    }
}
