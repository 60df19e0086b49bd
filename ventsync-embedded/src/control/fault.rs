/// Fault indicator: blinks while the force-fault latch is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaultState {
    #[default]
    Clear,
    Blink { lit: bool },
}

impl FaultState {
    /// Returns the next state and the indicator level to drive.
    pub fn next(self, latched: bool) -> (Self, bool) {
        match (self, latched) {
            (_, false) => (Self::Clear, false),
            (Self::Clear, true) => (Self::Blink { lit: true }, true),
            (Self::Blink { lit }, true) => (Self::Blink { lit: !lit }, !lit),
        }
    }
}
