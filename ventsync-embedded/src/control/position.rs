/// Tracked window travel, counted in half-step pulses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub revolutions: u8,
    /// Pulses into the current revolution, `0..steps_per_rev`
    pub steps: u16,
}

impl Position {
    pub const CLOSED: Self = Self {
        revolutions: 0,
        steps: 0,
    };

    pub fn fully_open(rev_open: u8) -> Self {
        Self {
            revolutions: rev_open,
            steps: 0,
        }
    }

    pub fn pulses(&self, steps_per_rev: u16) -> u32 {
        u32::from(self.revolutions) * u32::from(steps_per_rev) + u32::from(self.steps)
    }

    pub fn is_closed(&self) -> bool {
        *self == Self::CLOSED
    }

    pub fn is_open(&self, rev_open: u8) -> bool {
        self.revolutions >= rev_open
    }

    pub fn advance(&mut self, steps_per_rev: u16) {
        self.steps += 1;
        if self.steps >= steps_per_rev {
            self.steps = 0;
            self.revolutions = self.revolutions.saturating_add(1);
        }
    }

    pub fn retreat(&mut self, steps_per_rev: u16) {
        if self.steps > 0 {
            self.steps -= 1;
        } else if self.revolutions > 0 {
            self.revolutions -= 1;
            self.steps = steps_per_rev.saturating_sub(1);
        }
    }
}
