/// Linear speed ramp: the half-step delay shrinks by one microsecond per
/// half-step until it reaches the floor, so the motor starts slow and
/// accelerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedRamp {
    wait_us: u32,
    floor_us: u32,
}

impl SpeedRamp {
    pub fn new(start_us: u32, floor_us: u32) -> Self {
        Self {
            wait_us: start_us.max(floor_us),
            floor_us,
        }
    }

    /// Returns the delay for the coming half-step and accelerates.
    pub fn next_wait(&mut self) -> u32 {
        let wait = self.wait_us;
        if self.wait_us > self.floor_us {
            self.wait_us -= 1;
        }
        wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_reaches_floor() {
        let mut ramp = SpeedRamp::new(1000, 300);

        assert_eq!(ramp.next_wait(), 1000);
        assert_eq!(ramp.next_wait(), 999);

        for _ in 0..2000 {
            ramp.next_wait();
        }
        assert_eq!(ramp.next_wait(), 300);
        assert_eq!(ramp.next_wait(), 300);
    }

    #[test]
    fn test_start_below_floor_clamps() {
        let mut ramp = SpeedRamp::new(100, 400);
        assert_eq!(ramp.next_wait(), 400);
        assert_eq!(ramp.next_wait(), 400);
    }
}
