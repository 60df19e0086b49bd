use embassy_time::Duration;

/// How a motion is executed once the motor task picks up a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    /// Run the whole travel inside one motor tick
    Blocking,
    /// Advance at most this many half-steps per motor tick so the other tasks
    /// keep their periods while the window moves
    Incremental { half_steps_per_tick: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskPeriods {
    pub radio: Duration,
    pub motor: Duration,
    pub auto: Duration,
    pub manual: Duration,
    pub fault: Duration,
    pub sampler: Duration,
}

impl Default for TaskPeriods {
    fn default() -> Self {
        Self {
            radio: Duration::from_millis(500),
            motor: Duration::from_millis(100),
            auto: Duration::from_millis(1000),
            manual: Duration::from_millis(50),
            // Blinks at the base rate
            fault: Duration::from_millis(50),
            sampler: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Full revolutions between closed and open
    pub rev_open: u8,
    pub steps_per_rev: u16,
    /// Half-step delay at the start of every motion (µs)
    pub ramp_start_us: u32,
    pub open_floor_us: u32,
    pub close_floor_us: u32,
    /// Force reading treated as contact/obstruction
    pub force_threshold: u16,
    /// Seating half-steps allowed at the closed end before the force sensor is
    /// declared faulty. Empirical value, tune per installation.
    pub stall_bound: u16,
    /// Transport retransmission count meaning the peer did not answer
    pub max_retransmissions: u8,
    pub nudge_revolutions: u8,
    /// Manual ticks a button must be held to request full travel
    pub hold_ticks: u8,
    pub motion_mode: MotionMode,
    pub periods: TaskPeriods,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rev_open: 10,
            steps_per_rev: 200,
            ramp_start_us: 1000,
            open_floor_us: 300,
            close_floor_us: 400,
            force_threshold: 100,
            stall_bound: 400,
            max_retransmissions: 15,
            nudge_revolutions: 1,
            hold_ticks: 10,
            motion_mode: MotionMode::Blocking,
            periods: TaskPeriods::default(),
        }
    }
}
