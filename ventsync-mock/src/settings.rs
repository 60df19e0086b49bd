use std::error::Error;

use serde::{Deserialize, Serialize};
use ventsync_embedded::{MotionMode, NodeConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    /// Simulated run length
    pub duration_secs: u64,
    /// Wall-clock pause between scheduler ticks, 0 runs flat out
    pub tick_interval_ms: u64,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Radio {
    /// Chance that a single transmission attempt is lost
    pub loss: f64,
    pub max_retransmissions: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Climate {
    pub indoor_start_f: f32,
    pub outdoor_mean_f: f32,
    pub outdoor_swing_f: f32,
    /// Length of one simulated day, compressed
    pub day_secs: u64,
    /// Indoor warming from sun and occupants (°F per minute)
    pub indoor_gain: f32,
    /// Exchange rate with outside through a fully open window (per minute)
    pub ventilation: f32,
    /// Exchange rate with outside through a closed window (per minute)
    pub leakage: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub rev_open: u8,
    pub steps_per_rev: u16,
    pub force_threshold: u16,
    pub contact_force: u16,
    pub stall_bound: u16,
    pub hold_ticks: u8,
    /// Half-steps per motor tick; absent runs every motion to completion
    pub half_steps_per_tick: Option<u16>,
}

impl Node {
    pub fn config(&self, radio: &Radio) -> NodeConfig {
        NodeConfig {
            rev_open: self.rev_open,
            steps_per_rev: self.steps_per_rev,
            force_threshold: self.force_threshold,
            stall_bound: self.stall_bound,
            hold_ticks: self.hold_ticks,
            max_retransmissions: radio.max_retransmissions,
            motion_mode: match self.half_steps_per_tick {
                Some(half_steps_per_tick) => MotionMode::Incremental { half_steps_per_tick },
                None => MotionMode::Blocking,
            },
            ..NodeConfig::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Remote node enables automatic mode
    ConfigureAuto { max: i8, min: i8 },
    /// Remote node asks to open fully
    Open,
    /// Remote node asks to close fully
    Close,
    /// Hold a local button for `hold_ms` milliseconds
    PressOpen { hold_ms: u64 },
    PressClose { hold_ms: u64 },
    PressStop { hold_ms: u64 },
    /// Put an obstacle in the sash path at the given revolution
    Obstruct { revolution: u8 },
    ClearObstruction,
    ForceSensor { working: bool },
    FaultReset { hold_ms: u64 },
    /// Take the remote node off the air
    RemoteOffline,
    RemoteOnline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub at_secs: f64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub simulation: Simulation,
    pub radio: Radio,
    pub climate: Climate,
    pub node: Node,
    #[serde(default)]
    pub script: Vec<Event>,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::parse(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/default.toml"
        )))
    }

    pub fn parse(source: &str) -> Result<Self, Box<dyn Error>> {
        let mut settings: Settings = toml::from_str(source)?;
        settings
            .script
            .sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));
        Ok(settings)
    }
}
