use serde::{Deserialize, Serialize};

/// Latest indoor/outdoor temperatures in whole degrees Fahrenheit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub indoor: i8,
    pub outdoor: i8,
}

impl TemperatureReading {
    pub fn new(indoor: i8, outdoor: i8) -> Self {
        Self { indoor, outdoor }
    }
}

/// Automatic-mode thresholds, configured by the remote node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoConfig {
    pub enabled: bool,
    /// Open above this indoor temperature
    pub max: i8,
    /// Close below this indoor temperature
    pub min: i8,
}

impl Default for AutoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max: 80,
            min: 63,
        }
    }
}
