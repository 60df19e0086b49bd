use ventsync_api::{AutoConfig, Command, TemperatureReading, WindowStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoState {
    #[default]
    Off,
    On,
}

impl From<&AutoConfig> for AutoState {
    fn from(config: &AutoConfig) -> Self {
        if config.enabled { Self::On } else { Self::Off }
    }
}

/// Threshold decision for automatic mode. `status` must be a settled window
/// state; anything moving or unknown yields no command.
pub fn decide(
    status: WindowStatus,
    reading: TemperatureReading,
    config: &AutoConfig,
) -> Option<Command> {
    let TemperatureReading { indoor, outdoor } = reading;

    match status {
        WindowStatus::Closed if indoor > config.max && outdoor < config.max => {
            Some(Command::OpenAll)
        }
        status
            if status.is_open()
                && (indoor < config.min || (indoor > config.max && outdoor > config.max)) =>
        {
            Some(Command::CloseAll)
        }
        _ => None,
    }
}
