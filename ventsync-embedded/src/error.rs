use core::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    SensorUnavailable,
    SensorReadingOutOfRange,
    SchedulerFull,
    InvalidPeriod,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SensorUnavailable => write!(f, "Sensor unavailable"),
            Error::SensorReadingOutOfRange => write!(f, "Sensor reading out of valid range"),
            Error::SchedulerFull => write!(f, "Scheduler task table full"),
            Error::InvalidPeriod => write!(f, "Task period must be non-zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
