use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Status byte outside the shared status/command numbering
    UnknownStatus(u8),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStatus(code) => write!(f, "Unknown status code: {}", code),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FrameError {}

pub type Result<T> = core::result::Result<T, FrameError>;
