use thiserror::Error;

/// Errors raised by the volume watcher core and its platform backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WatchError {
    /// The monitored device disappeared or could not be enumerated.
    #[error("device not available: {0}")]
    DeviceUnavailable(String),

    /// A single session could not be read this tick.
    #[error("session access failed: {0}")]
    SessionAccess(String),

    #[error("configuration out of range: {0}")]
    ConfigurationOutOfRange(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl WatchError {
    /// Whether this error means the device itself is gone, as opposed to
    /// one session being unreadable.
    pub fn is_device_lost(&self) -> bool {
        matches!(self, Self::DeviceUnavailable(_))
    }
}
