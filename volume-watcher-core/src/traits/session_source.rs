use crossbeam_channel::Sender;

use crate::models::audio_models::{AudioDevice, SessionOwner};
use crate::models::error::WatchError;

/// Message pushed by a [`SessionSource`] when its device reports a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionsChanged;

/// Handle to one audio session on the watched device.
///
/// A handle is a snapshot: it becomes stale once the registry reloads.
/// Dropping it releases the underlying OS objects.
pub trait AudioSession: Send {
    fn owner(&self) -> SessionOwner;

    /// Instantaneous meter peak, nominally 0.0–1.0.
    fn peak(&self) -> Result<f32, WatchError>;

    /// The session's own volume scalar, 0.0–1.0.
    fn volume(&self) -> Result<f32, WatchError>;

    fn is_muted(&self) -> Result<bool, WatchError>;

    fn set_muted(&self, muted: bool) -> Result<(), WatchError>;
}

/// Platform access to the sessions of a single output device.
///
/// Implemented by `WasapiSessionSource` on Windows.
pub trait SessionSource: Send + Sync {
    /// The device this source enumerates.
    fn device(&self) -> AudioDevice;

    /// Enumerate the device's current sessions in platform order.
    ///
    /// Fails with [`WatchError::DeviceUnavailable`] if the device is gone.
    fn enumerate_sessions(&self) -> Result<Vec<Box<dyn AudioSession>>, WatchError>;

    /// Arrange for a [`SessionsChanged`] message on every new session.
    ///
    /// The subscription lasts as long as the source.
    fn subscribe(&self, notify: Sender<SessionsChanged>) -> Result<(), WatchError>;
}
