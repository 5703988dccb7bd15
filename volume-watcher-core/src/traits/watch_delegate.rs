use crate::models::error::WatchError;
use crate::models::mute_event::MuteEvent;
use crate::models::state::WatcherState;

/// Event delegate for watcher notifications.
///
/// `on_session_muted` and `on_error` are called from the sampling thread;
/// `on_state_changed` from whichever thread drives the controller.
/// Implementations should return quickly.
pub trait WatchDelegate: Send + Sync {
    /// Called after a session crossed the threshold and was muted.
    fn on_session_muted(&self, event: &MuteEvent);

    /// Called when the watcher starts or stops.
    fn on_state_changed(&self, state: &WatcherState);

    /// Called when the sampling loop terminates on an unrecoverable error.
    fn on_error(&self, error: &WatchError);
}
