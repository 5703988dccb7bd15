use std::sync::Arc;

use volume_watcher_core::{MuteEvent, SharedSettings, WatchDelegate, WatchError, WatcherState};

/// Audible alert hook, called after a mute when beeping is enabled.
pub type Alert = Box<dyn Fn() + Send + Sync>;

/// Prints watcher events to the console.
pub struct ConsoleDelegate {
    settings: Arc<SharedSettings>,
    alert: Alert,
}

impl ConsoleDelegate {
    pub fn new(settings: Arc<SharedSettings>, alert: Alert) -> Arc<Self> {
        Arc::new(Self { settings, alert })
    }
}

impl WatchDelegate for ConsoleDelegate {
    fn on_session_muted(&self, event: &MuteEvent) {
        println!("{}", format_mute_event(event));
        if self.settings.beep_on_mute() {
            (self.alert)();
        }
    }

    fn on_state_changed(&self, state: &WatcherState) {
        println!("Session Watcher is {}", state);
    }

    fn on_error(&self, error: &WatchError) {
        eprintln!("Session Watcher stopped: {}", error);
        if error.is_device_lost() {
            eprintln!("Pick another device with \"cd\" and start again with \"tp\"");
        }
    }
}

pub fn format_mute_event(event: &MuteEvent) -> String {
    format!(
        "\n{}\nMuted \"{}\" at\n{:.2} dB\n{:.2} Peak Volume\n",
        event.timestamp.format("%Y-%m-%d %H:%M:%S"),
        event.process_label,
        event.db,
        event.peak
    )
}
