use parking_lot::RwLock;

use super::settings_store::SettingsStore;
use crate::models::config::{clamp_peak_threshold, clamp_poll_interval, WatcherSettings};
use crate::traits::settings_provider::SettingsProvider;

/// Thread-safe settings shared between the control surface and the
/// sampling loop.
///
/// Every setter clamps its input and, when backed by a [`SettingsStore`],
/// persists the result. A failed save is logged; the new value still
/// applies in memory.
pub struct SharedSettings {
    inner: RwLock<WatcherSettings>,
    store: Option<SettingsStore>,
}

impl SharedSettings {
    /// Load from `store`, creating the file if needed.
    pub fn load(store: SettingsStore) -> Self {
        let settings = store.load_or_init();
        Self {
            inner: RwLock::new(settings),
            store: Some(store),
        }
    }

    /// Settings that are never written to disk.
    pub fn in_memory(settings: WatcherSettings) -> Self {
        Self {
            inner: RwLock::new(settings.sanitized()),
            store: None,
        }
    }

    pub fn snapshot(&self) -> WatcherSettings {
        self.inner.read().clone()
    }

    pub fn set_peak_threshold(&self, threshold: f64) {
        self.update(|s| s.peak_threshold = clamp_peak_threshold(threshold));
    }

    pub fn set_poll_interval_ms(&self, ms: u32) {
        self.update(|s| s.poll_interval_ms = clamp_poll_interval(ms));
    }

    pub fn set_beep_on_mute(&self, enabled: bool) {
        self.update(|s| s.beep_on_mute = enabled);
    }

    pub fn set_auto_start(&self, enabled: bool) {
        self.update(|s| s.auto_start = enabled);
    }

    pub fn set_device_id(&self, id: impl Into<String>) {
        let id = id.into();
        self.update(|s| s.device_id = id);
    }

    pub fn beep_on_mute(&self) -> bool {
        self.inner.read().beep_on_mute
    }

    pub fn device_id(&self) -> String {
        self.inner.read().device_id.clone()
    }

    fn update(&self, apply: impl FnOnce(&mut WatcherSettings)) {
        let snapshot = {
            let mut settings = self.inner.write();
            apply(&mut settings);
            settings.clone()
        };

        if let Some(ref store) = self.store {
            if let Err(e) = store.save(&snapshot) {
                log::error!("Error saving settings, changes will not be saved: {}", e);
            }
        }
    }
}

impl SettingsProvider for SharedSettings {
    fn poll_interval_ms(&self) -> u32 {
        self.inner.read().poll_interval_ms
    }

    fn peak_threshold(&self) -> f64 {
        self.inner.read().peak_threshold
    }

    fn auto_start(&self) -> bool {
        self.inner.read().auto_start
    }
}
