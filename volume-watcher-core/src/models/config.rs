use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::WatchError;

pub const MIN_POLL_INTERVAL_MS: u32 = 5;
pub const MAX_POLL_INTERVAL_MS: u32 = 1000;
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;

pub const MIN_PEAK_THRESHOLD: f64 = 0.005;
pub const MAX_PEAK_THRESHOLD: f64 = 1.0;
pub const DEFAULT_PEAK_THRESHOLD: f64 = 1.0;

/// Persisted watcher configuration.
///
/// Field names on disk match the `vwconfig.json` layout. Missing fields fall
/// back to their defaults. Unknown fields are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherSettings {
    /// Time between sampling ticks in milliseconds (5–1000).
    #[serde(rename = "PollingRate")]
    pub poll_interval_ms: u32,

    /// Loudness at or above which a session is muted (0.005–1.0).
    /// 1.0 is full scale, i.e. 0 dB.
    #[serde(rename = "PeakVolumeThreshold")]
    pub peak_threshold: f64,

    /// Beep after a session is muted.
    #[serde(rename = "UseBeepOnMute")]
    pub beep_on_mute: bool,

    /// Start watching as soon as the application launches.
    #[serde(rename = "UseAutoStartSW")]
    pub auto_start: bool,

    /// Identifier of the saved output device, empty for none.
    #[serde(rename = "DeviceID")]
    pub device_id: String,

    /// Keys this crate does not use, e.g. `UseStartWithWindows`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WatcherSettings {
    /// Returns a copy with every numeric field clamped into range.
    pub fn sanitized(mut self) -> Self {
        self.poll_interval_ms = clamp_poll_interval(self.poll_interval_ms);
        self.peak_threshold = clamp_peak_threshold(self.peak_threshold);
        self
    }
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
            beep_on_mute: true,
            auto_start: false,
            device_id: String::new(),
            extra: Map::new(),
        }
    }
}

pub fn clamp_poll_interval(ms: u32) -> u32 {
    ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS)
}

/// NaN falls back to the default threshold.
pub fn clamp_peak_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        return DEFAULT_PEAK_THRESHOLD;
    }
    threshold.clamp(MIN_PEAK_THRESHOLD, MAX_PEAK_THRESHOLD)
}

/// Rejects a user-supplied poll interval outside 5–1000 ms.
pub fn validate_poll_interval(ms: u32) -> Result<u32, WatchError> {
    if (MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&ms) {
        Ok(ms)
    } else {
        Err(WatchError::ConfigurationOutOfRange(format!(
            "polling rate {} ms is outside {}..={}",
            ms, MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS
        )))
    }
}

/// Rejects a user-supplied threshold outside 0.005–1.0.
pub fn validate_peak_threshold(threshold: f64) -> Result<f64, WatchError> {
    if (MIN_PEAK_THRESHOLD..=MAX_PEAK_THRESHOLD).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(WatchError::ConfigurationOutOfRange(format!(
            "peak volume threshold {} is outside {}..={}",
            threshold, MIN_PEAK_THRESHOLD, MAX_PEAK_THRESHOLD
        )))
    }
}
