use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::models::config::WatcherSettings;
use crate::models::error::WatchError;

/// File name used next to the executable.
pub const SETTINGS_FILE_NAME: &str = "vwconfig.json";

/// JSON file persistence for [`WatcherSettings`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `vwconfig.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings file, creating it with defaults if it is missing.
    ///
    /// A file that cannot be parsed is replaced by defaults. A file that
    /// cannot be read for any other reason is left alone and temporary
    /// defaults are returned.
    pub fn load_or_init(&self) -> WatcherSettings {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {}, writing defaults", self.path.display());
                return self.reset();
            }
            Err(e) => {
                log::error!(
                    "Failed to read settings from {}, using temporary defaults: {}",
                    self.path.display(),
                    e
                );
                return WatcherSettings::default();
            }
        };

        match serde_json::from_str::<WatcherSettings>(&json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::error!(
                    "Couldn't parse settings file {}, replacing it with defaults: {}",
                    self.path.display(),
                    e
                );
                self.reset()
            }
        }
    }

    /// Write settings as pretty JSON.
    pub fn save(&self, settings: &WatcherSettings) -> Result<(), WatchError> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| WatchError::StorageError(format!("failed to serialize settings: {}", e)))?;
        fs::write(&self.path, json)
            .map_err(|e| WatchError::StorageError(format!("failed to write settings: {}", e)))?;
        Ok(())
    }

    fn reset(&self) -> WatcherSettings {
        let settings = WatcherSettings::default();
        if let Err(e) = self.save(&settings) {
            log::error!("Error saving settings, changes will not be saved: {}", e);
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());

        let settings = store.load_or_init();

        assert_eq!(settings, WatcherSettings::default());
        assert!(store.path().exists());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        let saved = WatcherSettings {
            poll_interval_ms: 25,
            peak_threshold: 0.3,
            beep_on_mute: false,
            auto_start: true,
            device_id: "speakers".into(),
            ..Default::default()
        };

        store.save(&saved).unwrap();

        assert_eq!(store.load_or_init(), saved);
    }

    #[test]
    fn written_file_uses_config_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        store.save(&WatcherSettings::default()).unwrap();

        let json = fs::read_to_string(store.path()).unwrap();
        assert!(json.contains("\"PollingRate\": 100"));
        assert!(json.contains("\"PeakVolumeThreshold\": 1.0"));
        assert!(json.contains("\"DeviceID\": \"\""));
    }

    #[test]
    fn unknown_keys_survive_a_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        fs::write(
            store.path(),
            r#"{"PollingRate": 50, "UseStartWithWindows": true, "UseHiddenConsole": false}"#,
        )
        .unwrap();

        let mut settings = store.load_or_init();
        settings.peak_threshold = 0.4;
        store.save(&settings).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(json["UseStartWithWindows"], serde_json::Value::Bool(true));
        assert_eq!(json["UseHiddenConsole"], serde_json::Value::Bool(false));
        assert_eq!(json["PeakVolumeThreshold"], serde_json::json!(0.4));
        assert_eq!(json["PollingRate"], serde_json::json!(50));
    }

    #[test]
    fn corrupt_file_is_replaced_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        fs::write(store.path(), "{ not json").unwrap();

        let settings = store.load_or_init();

        assert_eq!(settings, WatcherSettings::default());
        let rewritten = fs::read_to_string(store.path()).unwrap();
        assert!(serde_json::from_str::<WatcherSettings>(&rewritten).is_ok());
    }

    #[test]
    fn out_of_range_values_are_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        fs::write(
            store.path(),
            r#"{"PollingRate": 1, "PeakVolumeThreshold": 9.0}"#,
        )
        .unwrap();

        let settings = store.load_or_init();

        assert_eq!(settings.poll_interval_ms, 5);
        assert_eq!(settings.peak_threshold, 1.0);
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nope").join(SETTINGS_FILE_NAME));

        let err = store.save(&WatcherSettings::default()).unwrap_err();
        assert!(matches!(err, WatchError::StorageError(_)));
    }
}
