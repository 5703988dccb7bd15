//! Windows output device enumeration via the MMDevice API.
//!
//! Wraps `IMMDeviceEnumerator` to list render endpoints in every state
//! with friendly names, and to open a session source on one of them.

use windows::core::HSTRING;
use windows::Win32::Devices::FunctionDiscovery::*;
use windows::Win32::Media::Audio::*;
use windows::Win32::System::Com::*;

use volume_watcher_core::models::audio_models::{AudioDevice, DeviceState};
use volume_watcher_core::models::error::WatchError;

use crate::session_source::WasapiSessionSource;

/// Output device enumerator using the Windows MMDevice API.
pub struct DeviceEnumerator {
    enumerator: IMMDeviceEnumerator,
}

impl DeviceEnumerator {
    /// Create a new device enumerator.
    ///
    /// Requires COM to be initialized on the calling thread.
    pub fn new() -> Result<Self, WatchError> {
        unsafe {
            let enumerator: IMMDeviceEnumerator = CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
                .map_err(|e| WatchError::Unknown(format!("failed to create enumerator: {}", e)))?;
            Ok(Self { enumerator })
        }
    }

    /// List render devices in every state, active ones first.
    pub fn list_render_devices(&self) -> Result<Vec<AudioDevice>, WatchError> {
        unsafe {
            let collection = self
                .enumerator
                .EnumAudioEndpoints(eRender, DEVICE_STATEMASK_ALL)
                .map_err(|e| WatchError::DeviceUnavailable(format!("EnumAudioEndpoints failed: {}", e)))?;

            let count = collection
                .GetCount()
                .map_err(|e| WatchError::DeviceUnavailable(format!("GetCount failed: {}", e)))?;

            let default_id = self.default_render_device_id().ok();

            let mut devices = Vec::new();
            for i in 0..count {
                let device = match collection.Item(i) {
                    Ok(d) => d,
                    Err(_) => continue,
                };
                match Self::describe(&device, default_id.as_deref()) {
                    Some(info) => devices.push(info),
                    None => log::debug!("Skipping endpoint {} without an id", i),
                }
            }

            devices.sort_by_key(|d| d.state);
            Ok(devices)
        }
    }

    /// Get the default multimedia render device ID.
    pub fn default_render_device_id(&self) -> Result<String, WatchError> {
        unsafe {
            let device = self
                .enumerator
                .GetDefaultAudioEndpoint(eRender, eMultimedia)
                .map_err(|e| WatchError::DeviceUnavailable(format!("no default output device: {}", e)))?;

            Self::device_id(&device).ok_or_else(|| WatchError::Unknown("GetId failed".into()))
        }
    }

    /// Open a session source on the device with `id`.
    pub fn open(&self, id: &str) -> Result<WasapiSessionSource, WatchError> {
        unsafe {
            let device = self
                .enumerator
                .GetDevice(&HSTRING::from(id))
                .map_err(|e| WatchError::DeviceUnavailable(format!("could not find device {}: {}", id, e)))?;

            let default_id = self.default_render_device_id().ok();
            let info = Self::describe(&device, default_id.as_deref())
                .ok_or_else(|| WatchError::DeviceUnavailable(format!("device {} has no id", id)))?;

            WasapiSessionSource::new(&device, info)
        }
    }

    /// Open a session source on the default output device.
    pub fn open_default(&self) -> Result<WasapiSessionSource, WatchError> {
        let id = self.default_render_device_id()?;
        self.open(&id)
    }

    unsafe fn describe(device: &IMMDevice, default_id: Option<&str>) -> Option<AudioDevice> {
        let id = Self::device_id(device)?;
        let name = Self::friendly_name(device).unwrap_or_else(|| id.clone());
        let state = device
            .GetState()
            .map(Self::map_state)
            .unwrap_or(DeviceState::NotPresent);
        let is_default = default_id == Some(id.as_str());

        Some(AudioDevice {
            id,
            name,
            state,
            is_default,
        })
    }

    unsafe fn device_id(device: &IMMDevice) -> Option<String> {
        let raw = device.GetId().ok()?;
        let id = raw.to_string().ok();
        CoTaskMemFree(Some(raw.0 as *const _));
        id
    }

    /// Read the PKEY_Device_FriendlyName property from a device.
    unsafe fn friendly_name(device: &IMMDevice) -> Option<String> {
        let store = device.OpenPropertyStore(STGM_READ).ok()?;
        let value = store.GetValue(&PKEY_Device_FriendlyName).ok()?;
        let name = value.to_string();
        (!name.is_empty()).then_some(name)
    }

    fn map_state(state: DEVICE_STATE) -> DeviceState {
        match state {
            DEVICE_STATE_ACTIVE => DeviceState::Active,
            DEVICE_STATE_DISABLED => DeviceState::Disabled,
            DEVICE_STATE_UNPLUGGED => DeviceState::Unplugged,
            _ => DeviceState::NotPresent,
        }
    }
}
