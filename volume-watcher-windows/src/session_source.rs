//! WASAPI audio sessions of one render device.
//!
//! Sessions come from `IAudioSessionManager2` on the device. Each session
//! handle keeps the control, meter and simple-volume interfaces of one
//! session; dropping the handle releases them.
//!
//! New sessions are reported through an `IAudioSessionNotification` that
//! pushes `SessionsChanged` onto the registry's channel instead of touching
//! the session list from the COM callback thread.

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use windows::core::{implement, Interface, Ref, Result as WinResult, S_OK};
use windows::Win32::Media::Audio::*;
use windows::Win32::System::Com::*;

use volume_watcher_core::models::audio_models::{AudioDevice, SessionOwner};
use volume_watcher_core::models::error::WatchError;
use volume_watcher_core::traits::session_source::{AudioSession, SessionSource, SessionsChanged};

/// Session source backed by a device's `IAudioSessionManager2`.
pub struct WasapiSessionSource {
    device: AudioDevice,
    manager: IAudioSessionManager2,
    notifiers: Mutex<Vec<IAudioSessionNotification>>,
}

// SAFETY: the manager lives in the multithreaded apartment, so its
// interface pointer may be used from any MTA thread. Registration state is
// behind a mutex.
unsafe impl Send for WasapiSessionSource {}
unsafe impl Sync for WasapiSessionSource {}

impl WasapiSessionSource {
    /// Activate the session manager on `device`.
    pub(crate) unsafe fn new(device: &IMMDevice, info: AudioDevice) -> Result<Self, WatchError> {
        let manager: IAudioSessionManager2 = device
            .Activate(CLSCTX_ALL, None)
            .map_err(|e| device_error("IAudioSessionManager2 activation failed", e))?;

        Ok(Self {
            device: info,
            manager,
            notifiers: Mutex::new(Vec::new()),
        })
    }
}

impl SessionSource for WasapiSessionSource {
    fn device(&self) -> AudioDevice {
        self.device.clone()
    }

    fn enumerate_sessions(&self) -> Result<Vec<Box<dyn AudioSession>>, WatchError> {
        unsafe {
            let enumerator = self
                .manager
                .GetSessionEnumerator()
                .map_err(|e| device_error("GetSessionEnumerator failed", e))?;
            let count = enumerator
                .GetCount()
                .map_err(|e| device_error("session GetCount failed", e))?;

            let mut sessions: Vec<Box<dyn AudioSession>> = Vec::with_capacity(count.max(0) as usize);
            for i in 0..count {
                let control = match enumerator.GetSession(i) {
                    Ok(control) => control,
                    Err(e) => {
                        log::debug!("Session {} vanished during enumeration: {}", i, e);
                        continue;
                    }
                };
                match WasapiSession::from_control(&control) {
                    Ok(session) => sessions.push(Box::new(session)),
                    Err(e) => log::debug!("Skipping session {}: {}", i, e),
                }
            }
            Ok(sessions)
        }
    }

    fn subscribe(&self, notify: Sender<SessionsChanged>) -> Result<(), WatchError> {
        let notifier: IAudioSessionNotification = SessionCreatedNotifier { notify }.into();
        unsafe {
            self.manager
                .RegisterSessionNotification(&notifier)
                .map_err(|e| device_error("RegisterSessionNotification failed", e))?;
        }
        self.notifiers.lock().push(notifier);
        Ok(())
    }
}

impl Drop for WasapiSessionSource {
    fn drop(&mut self) {
        for notifier in self.notifiers.lock().drain(..) {
            unsafe {
                if let Err(e) = self.manager.UnregisterSessionNotification(&notifier) {
                    log::warn!("UnregisterSessionNotification failed: {}", e);
                }
            }
        }
    }
}

/// One WASAPI session.
pub struct WasapiSession {
    owner: SessionOwner,
    meter: IAudioMeterInformation,
    volume: ISimpleAudioVolume,
}

// SAFETY: see `WasapiSessionSource`; session interfaces are created in the MTA.
unsafe impl Send for WasapiSession {}

impl WasapiSession {
    unsafe fn from_control(control: &IAudioSessionControl) -> Result<Self, WatchError> {
        let control: IAudioSessionControl2 = control.cast().map_err(session_error)?;

        let owner = if control.IsSystemSoundsSession() == S_OK {
            SessionOwner::SystemSounds
        } else {
            SessionOwner::Process(control.GetProcessId().unwrap_or(0))
        };

        Ok(Self {
            owner,
            meter: control.cast().map_err(session_error)?,
            volume: control.cast().map_err(session_error)?,
        })
    }
}

impl AudioSession for WasapiSession {
    fn owner(&self) -> SessionOwner {
        self.owner
    }

    fn peak(&self) -> Result<f32, WatchError> {
        unsafe { self.meter.GetPeakValue().map_err(session_error) }
    }

    fn volume(&self) -> Result<f32, WatchError> {
        unsafe { self.volume.GetMasterVolume().map_err(session_error) }
    }

    fn is_muted(&self) -> Result<bool, WatchError> {
        unsafe { self.volume.GetMute().map(|m| m.as_bool()).map_err(session_error) }
    }

    fn set_muted(&self, muted: bool) -> Result<(), WatchError> {
        unsafe { self.volume.SetMute(muted, std::ptr::null()).map_err(session_error) }
    }
}

#[implement(IAudioSessionNotification)]
struct SessionCreatedNotifier {
    notify: Sender<SessionsChanged>,
}

impl IAudioSessionNotification_Impl for SessionCreatedNotifier_Impl {
    fn OnSessionCreated(&self, _newsession: Ref<'_, IAudioSessionControl>) -> WinResult<()> {
        // The receiver is gone once the registry is dropped; nothing to do then.
        let _ = self.notify.send(SessionsChanged);
        Ok(())
    }
}

/// A failure while reading one session. An invalidated device is escalated.
fn session_error(e: windows::core::Error) -> WatchError {
    if e.code() == AUDCLNT_E_DEVICE_INVALIDATED {
        WatchError::DeviceUnavailable(format!("device invalidated: {}", e))
    } else {
        WatchError::SessionAccess(e.to_string())
    }
}

fn device_error(context: &str, e: windows::core::Error) -> WatchError {
    WatchError::DeviceUnavailable(format!("{}: {}", context, e))
}
