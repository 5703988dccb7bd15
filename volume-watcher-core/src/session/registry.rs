use std::sync::{Arc, Weak};
use std::thread;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;

use crate::models::audio_models::AudioDevice;
use crate::models::error::WatchError;
use crate::traits::session_source::{AudioSession, SessionSource, SessionsChanged};

struct RegistryInner {
    source: Arc<dyn SessionSource>,
    sessions: Vec<Box<dyn AudioSession>>,
    generation: u64,
}

/// The current set of sessions for one device.
///
/// Reloads and reads take the same lock, so a reader never sees a
/// collection that is half disposed. A reload swaps the whole collection;
/// there is no incremental diffing.
pub struct SessionRegistry {
    inner: Mutex<RegistryInner>,
}

impl SessionRegistry {
    /// Creates an empty registry. Call [`refresh`](Self::refresh) to load it.
    pub fn new(source: Arc<dyn SessionSource>) -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                source,
                sessions: Vec::new(),
                generation: 0,
            }),
        }
    }

    /// Dispose every held session and reload from the device.
    ///
    /// If enumeration fails the previous sessions are kept.
    pub fn refresh(&self) -> Result<usize, WatchError> {
        let mut inner = self.inner.lock();
        let fresh = inner.source.enumerate_sessions()?;
        Self::install(&mut inner, fresh);
        log::debug!(
            "Session registry reloaded: {} sessions (generation {})",
            inner.sessions.len(),
            inner.generation
        );
        Ok(inner.sessions.len())
    }

    /// Point the registry at another device and load its sessions.
    ///
    /// On failure the previous source and sessions stay in place.
    pub fn set_source(&self, source: Arc<dyn SessionSource>) -> Result<usize, WatchError> {
        let mut inner = self.inner.lock();
        let fresh = source.enumerate_sessions()?;
        inner.source = source;
        Self::install(&mut inner, fresh);
        Ok(inner.sessions.len())
    }

    /// Run `f` over the current sessions while holding the registry lock.
    pub fn with_sessions<T>(&self, f: impl FnOnce(&[Box<dyn AudioSession>]) -> T) -> T {
        let inner = self.inner.lock();
        f(&inner.sessions)
    }

    pub fn device(&self) -> AudioDevice {
        self.inner.lock().source.device()
    }

    pub fn source(&self) -> Arc<dyn SessionSource> {
        Arc::clone(&self.inner.lock().source)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful reloads so far.
    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Spawn a thread that reloads the registry on every
    /// [`SessionsChanged`] message.
    ///
    /// Bursts of pending messages collapse into one reload. The thread
    /// exits once the registry is dropped or every sender is gone.
    pub fn spawn_refresh_worker(
        self: &Arc<Self>,
        events: Receiver<SessionsChanged>,
    ) -> Result<thread::JoinHandle<()>, WatchError> {
        let registry: Weak<Self> = Arc::downgrade(self);

        thread::Builder::new()
            .name("session-refresh".into())
            .spawn(move || {
                while events.recv().is_ok() {
                    let coalesced = events.try_iter().count();
                    let Some(registry) = registry.upgrade() else {
                        break;
                    };
                    if coalesced > 0 {
                        log::debug!("Coalesced {} session notifications", coalesced + 1);
                    }
                    if let Err(e) = registry.refresh() {
                        log::warn!("Session refresh failed, keeping previous sessions: {}", e);
                    }
                }
                log::debug!("Session refresh worker exiting");
            })
            .map_err(|e| WatchError::Unknown(format!("failed to spawn refresh thread: {}", e)))
    }

    fn install(inner: &mut RegistryInner, fresh: Vec<Box<dyn AudioSession>>) {
        // Release the stale handles before the new ones take their place.
        inner.sessions.clear();
        inner.sessions = fresh;
        inner.generation += 1;
    }
}
