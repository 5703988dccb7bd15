//! Test doubles shared by the core's unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::Mutex;

use crate::models::audio_models::{AudioDevice, DeviceState, SessionOwner};
use crate::models::error::WatchError;
use crate::models::mute_event::MuteEvent;
use crate::models::state::WatcherState;
use crate::traits::session_source::{AudioSession, SessionSource, SessionsChanged};
use crate::traits::watch_delegate::WatchDelegate;

/// Initial readings for one fake session.
#[derive(Debug, Clone, Copy)]
pub struct FakeSessionSpec {
    pub owner: SessionOwner,
    pub peak: f32,
    pub volume: f32,
    pub muted: bool,
}

impl FakeSessionSpec {
    pub fn process(pid: u32, peak: f32, volume: f32) -> Self {
        Self {
            owner: SessionOwner::Process(pid),
            peak,
            volume,
            muted: false,
        }
    }

    pub fn system(peak: f32) -> Self {
        Self {
            owner: SessionOwner::SystemSounds,
            peak,
            volume: 1.0,
            muted: false,
        }
    }

    pub fn muted(mut self) -> Self {
        self.muted = true;
        self
    }
}

/// Shared state of one fake session; survives registry reloads the way an
/// OS session outlives the handles pointing at it.
pub struct FakeSessionState {
    pub owner: SessionOwner,
    pub peak: Mutex<f32>,
    pub volume: Mutex<f32>,
    pub muted: AtomicBool,
    pub mute_calls: AtomicUsize,
    pub fault: Mutex<Option<WatchError>>,
}

impl FakeSessionState {
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    pub fn set_peak(&self, peak: f32) {
        *self.peak.lock() = peak;
    }

    /// Make every read of this session fail with `fault`.
    pub fn fail_with(&self, fault: WatchError) {
        *self.fault.lock() = Some(fault);
    }

    fn check(&self) -> Result<(), WatchError> {
        match self.fault.lock().clone() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }
}

struct FakeSessionHandle {
    state: Arc<FakeSessionState>,
    live: Arc<AtomicUsize>,
    disposed: Arc<AtomicUsize>,
}

impl AudioSession for FakeSessionHandle {
    fn owner(&self) -> SessionOwner {
        self.state.owner
    }

    fn peak(&self) -> Result<f32, WatchError> {
        self.state.check()?;
        Ok(*self.state.peak.lock())
    }

    fn volume(&self) -> Result<f32, WatchError> {
        self.state.check()?;
        Ok(*self.state.volume.lock())
    }

    fn is_muted(&self) -> Result<bool, WatchError> {
        self.state.check()?;
        Ok(self.state.is_muted())
    }

    fn set_muted(&self, muted: bool) -> Result<(), WatchError> {
        self.state.check()?;
        self.state.mute_calls.fetch_add(1, Ordering::SeqCst);
        self.state.muted.store(muted, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for FakeSessionHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.disposed.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory session source that counts live and disposed handles.
pub struct FakeSessionSource {
    device: AudioDevice,
    sessions: Mutex<Vec<Arc<FakeSessionState>>>,
    fail_enumeration: AtomicBool,
    fail_subscribe: AtomicBool,
    live: Arc<AtomicUsize>,
    disposed: Arc<AtomicUsize>,
    subscribers: Mutex<Vec<Sender<SessionsChanged>>>,
}

impl FakeSessionSource {
    pub fn with_sessions(specs: Vec<FakeSessionSpec>) -> Arc<Self> {
        Self::named("speakers", specs)
    }

    pub fn named(id: &str, specs: Vec<FakeSessionSpec>) -> Arc<Self> {
        let source = Arc::new(Self {
            device: AudioDevice {
                id: id.to_string(),
                name: format!("Fake {}", id),
                state: DeviceState::Active,
                is_default: true,
            },
            sessions: Mutex::new(Vec::new()),
            fail_enumeration: AtomicBool::new(false),
            fail_subscribe: AtomicBool::new(false),
            live: Arc::new(AtomicUsize::new(0)),
            disposed: Arc::new(AtomicUsize::new(0)),
            subscribers: Mutex::new(Vec::new()),
        });
        for spec in specs {
            source.add_session(spec);
        }
        source
    }

    /// Add a session without notifying subscribers.
    pub fn add_session(&self, spec: FakeSessionSpec) -> Arc<FakeSessionState> {
        let state = Arc::new(FakeSessionState {
            owner: spec.owner,
            peak: Mutex::new(spec.peak),
            volume: Mutex::new(spec.volume),
            muted: AtomicBool::new(spec.muted),
            mute_calls: AtomicUsize::new(0),
            fault: Mutex::new(None),
        });
        self.sessions.lock().push(Arc::clone(&state));
        state
    }

    /// Add a session and notify subscribers, like a process starting to play.
    pub fn create_session(&self, spec: FakeSessionSpec) -> Arc<FakeSessionState> {
        let state = self.add_session(spec);
        for tx in self.subscribers.lock().iter() {
            let _ = tx.send(SessionsChanged);
        }
        state
    }

    pub fn session(&self, index: usize) -> Arc<FakeSessionState> {
        Arc::clone(&self.sessions.lock()[index])
    }

    pub fn fail_enumeration(&self, fail: bool) {
        self.fail_enumeration.store(fail, Ordering::SeqCst);
    }

    pub fn fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn disposed_handles(&self) -> usize {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl SessionSource for FakeSessionSource {
    fn device(&self) -> AudioDevice {
        self.device.clone()
    }

    fn enumerate_sessions(&self) -> Result<Vec<Box<dyn AudioSession>>, WatchError> {
        if self.fail_enumeration.load(Ordering::SeqCst) {
            return Err(WatchError::DeviceUnavailable(format!("{} was unplugged", self.device.id)));
        }

        let sessions = self.sessions.lock();
        let handles = sessions
            .iter()
            .map(|state| {
                self.live.fetch_add(1, Ordering::SeqCst);
                Box::new(FakeSessionHandle {
                    state: Arc::clone(state),
                    live: Arc::clone(&self.live),
                    disposed: Arc::clone(&self.disposed),
                }) as Box<dyn AudioSession>
            })
            .collect();
        Ok(handles)
    }

    fn subscribe(&self, notify: Sender<SessionsChanged>) -> Result<(), WatchError> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(WatchError::DeviceUnavailable(format!(
                "{} rejected the notification callback",
                self.device.id
            )));
        }
        self.subscribers.lock().push(notify);
        Ok(())
    }
}

/// Delegate that records everything it is told.
#[derive(Default)]
pub struct RecordingDelegate {
    pub muted: Mutex<Vec<MuteEvent>>,
    pub states: Mutex<Vec<WatcherState>>,
    pub errors: Mutex<Vec<WatchError>>,
}

impl RecordingDelegate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn mute_count(&self) -> usize {
        self.muted.lock().len()
    }
}

impl WatchDelegate for RecordingDelegate {
    fn on_session_muted(&self, event: &MuteEvent) {
        self.muted.lock().push(event.clone());
    }

    fn on_state_changed(&self, state: &WatcherState) {
        self.states.lock().push(*state);
    }

    fn on_error(&self, error: &WatchError) {
        self.errors.lock().push(error.clone());
    }
}
