use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TryRecvError};

use super::registry::SessionRegistry;
use super::sampling::{self, LoopExit, Sampler};
use crate::models::audio_models::AudioDevice;
use crate::models::error::WatchError;
use crate::models::state::WatcherState;
use crate::traits::label_resolver::ProcessLabelResolver;
use crate::traits::session_source::{SessionSource, SessionsChanged};
use crate::traits::settings_provider::SettingsProvider;
use crate::traits::watch_delegate::WatchDelegate;

/// One running sampling loop. Both channels are single use; a new pair is
/// built for every start.
struct ActiveRun {
    cancel: Sender<()>,
    done: Receiver<LoopExit>,
    handle: thread::JoinHandle<()>,
}

/// Starts, stops and supervises the sampling loop for one device.
///
/// ```text
/// [SessionSource] ──SessionsChanged──▶ [refresh worker] ──refresh()──▶ [SessionRegistry]
///                                                                            │ with_sessions()
///                         [Watcher] ──start()/stop()──▶ [sampling thread] ◀──┘
///                                                              │
///                                                              └──▶ [WatchDelegate]
/// ```
///
/// After [`stop`](Self::stop) returns no tick is in progress, so the caller
/// may switch devices or change settings without racing the loop.
pub struct Watcher {
    registry: Arc<SessionRegistry>,
    settings: Arc<dyn SettingsProvider>,
    delegate: Arc<dyn WatchDelegate>,
    resolver: Arc<dyn ProcessLabelResolver>,
    refresh_tx: Sender<SessionsChanged>,
    state: WatcherState,
    run: Option<ActiveRun>,
}

impl Watcher {
    /// Build a watcher over `source` and load its sessions.
    ///
    /// Starts sampling right away when `settings.auto_start()` is set.
    pub fn new(
        source: Arc<dyn SessionSource>,
        settings: Arc<dyn SettingsProvider>,
        delegate: Arc<dyn WatchDelegate>,
        resolver: Arc<dyn ProcessLabelResolver>,
    ) -> Result<Self, WatchError> {
        let registry = Arc::new(SessionRegistry::new(Arc::clone(&source)));
        registry.refresh()?;

        let (refresh_tx, refresh_rx) = unbounded();
        source.subscribe(refresh_tx.clone())?;
        // Detached: it exits on its own once the registry is dropped.
        registry.spawn_refresh_worker(refresh_rx)?;

        let mut watcher = Self {
            registry,
            settings,
            delegate,
            resolver,
            refresh_tx,
            state: WatcherState::Stopped,
            run: None,
        };

        if watcher.settings.auto_start() {
            watcher.start()?;
        }

        Ok(watcher)
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn device(&self) -> AudioDevice {
        self.registry.device()
    }

    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Start sampling. No-op if already running.
    pub fn start(&mut self) -> Result<(), WatchError> {
        if let Some(Err(e)) = self.poll_exit() {
            log::warn!("Previous sampling loop had stopped: {}", e);
        }
        if self.state.is_running() {
            return Ok(());
        }

        let sampler = Sampler {
            registry: Arc::clone(&self.registry),
            settings: Arc::clone(&self.settings),
            delegate: Arc::clone(&self.delegate),
            resolver: Arc::clone(&self.resolver),
        };
        let (cancel_tx, cancel_rx) = bounded(1);
        let (done_tx, done_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("volume-watcher".into())
            .spawn(move || sampling::run(sampler, cancel_rx, done_tx))
            .map_err(|e| WatchError::Unknown(format!("failed to spawn sampling thread: {}", e)))?;

        self.run = Some(ActiveRun {
            cancel: cancel_tx,
            done: done_rx,
            handle,
        });
        self.set_state(WatcherState::Running);
        log::info!("Session watcher started on {}", self.registry.device().name);
        Ok(())
    }

    /// Stop sampling and wait for the loop to finish. No-op if stopped.
    ///
    /// Returns the loop's exit result, so a device loss that ended the loop
    /// surfaces here.
    pub fn stop(&mut self) -> Result<(), WatchError> {
        let Some(run) = self.run.take() else {
            self.state = WatcherState::Stopped;
            return Ok(());
        };

        // The loop may already have exited on its own; the send then fails.
        let _ = run.cancel.try_send(());
        let exit = Self::finish(run);

        self.set_state(WatcherState::Stopped);
        log::info!("Session watcher stopped");
        exit
    }

    /// Stop if running, start if stopped. Returns the new state.
    pub fn toggle(&mut self) -> Result<WatcherState, WatchError> {
        if self.state.is_running() {
            self.stop()?;
        } else {
            self.start()?;
        }
        Ok(self.state)
    }

    /// Reap a loop that ended by itself, e.g. because the device vanished.
    ///
    /// Returns `None` while the loop is still running or when stopped.
    pub fn poll_exit(&mut self) -> Option<LoopExit> {
        let exited = match self.run.as_ref()?.done.try_recv() {
            Ok(exit) => exit,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(Self::vanished()),
        };

        if let Some(run) = self.run.take() {
            let _ = run.handle.join();
        }
        self.set_state(WatcherState::Stopped);
        Some(exited)
    }

    /// Switch to another device. Only allowed while stopped.
    pub fn set_device(&mut self, source: Arc<dyn SessionSource>) -> Result<usize, WatchError> {
        if self.state.is_running() {
            return Err(WatchError::InvalidState(
                "pause the session watcher before changing devices".into(),
            ));
        }

        source.subscribe(self.refresh_tx.clone())?;
        let count = self.registry.set_source(Arc::clone(&source))?;
        log::info!("Watching {} ({} sessions)", source.device().name, count);
        Ok(count)
    }

    /// Reload the session list now.
    pub fn refresh_sessions(&self) -> Result<usize, WatchError> {
        self.registry.refresh()
    }

    fn finish(run: ActiveRun) -> LoopExit {
        let exit = run.done.recv().unwrap_or_else(|_| Err(Self::vanished()));
        let _ = run.handle.join();
        exit
    }

    fn vanished() -> WatchError {
        WatchError::Unknown("sampling loop exited without signaling completion".into())
    }

    fn set_state(&mut self, state: WatcherState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.delegate.on_state_changed(&state);
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("Session watcher ended with error: {}", e);
        }
    }
}
