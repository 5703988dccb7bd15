use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

use super::registry::SessionRegistry;
use crate::models::config::{clamp_peak_threshold, clamp_poll_interval};
use crate::models::error::WatchError;
use crate::models::mute_event::MuteEvent;
use crate::processing::loudness;
use crate::traits::label_resolver::ProcessLabelResolver;
use crate::traits::session_source::AudioSession;
use crate::traits::settings_provider::SettingsProvider;
use crate::traits::watch_delegate::WatchDelegate;

/// How a sampling loop ended: `Ok` on cancellation, `Err` on device loss.
pub type LoopExit = Result<(), WatchError>;

/// Counters for one pass over the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub scanned: usize,
    pub muted: usize,
    pub skipped: usize,
}

/// Everything one sampling pass needs.
#[derive(Clone)]
pub struct Sampler {
    pub registry: Arc<SessionRegistry>,
    pub settings: Arc<dyn SettingsProvider>,
    pub delegate: Arc<dyn WatchDelegate>,
    pub resolver: Arc<dyn ProcessLabelResolver>,
}

impl Sampler {
    /// Scan every session once and mute those at or over the threshold.
    ///
    /// A session that cannot be read is skipped. A device-level failure
    /// ends the pass and is returned, after the mutes made before it have
    /// been reported.
    pub fn tick(&self) -> Result<TickSummary, WatchError> {
        let threshold = clamp_peak_threshold(self.settings.peak_threshold());

        let (summary, events, device_lost) = self.registry.with_sessions(|sessions| {
            let mut summary = TickSummary::default();
            let mut events = Vec::new();
            let mut device_lost = None;

            for session in sessions {
                summary.scanned += 1;
                match self.inspect(session.as_ref(), threshold) {
                    Ok(Some(event)) => events.push(event),
                    Ok(None) => {}
                    Err(e) if e.is_device_lost() => {
                        device_lost = Some(e);
                        break;
                    }
                    Err(e) => {
                        summary.skipped += 1;
                        log::debug!("Skipping session {:?}: {}", session.owner(), e);
                    }
                }
            }

            summary.muted = events.len();
            (summary, events, device_lost)
        });

        for event in &events {
            log::info!(
                "Muted \"{}\" at {:.2} dB ({:.2} peak)",
                event.process_label,
                event.db,
                event.peak
            );
            self.delegate.on_session_muted(event);
        }

        match device_lost {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }

    fn inspect(&self, session: &dyn AudioSession, threshold: f64) -> Result<Option<MuteEvent>, WatchError> {
        let level = loudness::loudness(f64::from(session.peak()?), f64::from(session.volume()?));
        if !loudness::should_mute(level, threshold, session.is_muted()?) {
            return Ok(None);
        }

        let label = self.resolver.resolve(&session.owner());
        session.set_muted(true)?;
        Ok(Some(MuteEvent::new(label, level)))
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(clamp_poll_interval(self.settings.poll_interval_ms())))
    }
}

/// Run sampling passes until `cancel` fires, then report on `done`.
///
/// The inter-tick wait is the only place the loop blocks, and it wakes as
/// soon as a cancellation arrives. `done` is consumed, so it fires exactly
/// once whatever the exit path.
pub fn run(sampler: Sampler, cancel: Receiver<()>, done: Sender<LoopExit>) {
    let exit = sample_until_cancelled(&sampler, &cancel);

    if let Err(ref e) = exit {
        log::error!("Sampling loop stopped: {}", e);
        sampler.delegate.on_error(e);
    }

    let _ = done.send(exit);
}

fn sample_until_cancelled(sampler: &Sampler, cancel: &Receiver<()>) -> LoopExit {
    loop {
        if is_cancelled(cancel) {
            return Ok(());
        }

        sampler.tick()?;

        if is_cancelled(cancel) {
            return Ok(());
        }

        match cancel.recv_timeout(sampler.poll_interval()) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

fn is_cancelled(cancel: &Receiver<()>) -> bool {
    !matches!(cancel.try_recv(), Err(TryRecvError::Empty))
}
