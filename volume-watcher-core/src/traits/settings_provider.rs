/// Live configuration read by the watcher.
///
/// Values are re-read at the start of every tick, so changes apply without
/// restarting the loop. The watcher still clamps whatever it reads.
pub trait SettingsProvider: Send + Sync {
    fn poll_interval_ms(&self) -> u32;

    fn peak_threshold(&self) -> f64;

    /// Whether a new watcher should start running immediately.
    fn auto_start(&self) -> bool;
}
