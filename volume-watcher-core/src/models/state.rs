use std::fmt;

/// Watcher controller state.
///
/// State transitions:
/// ```text
/// stopped ──start()──▶ running
///    ▲                    │
///    └──────stop()────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatcherState {
    #[default]
    Stopped,
    Running,
}

impl WatcherState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for WatcherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => f.write_str("paused"),
            Self::Running => f.write_str("running"),
        }
    }
}
