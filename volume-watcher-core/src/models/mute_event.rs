use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::processing::loudness;

/// Emitted once each time the watcher mutes a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuteEvent {
    pub process_label: String,
    /// Effective loudness in decibels full scale.
    pub db: f64,
    /// Effective loudness (peak scaled by session volume), 0.0–1.0.
    pub peak: f64,
    pub timestamp: DateTime<Local>,
}

impl MuteEvent {
    /// Creates an event stamped with the current local time.
    pub fn new(process_label: impl Into<String>, loudness: f64) -> Self {
        Self {
            process_label: process_label.into(),
            db: loudness::to_decibels(loudness),
            peak: loudness,
            timestamp: Local::now(),
        }
    }
}
