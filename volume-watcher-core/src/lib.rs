//! # volume-watcher-core
//!
//! Platform-agnostic core of the volume watcher.
//!
//! Watches the audio sessions of one output device and mutes any session
//! whose effective loudness reaches a configured threshold. Platform
//! backends (Windows WASAPI) implement the `SessionSource` trait and plug
//! into the generic `Watcher`.
//!
//! ## Architecture
//!
//! ```text
//! volume-watcher-core (this crate)
//! ├── traits/       ← SessionSource, AudioSession, WatchDelegate, SettingsProvider, ProcessLabelResolver
//! ├── models/       ← WatchError, WatcherState, WatcherSettings, AudioDevice, MuteEvent
//! ├── processing/   ← loudness and decibel math
//! ├── session/      ← SessionRegistry, sampling loop, Watcher (controller)
//! └── storage/      ← SettingsStore (JSON), SharedSettings
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{AudioDevice, DeviceState, SessionOwner};
pub use models::config::WatcherSettings;
pub use models::error::WatchError;
pub use models::mute_event::MuteEvent;
pub use models::state::WatcherState;
pub use processing::loudness::{loudness, to_decibels};
pub use session::registry::SessionRegistry;
pub use session::sampling::{LoopExit, TickSummary};
pub use session::watcher::Watcher;
pub use storage::settings_store::SettingsStore;
pub use storage::shared_settings::SharedSettings;
pub use traits::label_resolver::{FallbackLabelResolver, ProcessLabelResolver};
pub use traits::session_source::{AudioSession, SessionSource, SessionsChanged};
pub use traits::settings_provider::SettingsProvider;
pub use traits::watch_delegate::WatchDelegate;
