//! # volume-watcher-windows
//!
//! Windows WASAPI backend for volume-watcher.
//!
//! Provides:
//! - `DeviceEnumerator` — Output device enumeration via MMDevice API
//! - `WasapiSessionSource` — Audio sessions of one device via `IAudioSessionManager2`
//! - `WindowsLabelResolver` — Executable names for session owners
//! - `alert` — Beep after a mute
//! - `ComApartment` — MTA initialization guard
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use volume_watcher_core::{SettingsStore, SharedSettings, Watcher};
//! use volume_watcher_windows::{ComApartment, DeviceEnumerator, WindowsLabelResolver};
//!
//! let _com = ComApartment::init_multithreaded()?;
//! let source = DeviceEnumerator::new()?.open_default()?;
//! let settings = Arc::new(SharedSettings::load(SettingsStore::new("vwconfig.json")));
//! let mut watcher = Watcher::new(
//!     Arc::new(source),
//!     settings,
//!     delegate,
//!     Arc::new(WindowsLabelResolver),
//! )?;
//! watcher.start()?;
//! ```

pub mod labels;

#[cfg(target_os = "windows")]
pub mod alert;
#[cfg(target_os = "windows")]
pub mod com;
#[cfg(target_os = "windows")]
pub mod device_enumerator;
#[cfg(target_os = "windows")]
pub mod process_label;
#[cfg(target_os = "windows")]
pub mod session_source;

#[cfg(target_os = "windows")]
pub use com::ComApartment;
#[cfg(target_os = "windows")]
pub use device_enumerator::DeviceEnumerator;
#[cfg(target_os = "windows")]
pub use process_label::WindowsLabelResolver;
#[cfg(target_os = "windows")]
pub use session_source::{WasapiSession, WasapiSessionSource};
