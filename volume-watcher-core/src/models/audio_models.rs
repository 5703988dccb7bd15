use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of an audio endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeviceState {
    Active,
    Disabled,
    NotPresent,
    Unplugged,
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Active => "Active",
            Self::Disabled => "Disabled",
            Self::NotPresent => "NotPresent",
            Self::Unplugged => "Unplugged",
        };
        f.write_str(name)
    }
}

/// An audio output device whose sessions can be watched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub id: String,
    pub name: String,
    pub state: DeviceState,
    pub is_default: bool,
}

impl AudioDevice {
    pub fn is_active(&self) -> bool {
        self.state == DeviceState::Active
    }
}

/// Who produces the audio in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOwner {
    /// The shared Windows system sounds session.
    SystemSounds,
    Process(u32),
}

impl SessionOwner {
    pub fn process_id(&self) -> Option<u32> {
        match self {
            Self::SystemSounds => None,
            Self::Process(pid) => Some(*pid),
        }
    }
}
