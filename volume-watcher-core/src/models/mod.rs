pub mod audio_models;
pub mod config;
pub mod error;
pub mod mute_event;
pub mod state;
