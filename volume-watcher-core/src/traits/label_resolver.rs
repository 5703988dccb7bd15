use crate::models::audio_models::SessionOwner;

pub const SYSTEM_SOUNDS_LABEL: &str = "System Sound";
pub const UNKNOWN_PROCESS_LABEL: &str = "<Unknown Process>";

/// Turns a session owner into a human-readable label.
///
/// Must never fail: fall back to [`UNKNOWN_PROCESS_LABEL`].
pub trait ProcessLabelResolver: Send + Sync {
    fn resolve(&self, owner: &SessionOwner) -> String;
}

/// Resolver that knows nothing about processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackLabelResolver;

impl ProcessLabelResolver for FallbackLabelResolver {
    fn resolve(&self, owner: &SessionOwner) -> String {
        match owner {
            SessionOwner::SystemSounds => SYSTEM_SOUNDS_LABEL.to_string(),
            SessionOwner::Process(_) => UNKNOWN_PROCESS_LABEL.to_string(),
        }
    }
}
