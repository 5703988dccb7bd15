//! Loudness and decibel math for the mute decision.

/// Convert a normalized amplitude to decibels full scale.
///
/// `1.0` maps to 0 dB and `0.0` to negative infinity.
pub fn to_decibels(peak: f64) -> f64 {
    20.0 * peak.log10()
}

/// Effective loudness of a session: its meter peak, capped at full scale,
/// scaled by the session's own volume.
///
/// Drivers occasionally report peaks slightly above 1.0.
pub fn loudness(peak: f64, volume: f64) -> f64 {
    peak.min(1.0) * volume
}

/// A session is muted when it reaches the threshold and is not muted already.
pub fn should_mute(loudness: f64, threshold: f64, already_muted: bool) -> bool {
    !already_muted && loudness >= threshold
}
