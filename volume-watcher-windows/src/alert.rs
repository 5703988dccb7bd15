//! Audible alert played after a session is muted.

use std::thread;

use windows::Win32::System::Diagnostics::Debug::Beep;

const BEEP_FREQUENCY_HZ: u32 = 800;
const BEEP_DURATION_MS: u32 = 200;
const BEEP_COUNT: usize = 3;

/// Beep three times on a background thread.
pub fn beep_async() {
    let spawned = thread::Builder::new()
        .name("mute-alert".into())
        .spawn(|| {
            for _ in 0..BEEP_COUNT {
                if let Err(e) = unsafe { Beep(BEEP_FREQUENCY_HZ, BEEP_DURATION_MS) } {
                    log::debug!("Beep failed: {}", e);
                    break;
                }
            }
        });

    if let Err(e) = spawned {
        log::warn!("Failed to spawn alert thread: {}", e);
    }
}
