//! Process labels for WASAPI sessions.

use windows::core::PWSTR;
use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Threading::*;

use volume_watcher_core::models::audio_models::SessionOwner;
use volume_watcher_core::traits::label_resolver::{
    ProcessLabelResolver, SYSTEM_SOUNDS_LABEL, UNKNOWN_PROCESS_LABEL,
};

use crate::labels::label_from_image_path;

/// Labels sessions with the owning executable's name.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsLabelResolver;

impl ProcessLabelResolver for WindowsLabelResolver {
    fn resolve(&self, owner: &SessionOwner) -> String {
        match owner {
            SessionOwner::SystemSounds => SYSTEM_SOUNDS_LABEL.to_string(),
            SessionOwner::Process(pid) => process_image_path(*pid)
                .and_then(|path| label_from_image_path(&path))
                .unwrap_or_else(|| UNKNOWN_PROCESS_LABEL.to_string()),
        }
    }
}

/// Full image path of `pid`, or `None` if the process is gone or protected.
fn process_image_path(pid: u32) -> Option<String> {
    if pid == 0 {
        return None;
    }

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid).ok()?;

        let mut buffer = [0u16; 1024];
        let mut len = buffer.len() as u32;
        let queried = QueryFullProcessImageNameW(handle, PROCESS_NAME_WIN32, PWSTR(buffer.as_mut_ptr()), &mut len);
        let _ = CloseHandle(handle);

        if let Err(e) = queried {
            log::debug!("QueryFullProcessImageNameW({}) failed: {}", pid, e);
            return None;
        }
        Some(String::from_utf16_lossy(&buffer[..len as usize]))
    }
}
