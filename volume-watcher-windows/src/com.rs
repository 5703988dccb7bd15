//! COM apartment lifetime.

use std::marker::PhantomData;

use windows::Win32::System::Com::*;

use volume_watcher_core::models::error::WatchError;

/// Joins the calling thread to the multithreaded apartment for as long as
/// the guard lives.
///
/// Session and meter interfaces created in the MTA can be used from the
/// sampling and refresh threads, which join the MTA implicitly while this
/// guard is alive.
pub struct ComApartment {
    // CoUninitialize must run on the thread that initialized.
    _not_send: PhantomData<*const ()>,
}

impl ComApartment {
    pub fn init_multithreaded() -> Result<Self, WatchError> {
        unsafe {
            CoInitializeEx(None, COINIT_MULTITHREADED)
                .ok()
                .map_err(|e| WatchError::Unknown(format!("CoInitializeEx failed: {}", e)))?;
        }
        Ok(Self { _not_send: PhantomData })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe {
            CoUninitialize();
        }
    }
}
