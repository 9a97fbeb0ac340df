// This is free and unencumbered software released into the public domain.

use crate::shared::{CameraError, PreviewSize};
use core::ptr::null_mut;
use ndk_sys::{
    ANativeWindow, ANativeWindow_acquire, ANativeWindow_release,
    ANativeWindow_setBuffersGeometry,
};

/// A counted reference to the host's preview window.
#[derive(Debug)]
pub struct NativeWindow {
    pub(crate) handle: *mut ANativeWindow,
}

// The window is reference counted by the platform and may be used from any thread.
unsafe impl Send for NativeWindow {}

impl Drop for NativeWindow {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ANativeWindow_release(self.handle) };
            self.handle = null_mut();
        }
    }
}

impl NativeWindow {
    /// Takes a new reference on `handle`, e.g. from `ANativeWindow_fromSurface`.
    ///
    /// # Safety
    /// `handle` must be a valid window pointer.
    pub unsafe fn from_raw(handle: *mut ANativeWindow) -> Self {
        unsafe { ANativeWindow_acquire(handle) };
        Self { handle }
    }

    /// Sizes the window's buffers, which is what selects the camera's
    /// preview stream resolution.
    pub fn set_buffers_size(&self, size: PreviewSize) -> Result<(), CameraError> {
        let status = unsafe {
            ANativeWindow_setBuffersGeometry(self.handle, size.width as i32, size.height as i32, 0)
        };
        if status != 0 {
            return Err(CameraError::other(format!(
                "ANativeWindow_setBuffersGeometry failed ({status})"
            )));
        }
        Ok(())
    }
}
