// This is free and unencumbered software released into the public domain.

use super::{CameraMetadata, CameraResult, CameraStatus};
use alloc::ffi::CString;
use core::{ffi::CStr, ptr::null_mut};
use ndk_sys::{
    ACameraDevice, ACameraDevice_StateCallbacks, ACameraManager, ACameraManager_create,
    ACameraManager_delete, ACameraManager_deleteCameraIdList,
    ACameraManager_getCameraCharacteristics, ACameraManager_getCameraIdList,
    ACameraManager_openCamera,
};
use scopeguard::defer;

#[derive(Debug)]
pub struct CameraManager {
    pub(crate) handle: *mut ACameraManager,
}

unsafe impl Send for CameraManager {}

impl Drop for CameraManager {
    fn drop(&mut self) {
        unsafe {
            ACameraManager_delete(self.handle);
            self.handle = null_mut();
        }
    }
}

impl Default for CameraManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraManager {
    pub fn new() -> Self {
        Self {
            handle: unsafe { ACameraManager_create() },
        }
    }

    pub fn camera_ids(&self) -> CameraResult<Vec<String>> {
        let mut list_ptr = null_mut();
        CameraStatus::check(unsafe { ACameraManager_getCameraIdList(self.handle, &mut list_ptr) })?;

        defer! {
            unsafe { ACameraManager_deleteCameraIdList(list_ptr); }
        }

        let list = unsafe { &*list_ptr };
        if list.numCameras < 1 {
            return Ok(Vec::new());
        }

        let ids = unsafe { core::slice::from_raw_parts(list.cameraIds, list.numCameras as usize) };

        Ok(ids
            .iter()
            .map(|p| unsafe { CStr::from_ptr(*p).to_string_lossy().into_owned() })
            .collect())
    }

    pub fn characteristics(&self, id: &CStr) -> CameraResult<CameraMetadata> {
        let mut metadata = null_mut();
        CameraStatus::check(unsafe {
            ACameraManager_getCameraCharacteristics(self.handle, id.as_ptr(), &mut metadata)
        })?;
        Ok(CameraMetadata { handle: metadata })
    }

    /// Opens `id`. `callbacks` must stay at a fixed address until the
    /// device is closed.
    pub fn open_camera(
        &self,
        id: &CString,
        callbacks: &mut ACameraDevice_StateCallbacks,
    ) -> CameraResult<*mut ACameraDevice> {
        let mut device = null_mut();
        CameraStatus::check(unsafe {
            ACameraManager_openCamera(self.handle, id.as_ptr(), callbacks, &mut device)
        })?;
        Ok(device)
    }
}
