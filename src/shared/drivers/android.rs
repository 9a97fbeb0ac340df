// This is free and unencumbered software released into the public domain.

//! Camera2 NDK backend.

mod camera_manager;
pub use camera_manager::*;

mod camera_metadata;
pub use camera_metadata::*;

mod camera_status;
pub use camera_status::*;

mod capture_session;
pub use capture_session::*;

mod native_window;
pub use native_window::*;

use crate::shared::{
    CameraBackend, CameraDevice, CameraError, CameraInfo, CameraOrientation, CameraProvider,
    PreviewSize, SurfaceHandle,
};
use alloc::{borrow::Cow, ffi::CString};
use core::{mem::zeroed, ptr::null_mut};
use ndk_sys::{ACameraDevice, ACameraDevice_StateCallbacks, ACameraDevice_close};
use std::any::Any;

#[link(name = "camera2ndk")]
unsafe extern "C" {}

#[derive(Debug, Default)]
pub struct AndroidCameraProvider {
    manager: CameraManager,
}

impl AndroidCameraProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn metadata(&self, id: &str) -> Result<CameraMetadata, CameraError> {
        let c_id = CString::new(id).map_err(|_| CameraError::NoCamera)?;
        self.manager
            .characteristics(&c_id)
            .map_err(|s| s.into_error("reading camera characteristics"))
    }
}

impl CameraProvider for AndroidCameraProvider {
    fn backend(&self) -> CameraBackend {
        CameraBackend::Android
    }

    fn camera_ids(&self) -> Result<Vec<String>, CameraError> {
        self.manager
            .camera_ids()
            .map_err(|s| s.into_error("listing cameras"))
    }

    fn camera_info(&self, id: &str) -> Result<CameraInfo, CameraError> {
        self.metadata(id)?
            .info()
            .map_err(|s| s.into_error("reading camera characteristics"))
    }

    fn open(&mut self, id: &str) -> Result<Box<dyn CameraDevice>, CameraError> {
        let metadata = self.metadata(id)?;
        let info = metadata
            .info()
            .map_err(|s| s.into_error("reading camera characteristics"))?;
        let preview_sizes = metadata
            .preview_sizes()
            .map_err(|s| s.into_error("reading stream configurations"))?;
        let picture_sizes = metadata.picture_sizes().unwrap_or_default();

        let c_id = CString::new(id).map_err(|_| CameraError::NoCamera)?;
        // Boxed: the platform keeps this pointer until the device closes.
        let mut callbacks: Box<ACameraDevice_StateCallbacks> = Box::new(unsafe { zeroed() });
        let device = match self.manager.open_camera(&c_id, &mut callbacks) {
            Ok(device) => device,
            Err(status) if status.is_camera_busy() => {
                return Err(CameraError::unavailable_with(id, status));
            },
            Err(status) => return Err(status.into_error("opening camera")),
        };

        Ok(Box::new(AndroidCamera {
            id: id.to_string(),
            info,
            preview_sizes,
            picture_sizes,
            device,
            _callbacks: callbacks,
            window: None,
            orientation: CameraOrientation::default(),
            preview_size: None,
            session: None,
        }))
    }
}

#[derive(Debug)]
pub struct AndroidCamera {
    id: String,
    info: CameraInfo,
    preview_sizes: Vec<PreviewSize>,
    picture_sizes: Vec<PreviewSize>,
    device: *mut ACameraDevice,
    _callbacks: Box<ACameraDevice_StateCallbacks>,
    window: Option<NativeWindow>,
    orientation: CameraOrientation,
    preview_size: Option<PreviewSize>,
    session: Option<PreviewCaptureSession>,
}

unsafe impl Send for AndroidCamera {}

impl Drop for AndroidCamera {
    fn drop(&mut self) {
        self.session = None;
        if !self.device.is_null() {
            unsafe { ACameraDevice_close(self.device) };
            self.device = null_mut();
        }
    }
}

impl AndroidCamera {
    /// Camera2 does not rotate the stream itself; the host applies this
    /// orientation as the preview view's transform.
    pub fn display_orientation(&self) -> CameraOrientation {
        self.orientation
    }
}

impl dogma::Named for AndroidCamera {
    fn name(&self) -> Cow<'_, str> {
        "camera2".into()
    }
}

impl CameraDevice for AndroidCamera {
    fn id(&self) -> &str {
        &self.id
    }

    fn info(&self) -> CameraInfo {
        self.info
    }

    fn supported_preview_sizes(&self) -> Result<Vec<PreviewSize>, CameraError> {
        Ok(self.preview_sizes.clone())
    }

    fn supported_picture_sizes(&self) -> Result<Vec<PreviewSize>, CameraError> {
        Ok(self.picture_sizes.clone())
    }

    fn set_display_orientation(
        &mut self,
        orientation: CameraOrientation,
    ) -> Result<(), CameraError> {
        self.orientation = orientation;
        Ok(())
    }

    fn set_preview_target(&mut self, surface: SurfaceHandle) -> Result<(), CameraError> {
        let window = surface
            .downcast::<NativeWindow>()
            .map_err(|_| CameraError::unsupported("camera2 previews need a NativeWindow"))?;
        self.session = None;
        self.window = Some(window);
        Ok(())
    }

    fn set_preview_size(&mut self, size: PreviewSize) -> Result<(), CameraError> {
        if let Some(window) = &self.window {
            window.set_buffers_size(size)?;
        }
        self.preview_size = Some(size);
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), CameraError> {
        if self.session.is_some() {
            return Ok(());
        }
        let window = self
            .window
            .as_ref()
            .ok_or_else(|| CameraError::other("no preview target"))?;
        let session = PreviewCaptureSession::start(self.device, window)
            .map_err(|s| s.into_error("starting preview"))?;
        self.session = Some(session);
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<(), CameraError> {
        self.session = None;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
