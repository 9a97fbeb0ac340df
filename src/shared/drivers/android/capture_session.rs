// This is free and unencumbered software released into the public domain.

//! One repeating preview request streaming into a native window.

use super::{CameraResult, CameraStatus, NativeWindow};
use core::ptr::null_mut;
use ndk_sys::{
    ACameraCaptureSession, ACameraCaptureSession_close, ACameraCaptureSession_stateCallbacks,
    ACameraCaptureSession_setRepeatingRequest, ACameraCaptureSession_stopRepeating,
    ACameraDevice, ACameraDevice_createCaptureRequest, ACameraDevice_createCaptureSession,
    ACameraDevice_request_template, ACameraOutputTarget, ACameraOutputTarget_create,
    ACameraOutputTarget_free, ACaptureRequest, ACaptureRequest_addTarget, ACaptureRequest_free,
    ACaptureSessionOutput, ACaptureSessionOutputContainer, ACaptureSessionOutputContainer_add,
    ACaptureSessionOutputContainer_create, ACaptureSessionOutputContainer_free,
    ACaptureSessionOutput_create, ACaptureSessionOutput_free,
};

#[derive(Debug)]
pub struct PreviewCaptureSession {
    session: *mut ACameraCaptureSession,
    request: *mut ACaptureRequest,
    target: *mut ACameraOutputTarget,
    output: *mut ACaptureSessionOutput,
    container: *mut ACaptureSessionOutputContainer,
    // Boxed: the platform keeps this pointer until the session closes.
    state_callbacks: Box<ACameraCaptureSession_stateCallbacks>,
}

unsafe impl Send for PreviewCaptureSession {}

impl Drop for PreviewCaptureSession {
    fn drop(&mut self) {
        unsafe {
            if !self.session.is_null() {
                ACameraCaptureSession_stopRepeating(self.session);
                ACameraCaptureSession_close(self.session);
            }
            if !self.request.is_null() {
                ACaptureRequest_free(self.request);
            }
            if !self.target.is_null() {
                ACameraOutputTarget_free(self.target);
            }
            if !self.output.is_null() {
                ACaptureSessionOutput_free(self.output);
            }
            if !self.container.is_null() {
                ACaptureSessionOutputContainer_free(self.container);
            }
        }
    }
}

impl PreviewCaptureSession {
    /// Builds the output chain for `window` and starts repeating a
    /// `TEMPLATE_PREVIEW` request into it.
    pub fn start(device: *mut ACameraDevice, window: &NativeWindow) -> CameraResult<Self> {
        // Partially built sessions are torn down by Drop.
        let mut result = Self {
            session: null_mut(),
            request: null_mut(),
            target: null_mut(),
            output: null_mut(),
            container: null_mut(),
            state_callbacks: Box::new(ACameraCaptureSession_stateCallbacks {
                context: null_mut(),
                onClosed: None,
                onReady: None,
                onActive: None,
            }),
        };

        unsafe {
            CameraStatus::check(ACaptureSessionOutputContainer_create(&mut result.container))?;
            CameraStatus::check(ACaptureSessionOutput_create(window.handle, &mut result.output))?;
            CameraStatus::check(ACaptureSessionOutputContainer_add(
                result.container,
                result.output,
            ))?;
            CameraStatus::check(ACameraOutputTarget_create(window.handle, &mut result.target))?;
            CameraStatus::check(ACameraDevice_createCaptureRequest(
                device,
                ACameraDevice_request_template::TEMPLATE_PREVIEW,
                &mut result.request,
            ))?;
            CameraStatus::check(ACaptureRequest_addTarget(result.request, result.target))?;
            CameraStatus::check(ACameraDevice_createCaptureSession(
                device,
                result.container,
                &*result.state_callbacks,
                &mut result.session,
            ))?;

            let mut requests = result.request;
            CameraStatus::check(ACameraCaptureSession_setRepeatingRequest(
                result.session,
                null_mut(),
                1,
                &mut requests,
                null_mut(),
            ))?;
        }

        Ok(result)
    }
}
