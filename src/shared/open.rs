// This is free and unencumbered software released into the public domain.

use super::{CameraError, CameraProvider};

/// The platform's camera provider.
pub fn open_provider() -> Result<Box<dyn CameraProvider>, CameraError> {
    cfg_if::cfg_if! {
        if #[cfg(all(feature = "android", target_os = "android"))] {
            Ok(Box::new(super::drivers::android::AndroidCameraProvider::new()))
        } else {
            Err(CameraError::NoDriver)
        }
    }
}
