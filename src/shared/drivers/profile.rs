// This is free and unencumbered software released into the public domain.

//! Cameras described by a static JSON profile instead of hardware.
//!
//! ```json
//! {"cameras": [
//!   {"id": "0", "facing": "back", "mount_angle": 90,
//!    "preview_sizes": ["1920x1080", "1280x720", "640x480"]}
//! ]}
//! ```

use crate::shared::{
    CameraBackend, CameraDevice, CameraError, CameraInfo, CameraOrientation, CameraProvider,
    Facing, PreviewSize, SurfaceHandle,
};
use alloc::borrow::Cow;
use serde::{Deserialize, Serialize};
use std::{any::Any, path::Path};

fn available_by_default() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraProfile {
    pub id: String,
    #[serde(default)]
    pub facing: Facing,
    #[serde(default)]
    pub mount_angle: i32,
    pub preview_sizes: Vec<PreviewSize>,
    #[serde(default)]
    pub picture_sizes: Vec<PreviewSize>,
    /// When false, opening the camera fails as if another app held it.
    #[serde(default = "available_by_default")]
    pub available: bool,
}

impl CameraProfile {
    pub fn info(&self) -> CameraInfo {
        CameraInfo {
            facing: self.facing,
            mount_angle: self.mount_angle,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub cameras: Vec<CameraProfile>,
}

impl DeviceProfile {
    /// A typical phone: rear sensor mounted at 90°, front at 270°.
    pub fn builtin() -> Self {
        let sizes = |list: &[(u32, u32)]| -> Vec<PreviewSize> {
            list.iter().map(|&(w, h)| PreviewSize::new(w, h)).collect()
        };
        Self {
            cameras: vec![
                CameraProfile {
                    id: "0".into(),
                    facing: Facing::Back,
                    mount_angle: 90,
                    preview_sizes: sizes(&[
                        (1920, 1080),
                        (1440, 1080),
                        (1280, 720),
                        (960, 720),
                        (640, 480),
                        (352, 288),
                    ]),
                    picture_sizes: sizes(&[(4032, 3024), (4032, 2268), (3024, 3024)]),
                    available: true,
                },
                CameraProfile {
                    id: "1".into(),
                    facing: Facing::Front,
                    mount_angle: 270,
                    preview_sizes: sizes(&[(1280, 720), (640, 480), (320, 240)]),
                    picture_sizes: sizes(&[(2592, 1944), (2560, 1440)]),
                    available: true,
                },
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CameraError> {
        serde_json::from_str(json).map_err(|e| CameraError::driver("parsing camera profile", e))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CameraError::driver("reading camera profile", e))?;
        Self::from_json(&json)
    }

    pub fn camera(&self, id: &str) -> Option<&CameraProfile> {
        self.cameras.iter().find(|c| c.id == id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProfileCameraProvider {
    profile: DeviceProfile,
}

impl ProfileCameraProvider {
    pub fn new(profile: DeviceProfile) -> Self {
        Self { profile }
    }

    pub fn builtin() -> Self {
        Self::new(DeviceProfile::builtin())
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    fn lookup(&self, id: &str) -> Result<&CameraProfile, CameraError> {
        self.profile.camera(id).ok_or(CameraError::NoCamera)
    }
}

impl CameraProvider for ProfileCameraProvider {
    fn backend(&self) -> CameraBackend {
        CameraBackend::Profile
    }

    fn camera_ids(&self) -> Result<Vec<String>, CameraError> {
        Ok(self.profile.cameras.iter().map(|c| c.id.clone()).collect())
    }

    fn camera_info(&self, id: &str) -> Result<CameraInfo, CameraError> {
        Ok(self.lookup(id)?.info())
    }

    fn open(&mut self, id: &str) -> Result<Box<dyn CameraDevice>, CameraError> {
        let profile = self.lookup(id)?;
        if !profile.available {
            return Err(CameraError::unavailable(id));
        }
        Ok(Box::new(ProfileCamera::new(profile.clone())))
    }
}

/// An opened profile camera. Records what the session asked of it.
#[derive(Debug)]
pub struct ProfileCamera {
    profile: CameraProfile,
    pub display_orientation: Option<CameraOrientation>,
    pub preview_size: Option<PreviewSize>,
    pub has_target: bool,
    pub streaming: bool,
    pub starts: u32,
    pub stops: u32,
}

impl ProfileCamera {
    pub fn new(profile: CameraProfile) -> Self {
        Self {
            profile,
            display_orientation: None,
            preview_size: None,
            has_target: false,
            streaming: false,
            starts: 0,
            stops: 0,
        }
    }
}

impl dogma::Named for ProfileCamera {
    fn name(&self) -> Cow<'_, str> {
        "profile".into()
    }
}

impl CameraDevice for ProfileCamera {
    fn id(&self) -> &str {
        &self.profile.id
    }

    fn info(&self) -> CameraInfo {
        self.profile.info()
    }

    fn supported_preview_sizes(&self) -> Result<Vec<PreviewSize>, CameraError> {
        Ok(self.profile.preview_sizes.clone())
    }

    fn supported_picture_sizes(&self) -> Result<Vec<PreviewSize>, CameraError> {
        Ok(self.profile.picture_sizes.clone())
    }

    fn set_display_orientation(
        &mut self,
        orientation: CameraOrientation,
    ) -> Result<(), CameraError> {
        self.display_orientation = Some(orientation);
        Ok(())
    }

    fn set_preview_target(&mut self, _surface: SurfaceHandle) -> Result<(), CameraError> {
        self.has_target = true;
        Ok(())
    }

    fn set_preview_size(&mut self, size: PreviewSize) -> Result<(), CameraError> {
        if !self.profile.preview_sizes.contains(&size) {
            return Err(CameraError::unsupported(format!("preview size {size}")));
        }
        if self.streaming {
            return Err(CameraError::other("preview size changed while streaming"));
        }
        self.preview_size = Some(size);
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), CameraError> {
        if !self.has_target {
            return Err(CameraError::other("no preview target"));
        }
        if !self.streaming {
            self.streaming = true;
            self.starts += 1;
        }
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<(), CameraError> {
        if self.streaming {
            self.streaming = false;
            self.stops += 1;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
