// This is free and unencumbered software released into the public domain.

use crate::shared::{CameraOrientation, PreviewSizing};

/// How the display orientation of an opened camera is decided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationPolicy {
    /// From the camera's facing, mount angle, and the screen rotation.
    #[default]
    Computed,
    /// Always this orientation, whatever the camera or screen says.
    Fixed(CameraOrientation),
}

#[derive(Clone, Debug)]
pub struct PreviewConfig {
    pub camera_id: String,
    pub sizing: PreviewSizing,
    pub rotation: RotationPolicy,
    pub event_buffer: usize,
    pub diagnostics: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            camera_id: "0".into(),
            sizing: PreviewSizing::default(),
            rotation: RotationPolicy::default(),
            event_buffer: 16,
            diagnostics: false,
        }
    }
}

impl PreviewConfig {
    pub fn new(camera_id: impl Into<String>) -> Self {
        Self {
            camera_id: camera_id.into(),
            ..Default::default()
        }
    }

    pub fn with_sizing(mut self, sizing: PreviewSizing) -> Self {
        self.sizing = sizing;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_fixed_rotation(self, degrees: i32) -> Self {
        self.with_rotation(RotationPolicy::Fixed(CameraOrientation::from_degrees(degrees)))
    }

    pub fn with_event_buffer(mut self, n: usize) -> Self {
        self.event_buffer = n.max(1);
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }
}
