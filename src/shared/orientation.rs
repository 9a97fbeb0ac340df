// This is free and unencumbered software released into the public domain.

//! Sensor/screen rotation compensation.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Which way a camera lens points relative to the screen.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    #[display("front")]
    Front,
    #[default]
    #[display("back")]
    Back,
    #[display("external")]
    External,
}

impl Facing {
    /// Front lenses are mirrored relative to their physical mount.
    pub fn is_mirrored(self) -> bool {
        self == Facing::Front
    }
}

/// Current rotation of the display, in quarter turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScreenRotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl ScreenRotation {
    /// From the platform's surface rotation index (0..=3).
    /// Unknown indices count as the natural orientation.
    pub fn from_index(index: u32) -> Self {
        match index {
            1 => Self::Rotation90,
            2 => Self::Rotation180,
            3 => Self::Rotation270,
            _ => Self::Rotation0,
        }
    }

    /// Nearest quarter turn to `degrees`, any sign or magnitude.
    pub fn from_degrees(degrees: i32) -> Self {
        match CameraOrientation::from_degrees(degrees).degrees() {
            90 => Self::Rotation90,
            180 => Self::Rotation180,
            270 => Self::Rotation270,
            _ => Self::Rotation0,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Self::Rotation0 => 0,
            Self::Rotation90 => 90,
            Self::Rotation180 => 180,
            Self::Rotation270 => 270,
        }
    }
}

/// A clockwise rotation that is always one of 0, 90, 180 or 270 degrees.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{_0}")]
pub struct CameraOrientation(u16);

impl CameraOrientation {
    pub const DEG_0: Self = Self(0);
    pub const DEG_90: Self = Self(90);
    pub const DEG_180: Self = Self(180);
    pub const DEG_270: Self = Self(270);

    /// Normalizes into [0, 360) and snaps to the nearest quarter turn.
    pub fn from_degrees(degrees: i32) -> Self {
        let d = degrees.rem_euclid(360);
        let snapped = ((d + 45) / 90 * 90) % 360;
        Self(snapped as u16)
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    /// Whether the preview's width and height trade places on screen.
    pub fn swaps_axes(self) -> bool {
        self.0 == 90 || self.0 == 270
    }
}

impl From<ScreenRotation> for CameraOrientation {
    fn from(rotation: ScreenRotation) -> Self {
        Self(rotation.degrees())
    }
}

/// Display rotation needed so the preview appears upright.
///
/// `mount_angle` is the clockwise sensor mount angle, `screen_rotation` the
/// display rotation; both are normalized into [0, 360) first, so the result
/// is periodic in either argument.
pub fn compute_rotation(mount_angle: i32, facing: Facing, screen_rotation: i32) -> CameraOrientation {
    let mount = mount_angle.rem_euclid(360);
    let screen = screen_rotation.rem_euclid(360);

    let degrees = if facing.is_mirrored() {
        (360 - (mount + screen) % 360) % 360
    } else {
        (mount - screen + 360) % 360
    };

    CameraOrientation::from_degrees(degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rear_camera_in_natural_orientation() {
        assert_eq!(compute_rotation(90, Facing::Back, 0), CameraOrientation::DEG_90);
    }

    #[test]
    fn front_camera_in_natural_orientation() {
        assert_eq!(compute_rotation(90, Facing::Front, 0), CameraOrientation::DEG_270);
    }

    #[test]
    fn rear_camera_in_landscape() {
        assert_eq!(compute_rotation(90, Facing::Back, 90), CameraOrientation::DEG_0);
        assert_eq!(compute_rotation(90, Facing::Back, 270), CameraOrientation::DEG_180);
    }

    #[test]
    fn front_camera_in_landscape() {
        assert_eq!(compute_rotation(270, Facing::Front, 90), CameraOrientation::DEG_0);
        assert_eq!(compute_rotation(270, Facing::Front, 180), CameraOrientation::DEG_270);
    }

    #[test]
    fn external_camera_rotates_like_rear() {
        for mount in [0, 90, 180, 270] {
            for screen in [0, 90, 180, 270] {
                assert_eq!(
                    compute_rotation(mount, Facing::External, screen),
                    compute_rotation(mount, Facing::Back, screen),
                );
            }
        }
    }

    #[test]
    fn periodic_in_screen_rotation() {
        for facing in [Facing::Front, Facing::Back] {
            for mount in [0, 90, 180, 270] {
                for screen in [0, 90, 180, 270] {
                    assert_eq!(
                        compute_rotation(mount, facing, screen),
                        compute_rotation(mount, facing, screen + 360),
                        "mount={mount} facing={facing} screen={screen}",
                    );
                }
            }
        }
    }

    #[test]
    fn result_is_always_a_quarter_turn() {
        for facing in [Facing::Front, Facing::Back] {
            for mount in [0, 90, 180, 270] {
                for screen in [-90, 0, 90, 180, 270, 450] {
                    let d = compute_rotation(mount, facing, screen).degrees();
                    assert!(d < 360 && d % 90 == 0, "{d}");
                }
            }
        }
    }

    #[test]
    fn orientation_normalizes_and_snaps() {
        assert_eq!(CameraOrientation::from_degrees(-90), CameraOrientation::DEG_270);
        assert_eq!(CameraOrientation::from_degrees(720), CameraOrientation::DEG_0);
        assert_eq!(CameraOrientation::from_degrees(100), CameraOrientation::DEG_90);
        assert_eq!(CameraOrientation::from_degrees(350), CameraOrientation::DEG_0);
    }

    #[test]
    fn unknown_surface_rotation_index_is_natural() {
        assert_eq!(ScreenRotation::from_index(7), ScreenRotation::Rotation0);
        assert_eq!(ScreenRotation::from_index(3).degrees(), 270);
    }

    #[test]
    fn only_quarter_and_three_quarter_turns_swap_axes() {
        assert!(CameraOrientation::DEG_90.swaps_axes());
        assert!(CameraOrientation::DEG_270.swaps_axes());
        assert!(!CameraOrientation::DEG_0.swaps_axes());
        assert!(!CameraOrientation::DEG_180.swaps_axes());
    }
}
