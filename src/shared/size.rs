// This is free and unencumbered software released into the public domain.

use crate::shared::CameraError;
use core::{fmt, str::FromStr};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A preview resolution reported as supported by the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
}

impl PreviewSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }
}

impl fmt::Display for PreviewSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for PreviewSize {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().replace('×', "x");
        let Some((w, h)) = s.split_once(['x', 'X']) else {
            return Err(CameraError::invalid_config(format!(
                "invalid size '{s}', use WxH (e.g., 1920x1080)"
            )));
        };
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| CameraError::invalid_config(format!("invalid width: {w}")))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| CameraError::invalid_config(format!("invalid height: {h}")))?;
        Ok(Self::new(width, height))
    }
}

impl Serialize for PreviewSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PreviewSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How the session picks a preview size from the camera's supported list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreviewSizing {
    /// The first size the camera reports.
    FirstSupported,
    /// The size whose aspect ratio is closest to `width:height`, in sensor
    /// coordinates.
    Aspect(u32, u32),
    /// The size whose aspect ratio is closest to the container's, once the
    /// container is mapped into sensor coordinates.
    #[default]
    Container,
}

/// Picks the candidate whose aspect ratio is closest to
/// `target_width / target_height`. Ties go to the earliest candidate.
pub fn select_best_preview_size(
    candidates: &[PreviewSize],
    target_width: u32,
    target_height: u32,
) -> Result<PreviewSize, CameraError> {
    let target_ratio = target_width as f64 / target_height as f64;

    let mut iter = candidates.iter().copied();
    let mut best = iter.next().ok_or(CameraError::NoCandidate)?;
    let mut best_diff = (best.ratio() - target_ratio).abs();

    for candidate in iter {
        let diff = (candidate.ratio() - target_ratio).abs();
        // NaN never compares less, so it cannot displace an earlier pick.
        if diff < best_diff || (best_diff.is_nan() && !diff.is_nan()) {
            best = candidate;
            best_diff = diff;
        }
    }

    Ok(best)
}
