// This is free and unencumbered software released into the public domain.

//! Fitting the preview view into its container.

use crate::shared::{CameraOrientation, PreviewSize};
use serde::Serialize;

/// Size of the container the preview is drawn into, as measured by the
/// host's layout pass. Zero means not yet measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ViewBounds {
    pub width: u32,
    pub height: u32,
}

impl ViewBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_measured(self) -> bool {
        self.width != 0 && self.height != 0
    }
}

/// Size to assign to the preview view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct LayoutResult {
    pub width: u32,
    pub height: u32,
}

impl LayoutResult {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Size with the (rotated) preview's aspect ratio that matches the container
/// along one dimension. The container dimension whose ratio is the tighter
/// fit is matched; the other side may extend past the container.
///
/// Returns `None` while the container is unmeasured, meaning the current
/// layout should be left unchanged.
pub fn fit_layout(
    preview: PreviewSize,
    rotation: CameraOrientation,
    container: ViewBounds,
) -> Option<LayoutResult> {
    let preview = if rotation.swaps_axes() {
        preview.transposed()
    } else {
        preview
    };

    if !container.is_measured() || preview.width == 0 || preview.height == 0 {
        return None;
    }

    let (pw, ph) = (preview.width as u64, preview.height as u64);
    let (cw, ch) = (container.width as u64, container.height as u64);

    // pw/ph < cw/ch
    let result = if pw * ch < cw * ph {
        LayoutResult::new(container.width, (cw * ph / pw) as u32)
    } else {
        LayoutResult::new((ch * pw / ph) as u32, container.height)
    };

    Some(result)
}

/// Remembers the last applied layout so unchanged results skip a relayout.
#[derive(Clone, Debug, Default)]
pub struct LayoutTracker {
    last: Option<LayoutResult>,
}

impl LayoutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<LayoutResult> {
        self.last
    }

    /// Records `layout`, returning whether it differs from the previous one.
    pub fn update(&mut self, layout: LayoutResult) -> bool {
        let changed = self.last != Some(layout);
        self.last = Some(layout);
        changed
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
