// This is free and unencumbered software released into the public domain.

//! Thin adapters mirroring the host's preview view.
//!
//! The session computes layouts; an adapter holds the view-side state the
//! host reads back and pushes into the platform view.

use crate::shared::{LayoutResult, LayoutTracker, PreviewSize, ViewBounds};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Texture,
    Surface,
}

pub trait PreviewView {
    fn kind(&self) -> ViewKind;

    /// Bounds of the container the preview sits in.
    fn container(&self) -> ViewBounds;

    fn set_container(&mut self, bounds: ViewBounds);

    /// Layout params currently assigned to the preview view.
    fn layout_params(&self) -> Option<LayoutResult>;

    /// Assigns `layout`. Returns whether a relayout was requested.
    fn apply_layout(&mut self, layout: LayoutResult) -> bool;

    fn show_resolution(&mut self, _size: PreviewSize) {}

    /// Forgets view-side state when the surface goes away.
    fn reset(&mut self) {}
}

/// Adapter for the texture-backed preview.
#[derive(Clone, Debug, Default)]
pub struct TextureViewAdapter {
    container: ViewBounds,
    tracker: LayoutTracker,
    relayouts: u32,
}

impl TextureViewAdapter {
    pub fn new(container: ViewBounds) -> Self {
        Self {
            container,
            ..Default::default()
        }
    }

    /// How many relayouts have been requested so far.
    pub fn relayouts(&self) -> u32 {
        self.relayouts
    }
}

impl PreviewView for TextureViewAdapter {
    fn kind(&self) -> ViewKind {
        ViewKind::Texture
    }

    fn container(&self) -> ViewBounds {
        self.container
    }

    fn set_container(&mut self, bounds: ViewBounds) {
        self.container = bounds;
    }

    fn layout_params(&self) -> Option<LayoutResult> {
        self.tracker.last()
    }

    fn apply_layout(&mut self, layout: LayoutResult) -> bool {
        let changed = self.tracker.update(layout);
        if changed {
            self.relayouts += 1;
        }
        changed
    }

    fn reset(&mut self) {
        self.tracker.reset();
    }
}

/// The legacy surface view measures itself at a fixed 4:3 portrait aspect.
pub const SURFACE_ASPECT: f32 = 1.333;

/// Adapter for the legacy surface-backed preview, which also shows the
/// chosen resolution in a label.
#[derive(Clone, Debug, Default)]
pub struct SurfaceViewAdapter {
    inner: TextureViewAdapter,
    label: Option<String>,
}

impl SurfaceViewAdapter {
    pub fn new(container: ViewBounds) -> Self {
        Self {
            inner: TextureViewAdapter::new(container),
            label: None,
        }
    }

    /// Measured size for a given width: height follows the fixed aspect.
    pub fn measure(width: u32) -> ViewBounds {
        ViewBounds::new(width, (width as f32 * SURFACE_ASPECT).round() as u32)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn relayouts(&self) -> u32 {
        self.inner.relayouts()
    }
}

impl PreviewView for SurfaceViewAdapter {
    fn kind(&self) -> ViewKind {
        ViewKind::Surface
    }

    fn container(&self) -> ViewBounds {
        self.inner.container()
    }

    fn set_container(&mut self, bounds: ViewBounds) {
        self.inner.set_container(bounds);
    }

    fn layout_params(&self) -> Option<LayoutResult> {
        self.inner.layout_params()
    }

    fn apply_layout(&mut self, layout: LayoutResult) -> bool {
        self.inner.apply_layout(layout)
    }

    fn show_resolution(&mut self, size: PreviewSize) {
        self.label = Some(size.to_string());
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.label = None;
    }
}
