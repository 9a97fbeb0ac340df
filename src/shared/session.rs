// This is free and unencumbered software released into the public domain.

//! The preview session state machine.
//!
//! ```text
//!            Available            (configured)
//!   Idle ──────────────▶ Opening ─────────────▶ Previewing
//!    ▲                      │                    │     ▲
//!    │   open/configure     │               Pause│     │Resume
//!    ├──────────────────────┘                    ▼     │
//!    │                                          Stopped
//!    │              Destroyed (from any state)     │
//!    └─────────────────────────────────────────────┘
//! ```
//!
//! The camera device is acquired on `Available` and released on
//! `Destroyed`; at most one is open at a time.

use crate::shared::{
    CameraDevice, CameraError, CameraOrientation, CameraProvider, EventSink, LayoutResult,
    PreviewConfig, PreviewEvent, PreviewSize, PreviewSizing, PreviewView, RotationPolicy,
    ScreenRotation, SurfaceHandle, ViewBounds, compute_rotation, fit_layout,
    select_best_preview_size,
};
use derive_more::Display;
use std::sync::mpsc::{Receiver, sync_channel};

#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Opening,
    Previewing,
    Stopped,
}

/// Surface lifecycle callbacks forwarded by the host.
#[derive(Debug)]
pub enum SurfaceEvent {
    Available {
        surface: SurfaceHandle,
        screen_rotation: ScreenRotation,
    },
    SizeChanged {
        bounds: ViewBounds,
    },
    Destroyed,
    Resume,
    Pause,
}

pub struct PreviewSession<V: PreviewView> {
    config: PreviewConfig,
    provider: Box<dyn CameraProvider>,
    view: V,
    camera: Option<Box<dyn CameraDevice>>,
    state: SessionState,
    orientation: CameraOrientation,
    preview_size: Option<PreviewSize>,
    events: EventSink,
    events_rx: Receiver<PreviewEvent>,
}

impl<V: PreviewView> core::fmt::Debug for PreviewSession<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PreviewSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("orientation", &self.orientation)
            .field("preview_size", &self.preview_size)
            .field("camera", &self.camera.as_ref().map(|c| c.id().to_string()))
            .finish()
    }
}

impl<V: PreviewView> PreviewSession<V> {
    pub fn new(config: PreviewConfig, provider: Box<dyn CameraProvider>, view: V) -> Self {
        let (tx, events_rx) = sync_channel(config.event_buffer.max(1));
        Self {
            config,
            provider,
            view,
            camera: None,
            state: SessionState::Idle,
            orientation: CameraOrientation::default(),
            preview_size: None,
            events: EventSink::new(tx),
            events_rx,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Display orientation of the open camera, fixed until it is reopened.
    pub fn orientation(&self) -> CameraOrientation {
        self.orientation
    }

    pub fn preview_size(&self) -> Option<PreviewSize> {
        self.preview_size
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn events(&self) -> &Receiver<PreviewEvent> {
        &self.events_rx
    }

    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    pub fn camera(&self) -> Option<&dyn CameraDevice> {
        self.camera.as_deref()
    }

    pub fn camera_as<T: 'static>(&self) -> Option<&T> {
        self.camera.as_ref()?.as_any().downcast_ref::<T>()
    }

    /// Feeds one surface event through the state machine.
    ///
    /// Returns the new layout when the preview view needs a relayout.
    pub fn handle(&mut self, event: SurfaceEvent) -> Result<Option<LayoutResult>, CameraError> {
        #[cfg(feature = "tracing")]
        asimov_module::tracing::trace!(target: "asimov_camera_preview", state = %self.state, ?event, "surface event");

        match event {
            SurfaceEvent::Available {
                surface,
                screen_rotation,
            } => self.open(surface, screen_rotation),
            SurfaceEvent::SizeChanged { bounds } => self.size_changed(bounds),
            SurfaceEvent::Destroyed => {
                self.release();
                Ok(None)
            },
            SurfaceEvent::Resume => self.resume(),
            SurfaceEvent::Pause => self.pause(),
        }
    }

    /// The container was re-measured without the surface changing.
    pub fn resize_container(&mut self, bounds: ViewBounds) -> Option<LayoutResult> {
        self.view.set_container(bounds);
        self.relayout()
    }

    fn open(
        &mut self,
        surface: SurfaceHandle,
        screen_rotation: ScreenRotation,
    ) -> Result<Option<LayoutResult>, CameraError> {
        if self.camera.is_some() {
            self.events.send(PreviewEvent::Warning {
                message: "surface became available with a camera already open".into(),
            });
            self.release();
        }

        self.state = SessionState::Opening;
        let id = self.config.camera_id.clone();

        let mut camera = match self.provider.open(&id) {
            Ok(camera) => camera,
            Err(err) => {
                self.state = SessionState::Idle;
                self.events.send(PreviewEvent::Error {
                    error: CameraError::unavailable(&id),
                });
                return Err(match err {
                    err @ CameraError::CameraUnavailable { .. } => err,
                    err => CameraError::unavailable_with(id, err),
                });
            },
        };

        let orientation = match self.config.rotation {
            RotationPolicy::Computed => {
                let info = camera.info();
                compute_rotation(
                    info.mount_angle,
                    info.facing,
                    screen_rotation.degrees() as i32,
                )
            },
            RotationPolicy::Fixed(orientation) => orientation,
        };

        let configured = camera
            .set_display_orientation(orientation)
            .and_then(|()| camera.set_preview_target(surface));
        if let Err(err) = configured {
            self.state = SessionState::Idle;
            return Err(err);
        }

        if self.config.diagnostics {
            self.log_supported_sizes(&*camera);
        }

        #[cfg(feature = "tracing")]
        asimov_module::tracing::debug!(target: "asimov_camera_preview", camera = %id, %orientation, "camera opened");

        self.orientation = orientation;
        self.camera = Some(camera);
        self.events.send(PreviewEvent::Opened {
            camera_id: id,
            orientation,
        });

        if let Err(err) = self.configure_preview(true) {
            self.release();
            return Err(err);
        }
        Ok(self.relayout())
    }

    fn size_changed(&mut self, bounds: ViewBounds) -> Result<Option<LayoutResult>, CameraError> {
        self.view.set_container(bounds);

        match self.state {
            SessionState::Previewing => self.configure_preview(true)?,
            SessionState::Stopped => self.configure_preview(false)?,
            SessionState::Idle | SessionState::Opening => return Ok(None),
        }
        Ok(self.relayout())
    }

    fn resume(&mut self) -> Result<Option<LayoutResult>, CameraError> {
        if self.state != SessionState::Stopped {
            return Ok(None);
        }
        let Some(camera) = self.camera.as_mut() else {
            return Ok(None);
        };
        camera.start_preview()?;
        self.state = SessionState::Previewing;
        if let Some(size) = self.preview_size {
            self.events.send(PreviewEvent::PreviewStarted { size });
        }
        Ok(None)
    }

    fn pause(&mut self) -> Result<Option<LayoutResult>, CameraError> {
        if self.state != SessionState::Previewing {
            return Ok(None);
        }
        let Some(camera) = self.camera.as_mut() else {
            return Ok(None);
        };
        camera.stop_preview()?;
        self.state = SessionState::Stopped;
        self.events.send(PreviewEvent::PreviewStopped);
        Ok(None)
    }

    /// Stops streaming if needed, picks and applies a preview size, and
    /// restarts streaming when `stream` is set.
    fn configure_preview(&mut self, stream: bool) -> Result<(), CameraError> {
        let Some(camera) = self.camera.as_mut() else {
            return Ok(());
        };

        if self.state == SessionState::Previewing {
            camera.stop_preview()?;
            self.state = SessionState::Stopped;
            self.events.send(PreviewEvent::PreviewStopped);
        }

        let sizes = camera.supported_preview_sizes()?;
        let size = choose_preview_size(
            self.config.sizing,
            &sizes,
            self.orientation,
            self.view.container(),
        )?;
        camera.set_preview_size(size)?;
        self.preview_size = Some(size);
        self.view.show_resolution(size);

        if stream {
            camera.start_preview()?;
            self.state = SessionState::Previewing;
            self.events.send(PreviewEvent::PreviewStarted { size });
        } else {
            self.state = SessionState::Stopped;
        }
        Ok(())
    }

    fn relayout(&mut self) -> Option<LayoutResult> {
        let size = self.preview_size?;
        let layout = fit_layout(size, self.orientation, self.view.container())?;
        if !self.view.apply_layout(layout) {
            return None;
        }
        self.events.send(PreviewEvent::Relayout { layout });
        Some(layout)
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if self.state == SessionState::Previewing {
                if let Err(err) = camera.stop_preview() {
                    self.events.send(PreviewEvent::Warning {
                        message: format!("stopping preview: {err}"),
                    });
                }
            }
            let camera_id = camera.id().to_string();
            drop(camera);

            #[cfg(feature = "tracing")]
            asimov_module::tracing::debug!(target: "asimov_camera_preview", camera = %camera_id, "camera released");

            self.events.send(PreviewEvent::Released { camera_id });
        }
        self.preview_size = None;
        self.view.reset();
        self.state = SessionState::Idle;
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn log_supported_sizes(&self, camera: &dyn CameraDevice) {
        let preview = camera.supported_preview_sizes().unwrap_or_default();
        let picture = camera.supported_picture_sizes().unwrap_or_default();

        #[cfg(feature = "tracing")]
        asimov_module::tracing::info!(
            target: "asimov_camera_preview",
            camera = camera.id(),
            preview = ?preview.iter().map(ToString::to_string).collect::<Vec<_>>(),
            picture = ?picture.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "supported sizes"
        );
    }
}

impl<V: PreviewView> Drop for PreviewSession<V> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Applies `sizing` to the camera's supported sizes.
pub fn choose_preview_size(
    sizing: PreviewSizing,
    supported: &[PreviewSize],
    orientation: CameraOrientation,
    container: ViewBounds,
) -> Result<PreviewSize, CameraError> {
    match sizing {
        PreviewSizing::Aspect(width, height) => select_best_preview_size(supported, width, height),
        PreviewSizing::Container if container.is_measured() => {
            // Sensor coordinates: undo the display rotation.
            let (width, height) = if orientation.swaps_axes() {
                (container.height, container.width)
            } else {
                (container.width, container.height)
            };
            select_best_preview_size(supported, width, height)
        },
        PreviewSizing::FirstSupported | PreviewSizing::Container => {
            supported.first().copied().ok_or(CameraError::NoCandidate)
        },
    }
}
