// This is free and unencumbered software released into the public domain.

use crate::shared::{CameraError, CameraOrientation, Facing, LayoutResult, PreviewSize};
use serde::{Deserialize, Serialize};
use std::{
    any::Any,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
        mpsc::{SyncSender, TrySendError},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraBackend {
    Android,
    Profile,
}

/// Fixed properties of a camera, known before it is opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub facing: Facing,
    /// Clockwise sensor mount angle in degrees.
    pub mount_angle: i32,
}

/// Platform surface the preview streams into. Drivers downcast it to their
/// own window type.
pub struct SurfaceHandle(Box<dyn Any + Send>);

impl SurfaceHandle {
    pub fn new(surface: impl Any + Send) -> Self {
        Self(Box::new(surface))
    }

    /// For hosts and drivers that stream nowhere (simulation, tests).
    pub fn detached() -> Self {
        Self::new(())
    }

    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        match self.0.downcast::<T>() {
            Ok(v) => Ok(*v),
            Err(other) => Err(Self(other)),
        }
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl core::fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SurfaceHandle(..)")
    }
}

/// An opened, exclusively owned camera. Dropping it releases the device.
pub trait CameraDevice: Send + dogma::Named {
    fn id(&self) -> &str;
    fn info(&self) -> CameraInfo;
    fn supported_preview_sizes(&self) -> Result<Vec<PreviewSize>, CameraError>;
    fn supported_picture_sizes(&self) -> Result<Vec<PreviewSize>, CameraError> {
        Ok(Vec::new())
    }
    fn set_display_orientation(&mut self, orientation: CameraOrientation)
    -> Result<(), CameraError>;
    fn set_preview_target(&mut self, surface: SurfaceHandle) -> Result<(), CameraError>;
    fn set_preview_size(&mut self, size: PreviewSize) -> Result<(), CameraError>;
    fn start_preview(&mut self) -> Result<(), CameraError>;
    fn stop_preview(&mut self) -> Result<(), CameraError>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub trait CameraProvider: Send {
    fn backend(&self) -> CameraBackend;
    fn camera_ids(&self) -> Result<Vec<String>, CameraError>;
    fn camera_info(&self, id: &str) -> Result<CameraInfo, CameraError>;
    fn open(&mut self, id: &str) -> Result<Box<dyn CameraDevice>, CameraError>;
}

#[derive(Debug)]
pub enum PreviewEvent {
    Opened {
        camera_id: String,
        orientation: CameraOrientation,
    },
    PreviewStarted {
        size: PreviewSize,
    },
    PreviewStopped,
    Released {
        camera_id: String,
    },
    Relayout {
        layout: LayoutResult,
    },
    Warning {
        message: String,
    },
    Error {
        error: CameraError,
    },
}

/// Sending half of the session's event channel. Never blocks: a full
/// channel drops the event and counts it.
#[derive(Clone, Debug)]
pub struct EventSink {
    tx: SyncSender<PreviewEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventSink {
    pub fn new(tx: SyncSender<PreviewEvent>) -> Self {
        Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn send(&self, event: PreviewEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {},
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            },
            // Nobody is listening.
            Err(TrySendError::Disconnected(_)) => {},
        }
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::sync_channel;

    #[test]
    fn full_channel_counts_drops() {
        let (tx, rx) = sync_channel(1);
        let sink = EventSink::new(tx);
        sink.send(PreviewEvent::PreviewStopped);
        sink.send(PreviewEvent::PreviewStopped);
        assert_eq!(sink.dropped(), 1);
        assert!(matches!(rx.try_recv(), Ok(PreviewEvent::PreviewStopped)));
    }

    #[test]
    fn disconnected_channel_is_silent() {
        let (tx, rx) = sync_channel(1);
        drop(rx);
        let sink = EventSink::new(tx);
        sink.send(PreviewEvent::PreviewStopped);
        assert_eq!(sink.dropped(), 0);
    }

    #[test]
    fn surface_handle_downcasts_to_its_type() {
        let handle = SurfaceHandle::new(42u32);
        assert!(handle.is::<u32>());
        let handle = handle.downcast::<String>().unwrap_err();
        assert_eq!(handle.downcast::<u32>().unwrap(), 42);
    }
}
