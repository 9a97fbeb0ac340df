//! Preview session lifecycle against profile cameras.

use asimov_camera_preview::shared::{drivers::profile::*, *};
use std::error::Error as _;

const PORTRAIT: ViewBounds = ViewBounds::new(1080, 1920);

fn texture_session(
    config: PreviewConfig,
    container: ViewBounds,
) -> PreviewSession<TextureViewAdapter> {
    PreviewSession::new(
        config,
        Box::new(ProfileCameraProvider::builtin()),
        TextureViewAdapter::new(container),
    )
}

fn available(rotation: ScreenRotation) -> SurfaceEvent {
    SurfaceEvent::Available {
        surface: SurfaceHandle::detached(),
        screen_rotation: rotation,
    }
}

fn camera(session: &PreviewSession<impl PreviewView>) -> &ProfileCamera {
    session.camera_as::<ProfileCamera>().expect("profile camera open")
}

fn drain(session: &PreviewSession<impl PreviewView>) -> Vec<PreviewEvent> {
    session.events().try_iter().collect()
}

#[test]
fn rear_camera_in_portrait_starts_previewing() {
    let mut session = texture_session(PreviewConfig::default(), PORTRAIT);

    let layout = session.handle(available(ScreenRotation::Rotation0)).unwrap();

    assert_eq!(session.state(), SessionState::Previewing);
    assert_eq!(session.orientation(), CameraOrientation::DEG_90);
    assert_eq!(session.preview_size(), Some(PreviewSize::new(1920, 1080)));
    assert_eq!(layout, Some(LayoutResult::new(1080, 1920)));

    let cam = camera(&session);
    assert!(cam.streaming);
    assert!(cam.has_target);
    assert_eq!(cam.display_orientation, Some(CameraOrientation::DEG_90));
    assert_eq!(cam.preview_size, Some(PreviewSize::new(1920, 1080)));

    let events = drain(&session);
    assert!(matches!(
        events.as_slice(),
        [
            PreviewEvent::Opened { orientation: CameraOrientation::DEG_90, .. },
            PreviewEvent::PreviewStarted { .. },
            PreviewEvent::Relayout { .. },
        ]
    ));
}

#[test]
fn rear_camera_in_landscape_needs_no_rotation() {
    let mut session = texture_session(PreviewConfig::default(), ViewBounds::new(1920, 1080));
    let layout = session.handle(available(ScreenRotation::Rotation90)).unwrap();
    assert_eq!(session.orientation(), CameraOrientation::DEG_0);
    assert_eq!(layout, Some(LayoutResult::new(1920, 1080)));
}

#[test]
fn front_camera_is_mirrored() {
    let mut session = texture_session(PreviewConfig::new("1"), PORTRAIT);
    session.handle(available(ScreenRotation::Rotation0)).unwrap();
    assert_eq!(session.orientation(), CameraOrientation::DEG_90);
    assert_eq!(session.preview_size(), Some(PreviewSize::new(1280, 720)));

    session.handle(SurfaceEvent::Destroyed).unwrap();
    session.handle(available(ScreenRotation::Rotation90)).unwrap();
    assert_eq!(session.orientation(), CameraOrientation::DEG_0);
}

#[test]
fn fixed_rotation_overrides_the_sensor() {
    let config = PreviewConfig::new("1").with_fixed_rotation(90);
    let mut session = texture_session(config, PORTRAIT);
    session.handle(available(ScreenRotation::Rotation90)).unwrap();
    assert_eq!(session.orientation(), CameraOrientation::DEG_90);
    assert_eq!(camera(&session).display_orientation, Some(CameraOrientation::DEG_90));
}

#[test]
fn unavailable_camera_is_reported_not_raised() {
    let mut profile = DeviceProfile::builtin();
    profile.cameras[0].available = false;
    let mut session = PreviewSession::new(
        PreviewConfig::default(),
        Box::new(ProfileCameraProvider::new(profile)),
        TextureViewAdapter::new(PORTRAIT),
    );

    let err = session.handle(available(ScreenRotation::Rotation0)).unwrap_err();
    assert!(matches!(err, CameraError::CameraUnavailable { .. }));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.camera().is_none());
    assert!(matches!(
        drain(&session).as_slice(),
        [PreviewEvent::Error { error: CameraError::CameraUnavailable { .. } }]
    ));
}

#[test]
fn missing_camera_surfaces_as_unavailable_with_cause() {
    let mut session = texture_session(PreviewConfig::new("7"), PORTRAIT);
    let err = session.handle(available(ScreenRotation::Rotation0)).unwrap_err();
    assert!(matches!(&err, CameraError::CameraUnavailable { id, .. } if id == "7"));
    assert_eq!(
        err.source().map(ToString::to_string).as_deref(),
        Some("no camera device available")
    );
}

#[test]
fn camera_without_preview_sizes_is_released() {
    let profile = DeviceProfile::from_json(
        r#"{"cameras":[{"id":"0","facing":"back","mount_angle":90,"preview_sizes":[]}]}"#,
    )
    .unwrap();
    let mut session = PreviewSession::new(
        PreviewConfig::default(),
        Box::new(ProfileCameraProvider::new(profile)),
        TextureViewAdapter::new(PORTRAIT),
    );

    let err = session.handle(available(ScreenRotation::Rotation0)).unwrap_err();
    assert!(matches!(err, CameraError::NoCandidate));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.camera().is_none());
    assert!(matches!(
        drain(&session).as_slice(),
        [PreviewEvent::Opened { .. }, PreviewEvent::Released { .. }]
    ));
}

#[test]
fn pause_and_resume_toggle_streaming() {
    let mut session = texture_session(PreviewConfig::default(), PORTRAIT);
    session.handle(available(ScreenRotation::Rotation0)).unwrap();

    session.handle(SurfaceEvent::Pause).unwrap();
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(!camera(&session).streaming);

    // Pausing twice is harmless.
    session.handle(SurfaceEvent::Pause).unwrap();
    assert_eq!(camera(&session).stops, 1);

    session.handle(SurfaceEvent::Resume).unwrap();
    assert_eq!(session.state(), SessionState::Previewing);
    assert!(camera(&session).streaming);
    assert_eq!(camera(&session).starts, 2);
}

#[test]
fn resume_without_camera_is_a_no_op() {
    let mut session = texture_session(PreviewConfig::default(), PORTRAIT);
    assert_eq!(session.handle(SurfaceEvent::Resume).unwrap(), None);
    assert_eq!(session.state(), SessionState::Idle);
    assert!(drain(&session).is_empty());
}

#[test]
fn size_change_restarts_preview_with_a_new_size() {
    let mut session = texture_session(PreviewConfig::default(), PORTRAIT);
    session.handle(available(ScreenRotation::Rotation0)).unwrap();

    let layout = session
        .handle(SurfaceEvent::SizeChanged {
            bounds: ViewBounds::new(1080, 1440),
        })
        .unwrap();

    assert_eq!(session.preview_size(), Some(PreviewSize::new(1440, 1080)));
    assert_eq!(layout, Some(LayoutResult::new(1080, 1440)));
    assert_eq!(session.state(), SessionState::Previewing);
    let cam = camera(&session);
    assert_eq!((cam.starts, cam.stops), (2, 1));
}

#[test]
fn size_change_while_paused_stays_paused() {
    let mut session = texture_session(PreviewConfig::default(), PORTRAIT);
    session.handle(available(ScreenRotation::Rotation0)).unwrap();
    session.handle(SurfaceEvent::Pause).unwrap();

    session
        .handle(SurfaceEvent::SizeChanged {
            bounds: ViewBounds::new(1080, 1440),
        })
        .unwrap();

    assert_eq!(session.state(), SessionState::Stopped);
    assert!(!camera(&session).streaming);
    assert_eq!(camera(&session).preview_size, Some(PreviewSize::new(1440, 1080)));
}

#[test]
fn unchanged_layout_skips_relayout() {
    let mut session = texture_session(PreviewConfig::default(), PORTRAIT);
    session.handle(available(ScreenRotation::Rotation0)).unwrap();

    assert_eq!(session.resize_container(PORTRAIT), None);
    assert_eq!(session.view().relayouts(), 1);

    let layout = session.resize_container(ViewBounds::new(720, 1280));
    assert_eq!(layout, Some(LayoutResult::new(720, 1280)));
    assert_eq!(session.view().relayouts(), 2);
}

#[test]
fn unmeasured_container_defers_layout() {
    let mut session = texture_session(PreviewConfig::default(), ViewBounds::default());

    let layout = session.handle(available(ScreenRotation::Rotation0)).unwrap();
    assert_eq!(layout, None);
    assert_eq!(session.preview_size(), Some(PreviewSize::new(1920, 1080)));

    let layout = session
        .handle(SurfaceEvent::SizeChanged { bounds: PORTRAIT })
        .unwrap();
    assert_eq!(layout, Some(LayoutResult::new(1080, 1920)));
}

#[test]
fn destroying_the_surface_releases_the_camera() {
    let mut session = texture_session(PreviewConfig::default(), PORTRAIT);
    session.handle(available(ScreenRotation::Rotation0)).unwrap();
    drain(&session);

    session.handle(SurfaceEvent::Destroyed).unwrap();

    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.camera().is_none());
    assert_eq!(session.preview_size(), None);
    assert_eq!(session.view().layout_params(), None);
    assert!(matches!(
        drain(&session).as_slice(),
        [PreviewEvent::Released { camera_id }] if camera_id == "0"
    ));
}

#[test]
fn reopening_replaces_the_open_camera() {
    let mut session = texture_session(PreviewConfig::default(), PORTRAIT);
    session.handle(available(ScreenRotation::Rotation0)).unwrap();
    session.handle(available(ScreenRotation::Rotation0)).unwrap();

    assert_eq!(session.state(), SessionState::Previewing);
    assert_eq!(camera(&session).starts, 1);
    let events = drain(&session);
    assert!(events.iter().any(|e| matches!(e, PreviewEvent::Warning { .. })));
    assert!(events.iter().any(|e| matches!(e, PreviewEvent::Released { .. })));
}

#[test]
fn surface_variant_labels_the_resolution() {
    let mut session = PreviewSession::new(
        PreviewConfig::default(),
        Box::new(ProfileCameraProvider::builtin()),
        SurfaceViewAdapter::new(SurfaceViewAdapter::measure(1080)),
    );

    let layout = session.handle(available(ScreenRotation::Rotation0)).unwrap();

    assert_eq!(session.view().label(), Some("1440x1080"));
    assert_eq!(layout, Some(LayoutResult::new(1080, 1440)));
}

#[test]
fn full_event_buffer_drops_events() {
    let config = PreviewConfig::default().with_event_buffer(1);
    let mut session = texture_session(config, PORTRAIT);
    session.handle(available(ScreenRotation::Rotation0)).unwrap();
    assert_eq!(drain(&session).len(), 1);
    assert_eq!(session.dropped_events(), 2);
}
