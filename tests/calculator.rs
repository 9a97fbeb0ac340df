//! Preview sizing and orientation, through the public API.

use asimov_camera_preview::shared::*;

#[test]
fn rotation_matches_reference_devices() {
    // Rear sensor mounted at 90°, phone upright.
    assert_eq!(compute_rotation(90, Facing::Back, 0).degrees(), 90);
    // Front sensor mounted at 90°, phone upright.
    assert_eq!(compute_rotation(90, Facing::Front, 0).degrees(), 270);
}

#[test]
fn rotation_is_periodic_for_every_mount_and_screen() {
    for facing in [Facing::Front, Facing::Back, Facing::External] {
        for mount in (0..360).step_by(90) {
            for screen in (0..360).step_by(90) {
                let base = compute_rotation(mount, facing, screen);
                assert_eq!(base, compute_rotation(mount, facing, screen + 360));
                assert_eq!(base, compute_rotation(mount, facing, screen - 360));
            }
        }
    }
}

#[test]
fn widescreen_target_prefers_widescreen_entry() {
    let candidates = [
        PreviewSize::new(640, 480),
        PreviewSize::new(800, 600),
        PreviewSize::new(1280, 720),
        PreviewSize::new(1920, 1080),
    ];
    assert_eq!(
        select_best_preview_size(&candidates, 16, 9).unwrap(),
        PreviewSize::new(1280, 720)
    );
}

#[test]
fn selection_without_candidates_is_recoverable() {
    assert!(matches!(
        select_best_preview_size(&[], 16, 9),
        Err(CameraError::NoCandidate)
    ));
}

#[test]
fn layout_of_full_hd_in_square_container() {
    assert_eq!(
        fit_layout(
            PreviewSize::new(1920, 1080),
            CameraOrientation::DEG_0,
            ViewBounds::new(1000, 1000)
        ),
        Some(LayoutResult::new(1777, 1000))
    );
}

#[test]
fn layout_of_unmeasured_container_is_unchanged() {
    assert_eq!(
        fit_layout(
            PreviewSize::new(1920, 1080),
            CameraOrientation::DEG_90,
            ViewBounds::new(0, 1000)
        ),
        None
    );
}

#[test]
fn layout_keeps_preview_aspect_ratio() {
    let preview = PreviewSize::new(1280, 720);
    for (w, h) in [(1080, 1920), (1920, 1080), (720, 720), (1440, 1080)] {
        for rotation in [CameraOrientation::DEG_0, CameraOrientation::DEG_90] {
            let layout = fit_layout(preview, rotation, ViewBounds::new(w, h)).unwrap();
            let shown = if rotation.swaps_axes() {
                preview.transposed()
            } else {
                preview
            };
            // One side matches the container exactly.
            assert!(layout.width == w || layout.height == h, "{layout:?} in {w}x{h}");
            // The other follows the preview ratio, up to truncation.
            let expected_h = layout.width as u64 * shown.height as u64 / shown.width as u64;
            let expected_w = layout.height as u64 * shown.width as u64 / shown.height as u64;
            assert!(
                layout.height as u64 == expected_h || layout.width as u64 == expected_w,
                "{layout:?} for {shown} in {w}x{h}",
            );
        }
    }
}
