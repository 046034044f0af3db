// Host-side tests for pointer-driven tilt.

use folio_core::*;
use glam::Vec2;

const CARD: ElementRect = ElementRect {
    left: 100.0,
    top: 50.0,
    width: 200.0,
    height: 100.0,
};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn center_is_flat_but_scaled() {
    let mut tracker = TiltTracker::new(TiltGains::default());
    let t = tracker.on_pointer_move(Vec2::new(200.0, 100.0), &CARD);
    assert!(close(t.rotate_x, 0.0) && close(t.rotate_y, 0.0));
    assert!(close(t.scale, 1.04));
}

#[test]
fn corners_hit_full_gain() {
    let mut tracker = TiltTracker::new(TiltGains::default());
    let top_left = tracker.on_pointer_move(Vec2::new(100.0, 50.0), &CARD);
    assert!(close(top_left.rotate_x, 7.0));
    assert!(close(top_left.rotate_y, -9.0));

    let bottom_right = tracker.on_pointer_move(Vec2::new(300.0, 150.0), &CARD);
    assert!(close(bottom_right.rotate_x, -7.0));
    assert!(close(bottom_right.rotate_y, 9.0));
}

#[test]
fn outside_points_are_clamped() {
    let p = normalize_in_rect(Vec2::new(-40.0, 900.0), &CARD);
    assert_eq!(p, Vec2::new(0.0, 1.0));
}

#[test]
fn degenerate_rect_maps_to_center() {
    let flat = ElementRect {
        width: 0.0,
        ..CARD
    };
    assert_eq!(normalize_in_rect(Vec2::new(3.0, 3.0), &flat), Vec2::splat(0.5));
}

#[test]
fn leave_resets_to_identity() {
    let mut tracker = TiltTracker::new(TiltGains::default());
    tracker.on_pointer_move(Vec2::new(120.0, 60.0), &CARD);
    assert!(!tracker.state().is_identity());
    assert_eq!(tracker.on_leave(), TiltState::IDENTITY);
}

#[test]
fn css_transform_string() {
    let t = TiltState {
        rotate_x: 7.0,
        rotate_y: -9.0,
        scale: 1.04,
    };
    assert_eq!(
        t.to_css(),
        "perspective(800px) rotateX(7.00deg) rotateY(-9.00deg) scale(1.040)"
    );
}
