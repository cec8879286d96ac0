// Host-side tests for section timing and per-kind motion.

use glam::Vec3;
use pointscroll_core::constants::{MODEL_SCALE, MODEL_SPIN};
use pointscroll_core::motion::{morph_opacity, morph_progress, MotionPath, StagedRoute, TailFade};
use pointscroll_core::{AnimationKind, Choreography, MotionTable, ScrollLayout, WindowPhase};

const EPS: f32 = 1e-5;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

#[test]
fn section_windows_follow_the_layout() {
    let layout = ScrollLayout::default();
    let w0 = layout.window(0);
    assert!(close(w0.section_start, 0.1));
    assert!(close(w0.section_end, 0.26));
    assert!(close(w0.preview_start, 0.05));
    assert!(close(w0.active_end, 0.28));

    let w2 = layout.window(2);
    assert!(close(w2.section_start, 0.46));
    assert!(close(w2.section_end, 0.62));
}

#[test]
fn window_phases() {
    let w = ScrollLayout::default().window(0);
    assert_eq!(w.phase(0.0), WindowPhase::Inactive);
    assert_eq!(w.phase(0.04), WindowPhase::Inactive);
    match w.phase(0.075) {
        WindowPhase::Preview(p) => assert!(close(p, 0.5), "preview {p}"),
        other => panic!("expected preview, got {other:?}"),
    }
    match w.phase(0.18) {
        WindowPhase::Active(t) => assert!(close(t, 0.5), "local {t}"),
        other => panic!("expected active, got {other:?}"),
    }
    // the grace tail past the section end holds the final frame
    assert_eq!(w.phase(0.27), WindowPhase::Active(1.0));
    assert_eq!(w.phase(0.3), WindowPhase::Inactive);
}

#[test]
fn local_progress_is_clamped() {
    let w = ScrollLayout::default().window(1);
    assert_eq!(w.local_progress(0.0), 0.0);
    assert_eq!(w.local_progress(1.0), 1.0);
}

#[test]
fn section_lookup_uses_half_open_ranges() {
    let layout = ScrollLayout::default();
    assert_eq!(layout.section_at(0.05, 6), None);
    assert_eq!(layout.section_at(0.1, 6), Some(0));
    assert_eq!(layout.section_at(0.27, 6), None);
    assert_eq!(layout.section_at(0.3, 6), Some(1));
    assert_eq!(layout.section_at(0.95, 6), Some(4));
    assert_eq!(layout.section_at(0.95, 4), None);
}

#[test]
fn kinds_parse_from_kebab_case() {
    for kind in AnimationKind::ALL {
        assert_eq!(kind.as_str().parse::<AnimationKind>(), Ok(kind));
        assert_eq!(kind.to_string(), kind.as_str());
    }
    assert!("wobble".parse::<AnimationKind>().is_err());
}

#[test]
fn choreography_depends_on_kind_and_source() {
    assert_eq!(
        Choreography::for_shape(AnimationKind::ScatterToForm, false),
        Choreography::Morph
    );
    assert_eq!(
        Choreography::for_shape(AnimationKind::RotateInPlace, false),
        Choreography::Spin
    );
    assert_eq!(
        Choreography::for_shape(AnimationKind::ZoomThrough, false),
        Choreography::Sweep
    );
    assert_eq!(
        Choreography::for_shape(AnimationKind::ScatterToForm, true),
        Choreography::Morph
    );
    assert_eq!(
        Choreography::for_shape(AnimationKind::RotateInPlace, true),
        Choreography::Spin
    );
    for kind in [
        AnimationKind::LeftToCenter,
        AnimationKind::RightToCenter,
        AnimationKind::ZoomThrough,
        AnimationKind::CurveZoom,
    ] {
        assert_eq!(Choreography::for_shape(kind, true), Choreography::Staged);
    }
}

#[test]
fn rotating_models_tumble_and_grow_from_their_own_scale() {
    let motion = MotionTable::default().resolve(AnimationKind::RotateInPlace, true);
    assert_eq!(motion.choreography, Choreography::Spin);
    assert_eq!(motion.policy.spin, glam::Vec2::from(MODEL_SPIN));
    assert_eq!(motion.policy.base_scale, MODEL_SCALE);
    let end = motion.evaluate(WindowPhase::Active(1.0)).expect("active");
    assert!(close(end.scale, MODEL_SCALE * 4.0 / 3.0), "scale {}", end.scale);
}

#[test]
fn fitted_layout_squeezes_overlong_timelines() {
    let layout = ScrollLayout::default();
    assert_eq!(layout.fitted(4), layout);
    assert_eq!(layout.fitted(0), layout);

    let fitted = layout.fitted(12);
    assert!(fitted.stride < layout.stride);
    assert_eq!(fitted.base_offset, layout.base_offset);
    let last = fitted.window(11);
    assert!(close(last.section_end, 1.0), "end {}", last.section_end);
    // proportions are kept
    assert!(close(fitted.duration / fitted.stride, layout.duration / layout.stride));
    assert!(close(
        fitted.preview_offset / fitted.stride,
        layout.preview_offset / layout.stride
    ));
}

#[test]
fn tail_fade_reaches_zero_at_the_end() {
    let fade = TailFade::new(0.9, 10.0);
    assert_eq!(fade.opacity(0.5), 1.0);
    assert_eq!(fade.opacity(0.9), 1.0);
    assert!(close(fade.opacity(0.95), 0.5));
    assert!(fade.opacity(1.0).abs() < 1e-4);
}

#[test]
fn left_sweep_moves_in_a_line_and_fades() {
    let motion = MotionTable::default().resolve(AnimationKind::LeftToCenter, false);
    assert_eq!(motion.choreography, Choreography::Sweep);
    assert_eq!(motion.policy.base_scale, 3.0);

    let start = motion.evaluate(WindowPhase::Active(0.0)).expect("active");
    assert_eq!(start.position, Vec3::new(-5.0, -2.0, 2.0));
    assert_eq!(start.opacity, 1.0);

    let end = motion.evaluate(WindowPhase::Active(1.0)).expect("active");
    assert!(end.position.distance(Vec3::new(-3.0, -0.5, 2.0)) < EPS);
    assert!(end.opacity < 1e-4);
    assert_eq!(end.morph, None);
}

#[test]
fn curve_zoom_arcs_upward_mid_section() {
    let motion = MotionTable::default().resolve(AnimationKind::CurveZoom, false);
    let mid = motion.evaluate(WindowPhase::Active(0.5)).expect("active");
    // lerp y is -3, plus the full 4.0 swing
    assert!(close(mid.position.y, 1.0), "y {}", mid.position.y);
}

#[test]
fn zoom_through_ends_just_short_of_transparent() {
    let motion = MotionTable::default().resolve(AnimationKind::ZoomThrough, false);
    let end = motion.evaluate(WindowPhase::Active(1.0)).expect("active");
    // 1 - 0.3 * 3.3
    assert!((end.opacity - 0.01).abs() < 1e-4, "opacity {}", end.opacity);
    let curve = MotionTable::default().resolve(AnimationKind::CurveZoom, false);
    let end = curve.evaluate(WindowPhase::Active(1.0)).expect("active");
    // 1 - 0.15 * 6.7
    assert_eq!(end.opacity, 0.0);
}

#[test]
fn rotate_in_place_grows() {
    let motion = MotionTable::default().resolve(AnimationKind::RotateInPlace, false);
    assert_eq!(motion.choreography, Choreography::Spin);
    assert_eq!(motion.policy.spin.x, 0.0);
    let end = motion.evaluate(WindowPhase::Active(1.0)).expect("active");
    assert!(close(end.scale, 4.0));
}

#[test]
fn preview_sits_at_the_wait_position_with_capped_opacity() {
    let motion = MotionTable::default().resolve(AnimationKind::ZoomThrough, false);
    let target = motion.evaluate(WindowPhase::Preview(1.0)).expect("preview");
    assert_eq!(target.position, motion.wait_position());
    assert!(close(target.opacity, 0.3));
    assert_eq!(motion.evaluate(WindowPhase::Inactive), None);

    let morph = MotionTable::default().resolve(AnimationKind::ScatterToForm, false);
    let target = morph.evaluate(WindowPhase::Preview(1.0)).expect("preview");
    assert!(close(target.opacity, 0.5));
    assert_eq!(target.morph, Some(0.0));
}

#[test]
fn staged_route_enters_holds_and_exits() {
    let motion = MotionTable::default().resolve(AnimationKind::LeftToCenter, true);
    let MotionPath::Staged(route) = motion.path else {
        panic!("expected a staged path");
    };
    assert_eq!(route.wait, Vec3::new(-5.0, -2.0, 2.0));
    assert_eq!(route.exit, Vec3::new(5.0, 2.0, 2.0));

    let at = |t| motion.evaluate(WindowPhase::Active(t)).expect("active");
    let enter = at(0.0);
    assert_eq!(enter.position, route.wait);
    assert_eq!(enter.opacity, 0.0);

    // half-way into the entry the quad ease is at 0.75
    let entering = at(0.15);
    assert!(close(entering.opacity, 0.75));
    assert!(entering.position.distance(route.wait.lerp(route.center, 0.75)) < EPS);

    for t in [0.3, 0.5, 0.69] {
        let held = at(t);
        assert_eq!(held.position, route.center);
        assert_eq!(held.opacity, 1.0);
    }

    let exiting = at(0.85);
    assert!(close(exiting.opacity, 0.75));
    let gone = at(1.0);
    assert!(gone.position.distance(route.exit) < EPS);
    assert!(gone.opacity.abs() < EPS);
}

#[test]
fn missing_routes_fall_back_to_offscreen_defaults() {
    let table = MotionTable::empty();
    let staged = table.resolve(AnimationKind::CurveZoom, true);
    assert_eq!(staged.path, MotionPath::Staged(StagedRoute::default()));
    assert_eq!(staged.wait_position(), Vec3::new(0.0, 0.0, -20.0));

    let sweep = table.resolve(AnimationKind::CurveZoom, false);
    let MotionPath::Sweep(route) = sweep.path else {
        panic!("expected a sweep path");
    };
    assert_eq!(route.from, Vec3::new(0.0, 0.0, -20.0));
    // asking twice is fine
    let _ = table.resolve(AnimationKind::CurveZoom, false);
}

#[test]
fn morph_ramps() {
    assert_eq!(morph_opacity(0.0), 0.0);
    assert!(close(morph_opacity(0.15), 0.5));
    assert_eq!(morph_opacity(0.6), 1.0);
    assert!(morph_opacity(1.0) < 1e-4);

    assert_eq!(morph_progress(0.2), 0.0);
    assert!(close(morph_progress(0.6), 0.5));
    assert_eq!(morph_progress(0.95), 1.0);
}
