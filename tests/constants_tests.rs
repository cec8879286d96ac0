// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use pointscroll_core::constants as engine;
use pointscroll_core::AnimationKind;

#[test]
#[allow(clippy::assertions_on_constants)]
fn page_constants_are_within_reasonable_bounds() {
    assert!(MAX_DEVICE_PIXEL_RATIO >= 1.0);
    assert!(MAX_FRAME_DT_SEC > 0.0 && MAX_FRAME_DT_SEC < 1.0);
    assert!(MIN_POINT_PX > 0.0 && MIN_POINT_PX < MAX_POINT_PX);
    assert!(MIN_DRAW_ALPHA > 0.0 && MIN_DRAW_ALPHA < engine::OPACITY_FLOOR);
    assert_ne!(CANVAS_ID, CONTAINER_ID);
}

#[test]
fn model_assets_name_known_kinds() {
    assert!(!MODEL_ASSETS.is_empty());
    for (name, url, kind, fine_scale) in MODEL_ASSETS {
        assert!(kind.parse::<AnimationKind>().is_ok(), "{name}: bad kind {kind}");
        assert!(url.ends_with(".bin"), "{name}: {url}");
        assert!(*fine_scale > 0.0);
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn sections_start_in_order() {
    assert!(engine::SECTION_DURATION < engine::SECTION_STRIDE);
    assert!(engine::PREVIEW_OFFSET < engine::SECTION_STRIDE);
    assert!(engine::ACTIVE_TAIL_EPSILON < engine::PREVIEW_OFFSET);
    // the intro has cleared before the first section begins
    assert!(engine::INTRO_END <= engine::SECTION_BASE_OFFSET);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn smoothing_and_fades_are_fractions() {
    for factor in [
        engine::SWEEP_SMOOTHING,
        engine::STAGED_SMOOTHING,
        engine::OPACITY_SMOOTHING,
        engine::AMBIENT_SMOOTHING,
        engine::INACTIVE_OPACITY_DECAY,
    ] {
        assert!(factor > 0.0 && factor < 1.0);
    }
    assert!(engine::PREVIEW_CAP < engine::MORPH_PREVIEW_CAP);
    assert!(engine::MORPH_FADE_IN_END < engine::MORPH_FADE_OUT_START);
    assert!(engine::STAGED_ENTER_RATIO + engine::STAGED_HOLD_RATIO < 1.0);
    let weights: f32 = engine::GLOBE_LAYER_WEIGHTS.iter().sum();
    assert!(weights > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn budgets_shrink_point_counts() {
    assert!(engine::MOBILE_MULTIPLIER < engine::LOW_END_MULTIPLIER);
    assert!(engine::LOW_END_MULTIPLIER < 1.0);
    assert!(engine::MAX_VERTICES_PER_MODEL <= engine::MAX_CACHED_VERTICES);
    assert!(engine::CAMERA_ZNEAR < engine::CAMERA_Z && engine::CAMERA_Z < engine::CAMERA_ZFAR);
}
