use glam::Vec3;

// Shared scene tuning constants used by both web and native frontends.

// Scroll layout (fractions of total page progress)
pub const SECTION_BASE_OFFSET: f32 = 0.1; // progress where the first section starts
pub const SECTION_STRIDE: f32 = 0.18; // distance between consecutive section starts
pub const SECTION_DURATION: f32 = 0.16; // length of one section's active range
pub const PREVIEW_OFFSET: f32 = 0.05; // fade-in preview before a section starts
pub const ACTIVE_TAIL_EPSILON: f32 = 0.02; // grace range after a section ends
pub const INTRO_END: f32 = 0.1; // intro/hint particles are gone by here

// Per-frame smoothing factors (fraction of the remaining distance per frame)
pub const SWEEP_SMOOTHING: f32 = 0.06;
pub const STAGED_SMOOTHING: f32 = 0.08;
pub const OPACITY_SMOOTHING: f32 = 0.1;
pub const AMBIENT_SMOOTHING: f32 = 0.1;

// Fading outside the active window
pub const INACTIVE_OPACITY_DECAY: f32 = 0.9; // multiplicative, per frame
pub const OPACITY_FLOOR: f32 = 0.01; // below this the cloud snaps to fully hidden

// Preview opacity caps
pub const PREVIEW_CAP: f32 = 0.3;
pub const MORPH_PREVIEW_CAP: f32 = 0.5;

// Idle spin rates (radians per second about x, y)
pub const SWEEP_SPIN: [f32; 2] = [0.2, 0.15];
pub const STAGED_SPIN: [f32; 2] = [0.15, 0.1];
pub const GLOBE_SPIN: [f32; 2] = [0.0, 0.3];
pub const MODEL_SPIN: [f32; 2] = [0.1, 0.3];
pub const MORPH_SPIN: [f32; 2] = [0.2, 0.15];
pub const INTRO_SPIN: [f32; 2] = [0.3, 0.2];

// Object scales
pub const PRIMITIVE_SCALE: f32 = 3.0;
pub const MODEL_SCALE: f32 = 1.0;
pub const SPIN_SCALE_GROWTH: f32 = 1.0 / 3.0; // fraction of base scale added; 3 -> 4 for primitives

// Enter/hold/exit split for model shapes
pub const STAGED_ENTER_RATIO: f32 = 0.3;
pub const STAGED_HOLD_RATIO: f32 = 0.4;

// Scatter-to-form
pub const MORPH_FADE_IN_END: f32 = 0.3;
pub const MORPH_FADE_OUT_START: f32 = 0.9;
pub const MORPH_FADE_OUT_RATE: f32 = 10.0;
pub const MORPH_FORMED_SCALE: f32 = 3.0;
pub const MORPH_FORMED_OFFSET: Vec3 = Vec3::new(3.0, -2.0, 2.0);
pub const SCATTER_RANGE: Vec3 = Vec3::new(20.0, 15.0, 10.0);
pub const SCATTER_Z_OFFSET: f32 = 5.0;
pub const TORUS_MAIN_RADIUS: f32 = 0.5;
pub const TORUS_TUBE_RADIUS: f32 = 0.2;

// Globe composite
pub const GLOBE_RADIUS: f32 = 0.5;
pub const GLOBE_GLOW_COUNT: usize = 500;
pub const GLOBE_LAYER_WEIGHTS: [f32; 3] = [0.9, 0.3, 0.7]; // body, grid, glow

// Model-derived shapes
pub const MODEL_TARGET_SIZE: f32 = 8.0; // largest bounding-box dimension after normalisation
pub const MAX_VERTICES_PER_MODEL: usize = 15_000;
pub const MAX_CACHED_VERTICES: usize = 15_000;
pub const MODEL_FORMED_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 3.0); // where a scatter-to-form model settles

// Fallback placement for an animation kind with no configured route
pub const DEFAULT_WAIT_POSITION: Vec3 = Vec3::new(0.0, 0.0, -20.0);
pub const DEFAULT_CENTER_POSITION: Vec3 = Vec3::new(0.0, 0.0, 2.0);
pub const DEFAULT_EXIT_POSITION: Vec3 = Vec3::new(0.0, 0.0, 20.0);

// Background particle field
pub const BACKGROUND_COUNT: usize = 200;
pub const BACKGROUND_SPREAD: Vec3 = Vec3::new(30.0, 30.0, 20.0);
pub const BACKGROUND_Z_OFFSET: f32 = -5.0;
pub const BACKGROUND_OPACITY: f32 = 0.6;
pub const BACKGROUND_ROTATION_SPEED: f32 = 0.02;

// Scroll hint particles
pub const HINT_LOOSE_COUNT: usize = 50;
pub const HINT_CHEVRON_COUNT: usize = 15;
pub const HINT_STEM_COUNT: usize = 15;
pub const HINT_MAX_OPACITY: f32 = 0.8;
pub const HINT_BOUNCE_AMPLITUDE: f32 = 0.1;
pub const HINT_BOUNCE_RATE: f32 = 2.0; // radians per second
pub const HINT_ORBIT_RATE: f32 = 0.2; // radians per second

// Point sizes handed to renderers (world units)
pub const SHAPE_POINT_SIZE: f32 = 0.03;
pub const MORPH_POINT_SIZE: f32 = 0.04;
pub const BACKGROUND_POINT_SIZE: f32 = 0.04;
pub const HINT_POINT_SIZE: f32 = 0.05;
pub const INTRO_POINT_SIZE: f32 = 0.025;
pub const GLOBE_POINT_SIZES: [f32; 3] = [0.015, 0.008, 0.012];

// Camera
pub const CAMERA_FOVY_DEGREES: f32 = 45.0;
pub const CAMERA_Z: f32 = 8.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Circle sprite
pub const SPRITE_SIZE: usize = 64;

// Device budget
pub const MOBILE_WIDTH_THRESHOLD: f64 = 768.0;
pub const LOW_END_CORE_THRESHOLD: u32 = 4;
pub const MOBILE_MULTIPLIER: f32 = 0.5;
pub const LOW_END_MULTIPLIER: f32 = 0.7;
