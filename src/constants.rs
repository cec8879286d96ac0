// Web front-end constants. Engine tuning lives in `pointscroll_core::constants`;
// this file only holds values tied to the hosting page or the GPU surface.

// DOM ids expected in index.html
pub const CANVAS_ID: &str = "app-canvas";
pub const CONTAINER_ID: &str = "canvas-container";
pub const SCROLL_BAR_ID: &str = "scroll-bar";
pub const SCROLL_PERCENT_ID: &str = "scroll-percent";

// Backing store is capped at 2x to keep fill cost bounded on dense displays
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

// Frame step clamp (seconds); avoids a jump after the tab was hidden
pub const MAX_FRAME_DT_SEC: f32 = 0.1;

// Projected point diameter limits (device pixels)
pub const MIN_POINT_PX: f32 = 1.0;
pub const MAX_POINT_PX: f32 = 24.0;

// Clouds fainter than this are not drawn at all
pub const MIN_DRAW_ALPHA: f32 = 0.004;

// Model sections appended after the procedural ones:
// (name, vertex cache url, animation kind, fine scale)
pub const MODEL_ASSETS: &[(&str, &str, &str, f32)] = &[
    ("fighter-plane", "models/vertices/axis_fighter_plane.bin", "left-to-center", 1.0),
    ("henchman", "models/vertices/HenchmanTough.bin", "right-to-center", 0.9),
    ("syringe-gun", "models/vertices/syringe_gun_-_game_ready_asset.bin", "zoom-through", 1.0),
    ("porsche-911", "models/vertices/porsche_911_carrera_4s.bin", "curve-zoom", 1.0),
    ("bmw-m2", "models/vertices/bmw_m2_performance_parts.bin", "scatter-to-form", 1.0),
    ("gaz-69", "models/vertices/GAZ69_FAB.bin", "left-to-center", 1.0),
];
