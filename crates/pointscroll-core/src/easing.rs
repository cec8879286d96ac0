#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[inline]
pub fn ease_in_quad(t: f32) -> f32 {
    t * t
}

/// One exponential-smoothing step: move `current` toward `target` by `factor`
/// of the remaining distance.
#[inline]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}
