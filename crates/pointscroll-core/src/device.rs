use crate::constants::{
    LOW_END_CORE_THRESHOLD, LOW_END_MULTIPLIER, MOBILE_MULTIPLIER, MOBILE_WIDTH_THRESHOLD,
};

/// What the host knows about the device at start-up.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeviceProfile {
    pub viewport_width: f64,
    pub hardware_concurrency: Option<u32>,
}

impl DeviceProfile {
    pub fn multiplier(&self) -> f32 {
        let is_mobile = self.viewport_width < MOBILE_WIDTH_THRESHOLD;
        let is_low_end = self
            .hardware_concurrency
            .is_some_and(|cores| cores <= LOW_END_CORE_THRESHOLD);
        if is_mobile {
            MOBILE_MULTIPLIER
        } else if is_low_end {
            LOW_END_MULTIPLIER
        } else {
            1.0
        }
    }

    pub fn budget(&self) -> ParticleBudget {
        ParticleBudget::new(self.multiplier())
    }
}

/// Point-count multiplier in (0, 1], fixed for the lifetime of a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleBudget(f32);

impl ParticleBudget {
    pub const FULL: ParticleBudget = ParticleBudget(1.0);

    /// Out-of-range or non-finite hints fall back to a full budget.
    pub fn new(multiplier: f32) -> Self {
        if multiplier.is_finite() && multiplier > 0.0 {
            Self(multiplier.min(1.0))
        } else {
            log::warn!("ignoring particle multiplier {multiplier}; using 1.0");
            Self::FULL
        }
    }

    #[inline]
    pub fn multiplier(&self) -> f32 {
        self.0
    }

    /// `floor(base * multiplier)`.
    #[inline]
    pub fn adjust(&self, base: usize) -> usize {
        (base as f32 * self.0).floor() as usize
    }
}

impl Default for ParticleBudget {
    fn default() -> Self {
        Self::FULL
    }
}
