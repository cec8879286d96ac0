//! Per-shape state machine.
//!
//! One animator per section. Each frame it classifies the scroll progress
//! against its [`AnimationWindow`], asks its [`ResolvedMotion`] for a target and
//! eases the live transform toward it. Outside the window only the opacity
//! decays; no buffer is touched.

use crate::constants::{INACTIVE_OPACITY_DECAY, OPACITY_FLOOR};
use crate::easing::{approach, ease_out_cubic};
use crate::motion::ResolvedMotion;
use crate::points::PointCloud;
use crate::shape::ShapeId;
use crate::timeline::AnimationWindow;
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: f32,
    /// Accumulated euler rotation about x and y, radians.
    pub rotation: Vec2,
}

impl Transform {
    pub fn at(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale,
            rotation: Vec2::ZERO,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0),
            self.position,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec3::ZERO, 1.0)
    }
}

/// One drawable point set of a shape. Most shapes have exactly one.
#[derive(Clone, Debug)]
pub struct Layer {
    pub points: PointCloud,
    /// Optional per-point RGB.
    pub colors: Option<Vec<f32>>,
    /// Fraction of the shape's opacity this layer renders with.
    pub weight: f32,
    pub point_size: f32,
}

impl Layer {
    pub fn new(points: PointCloud, point_size: f32) -> Self {
        Self {
            points,
            colors: None,
            weight: 1.0,
            point_size,
        }
    }

    pub fn colored(points: PointCloud, colors: Vec<f32>, weight: f32, point_size: f32) -> Self {
        Self {
            points,
            colors: Some(colors),
            weight,
            point_size,
        }
    }
}

pub type Layers = SmallVec<[Layer; 3]>;

#[derive(Clone, Debug)]
struct MorphState {
    scattered: Vec<f32>,
    formed: Vec<f32>,
    progress: f32,
    written: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Outside the window: only opacity decayed.
    Dormant,
    Animated,
}

#[derive(Debug)]
pub struct ShapeAnimator {
    id: ShapeId,
    window: AnimationWindow,
    motion: ResolvedMotion,
    layers: Layers,
    tint: [f32; 3],
    transform: Transform,
    opacity: f32,
    morph: Option<MorphState>,
}

impl ShapeAnimator {
    pub fn new(id: ShapeId, window: AnimationWindow, motion: ResolvedMotion, layers: Layers) -> Self {
        let transform = Transform::at(motion.wait_position(), motion.policy.base_scale);
        Self {
            id,
            window,
            motion,
            layers,
            tint: [1.0; 3],
            transform,
            opacity: 0.0,
            morph: None,
        }
    }

    /// Animator whose single layer blends from `scattered` to `formed`.
    /// `formed` is already in its final world placement. Both sets are
    /// truncated to the shorter one.
    pub fn with_morph(
        id: ShapeId,
        window: AnimationWindow,
        motion: ResolvedMotion,
        scattered: PointCloud,
        formed: PointCloud,
        point_size: f32,
    ) -> Self {
        let n = scattered.len().min(formed.len()) * 3;
        let mut scattered = scattered.into_vec();
        let mut formed = formed.into_vec();
        scattered.truncate(n);
        formed.truncate(n);

        let live = PointCloud::from_flat(scattered.clone());
        let mut layers = Layers::new();
        layers.push(Layer::new(live, point_size));
        let mut animator = Self::new(id, window, motion, layers);
        animator.morph = Some(MorphState {
            scattered,
            formed,
            progress: 0.0,
            written: None,
        });
        animator
    }

    pub fn with_tint(mut self, tint: [f32; 3]) -> Self {
        self.tint = tint;
        self
    }

    pub fn update(&mut self, progress: f32, dt: f32) -> UpdateOutcome {
        let phase = self.window.phase(progress);
        let Some(target) = self.motion.evaluate(phase) else {
            self.decay();
            return UpdateOutcome::Dormant;
        };

        let policy = self.motion.policy;
        self.transform.position = self
            .transform
            .position
            .lerp(target.position, policy.smoothing);
        self.transform.scale = approach(self.transform.scale, target.scale, policy.smoothing);
        self.opacity = approach(self.opacity, target.opacity, policy.opacity_smoothing);
        self.transform.rotation += policy.spin * dt;

        if let Some(m) = target.morph {
            self.apply_morph(m);
            if m > 0.5 {
                self.transform.rotation += policy.morph_spin * ((m - 0.5) * 2.0) * dt;
            }
        }
        UpdateOutcome::Animated
    }

    fn decay(&mut self) {
        if self.opacity > OPACITY_FLOOR {
            self.opacity *= INACTIVE_OPACITY_DECAY;
        }
        if self.opacity <= OPACITY_FLOOR {
            self.opacity = 0.0;
        }
    }

    fn apply_morph(&mut self, progress: f32) {
        let Some(morph) = self.morph.as_mut() else {
            return;
        };
        morph.progress = progress;
        let eased = ease_out_cubic(progress);
        if morph.written == Some(eased) {
            return;
        }
        let Some(layer) = self.layers.first_mut() else {
            return;
        };
        let (scattered, formed) = (&morph.scattered, &morph.formed);
        layer.points.write_with(|buf| {
            for ((out, &s), &f) in buf.iter_mut().zip(scattered).zip(formed) {
                *out = s * (1.0 - eased) + f * eased;
            }
        });
        morph.written = Some(eased);
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn window(&self) -> &AnimationWindow {
        &self.window
    }

    pub fn motion(&self) -> &ResolvedMotion {
        &self.motion
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Opacity of layer `index` after its weight; 0 for a missing layer.
    pub fn layer_opacity(&self, index: usize) -> f32 {
        self.layers
            .get(index)
            .map_or(0.0, |layer| self.opacity * layer.weight)
    }

    pub fn morph_progress(&self) -> Option<f32> {
        self.morph.as_ref().map(|m| m.progress)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn tint(&self) -> [f32; 3] {
        self.tint
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0 && self.layers.iter().any(|l| !l.points.is_empty())
    }

    /// Drop every point buffer. The animator stays valid but renders nothing.
    pub fn release(&mut self) {
        self.layers.clear();
        self.morph = None;
        self.opacity = 0.0;
    }
}
