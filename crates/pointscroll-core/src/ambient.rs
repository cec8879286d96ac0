//! Scene-wide particle sets that are not tied to a section: the drifting
//! background, the scroll-down hint and the intro cluster.

use crate::animator::{Layer, Transform};
use crate::constants::*;
use crate::device::ParticleBudget;
use crate::easing::approach;
use crate::generators::{generate, scattered_points, Geometry};
use crate::points::PointCloud;
use crate::render::{CloudRole, CloudView};
use glam::{Vec2, Vec3};
use rand::Rng;

#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundConfig {
    pub count: usize,
    pub spread: Vec3,
    pub z_offset: f32,
    pub opacity: f32,
    pub rotation_speed: f32,
    pub point_size: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            count: BACKGROUND_COUNT,
            spread: BACKGROUND_SPREAD,
            z_offset: BACKGROUND_Z_OFFSET,
            opacity: BACKGROUND_OPACITY,
            rotation_speed: BACKGROUND_ROTATION_SPEED,
            point_size: BACKGROUND_POINT_SIZE,
        }
    }
}

/// Slowly turning dust behind everything. Never fades.
#[derive(Debug)]
pub struct BackgroundField {
    layer: Layer,
    transform: Transform,
    opacity: f32,
    rotation_speed: f32,
}

impl BackgroundField {
    pub fn new<R: Rng + ?Sized>(config: &BackgroundConfig, budget: ParticleBudget, rng: &mut R) -> Self {
        let count = budget.adjust(config.count);
        let points = scattered_points(count, config.spread, config.z_offset, rng);
        Self {
            layer: Layer::new(points, config.point_size),
            transform: Transform::default(),
            opacity: config.opacity,
            rotation_speed: config.rotation_speed,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.transform.rotation.y += self.rotation_speed * dt;
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn len(&self) -> usize {
        self.layer.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layer.points.is_empty()
    }

    pub fn view(&self) -> CloudView<'_> {
        CloudView::plain(CloudRole::Background, 0, &self.layer, self.transform, self.opacity)
    }

    pub fn release(&mut self) {
        self.layer.points = PointCloud::default();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HintConfig {
    pub loose_count: usize,
    pub chevron_count: usize,
    pub stem_count: usize,
    pub max_opacity: f32,
    pub bounce_amplitude: f32,
    pub bounce_rate: f32,
    pub orbit_rate: f32,
    pub point_size: f32,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            loose_count: HINT_LOOSE_COUNT,
            chevron_count: HINT_CHEVRON_COUNT,
            stem_count: HINT_STEM_COUNT,
            max_opacity: HINT_MAX_OPACITY,
            bounce_amplitude: HINT_BOUNCE_AMPLITUDE,
            bounce_rate: HINT_BOUNCE_RATE,
            orbit_rate: HINT_ORBIT_RATE,
            point_size: HINT_POINT_SIZE,
        }
    }
}

const HINT_ORBIT_CENTER_Z: f32 = 2.0;

/// Downward arrow shown at the top of the page. Scatters away as soon as the
/// reader starts scrolling.
#[derive(Debug)]
pub struct ScrollHint {
    config: HintConfig,
    rest: Vec<Vec3>,
    drift: Vec<Vec3>,
    layer: Layer,
    elapsed: f32,
    opacity: f32,
    intro_end: f32,
}

impl ScrollHint {
    pub fn new<R: Rng + ?Sized>(config: HintConfig, intro_end: f32, rng: &mut R) -> Self {
        let mut rest = Vec::with_capacity(config.loose_count + config.chevron_count + config.stem_count);
        for _ in 0..config.loose_count {
            rest.push(Vec3::new(
                (rng.gen::<f32>() - 0.5) * 8.0,
                (rng.gen::<f32>() - 0.5) * 6.0,
                (rng.gen::<f32>() - 0.5) * 4.0 + HINT_ORBIT_CENTER_Z,
            ));
        }
        for i in 0..config.chevron_count {
            let t = i as f32 / config.chevron_count as f32;
            let side = if i % 2 == 0 { 1.0 } else { -1.0 };
            rest.push(Vec3::new(side * (1.0 - t) * 0.8, -1.5 - t * 1.2, 3.0));
        }
        for i in 0..config.stem_count {
            let t = i as f32 / config.stem_count as f32;
            rest.push(Vec3::new(0.0, 0.5 - t * 2.0, 3.0));
        }
        let layer = Layer::new(PointCloud::from_points(rest.iter().copied()), config.point_size);
        let drift = vec![Vec3::ZERO; rest.len()];
        Self {
            opacity: config.max_opacity,
            config,
            rest,
            drift,
            layer,
            elapsed: 0.0,
            intro_end,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, progress: f32, dt: f32, rng: &mut R) {
        self.elapsed += dt;
        let fade = fade_progress(progress, self.intro_end);
        self.opacity = approach(self.opacity, (1.0 - fade) * self.config.max_opacity, AMBIENT_SMOOTHING);

        if fade > 0.0 {
            for d in &mut self.drift {
                let sx = (rng.gen::<f32>() - 0.5) * fade * 0.5;
                *d += Vec3::new(sx, -3.0 * fade, -5.0 * fade) * dt;
            }
        }

        let bounce = (self.elapsed * self.config.bounce_rate).sin() * self.config.bounce_amplitude;
        let (sin, cos) = (self.elapsed * self.config.orbit_rate).sin_cos();
        let loose = self.config.loose_count;
        let (rest, drift) = (&self.rest, &self.drift);
        self.layer.points.write_with(|buf| {
            for (i, (out, (r, d))) in buf.chunks_exact_mut(3).zip(rest.iter().zip(drift)).enumerate() {
                let base = if i < loose {
                    let z = r.z - HINT_ORBIT_CENTER_Z;
                    Vec3::new(r.x * cos - z * sin, r.y, r.x * sin + z * cos + HINT_ORBIT_CENTER_Z)
                } else {
                    Vec3::new(r.x, r.y + bounce, r.z)
                };
                let p = base + *d;
                out.copy_from_slice(&[p.x, p.y, p.z]);
            }
        });
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn len(&self) -> usize {
        self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    pub fn points(&self) -> &PointCloud {
        &self.layer.points
    }

    pub fn view(&self) -> CloudView<'_> {
        CloudView::plain(CloudRole::Hint, 0, &self.layer, Transform::default(), self.opacity)
    }

    pub fn release(&mut self) {
        self.layer.points = PointCloud::default();
        self.rest.clear();
        self.drift.clear();
    }
}

/// One small primitive of the intro cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct IntroSpec {
    pub geometry: Geometry,
    pub count: usize,
    pub initial: Vec3,
    pub direction: Vec3,
}

impl IntroSpec {
    pub fn stock() -> Vec<IntroSpec> {
        let v = Vec3::new;
        [
            (Geometry::Box, 1500, v(0.0, 0.0, 0.0), v(-3.0, 2.0, -8.0)),
            (Geometry::Torus, 2000, v(1.5, 0.8, -0.5), v(4.0, 3.0, -10.0)),
            (Geometry::Sphere, 2500, v(-1.5, -0.3, 0.3), v(-4.0, -2.0, -9.0)),
            (Geometry::Octahedron, 1500, v(0.8, -1.0, 0.5), v(3.0, -3.0, -7.0)),
            (Geometry::Cone, 1800, v(-1.0, 1.0, -0.3), v(-2.0, 4.0, -11.0)),
        ]
        .into_iter()
        .map(|(geometry, count, initial, direction)| IntroSpec {
            geometry,
            count,
            initial,
            direction,
        })
        .collect()
    }
}

const INTRO_SCALE: f32 = 0.6;
const INTRO_SHRINK: f32 = 0.8;

#[derive(Debug)]
struct IntroMember {
    spec: IntroSpec,
    layer: Layer,
    transform: Transform,
    opacity: f32,
}

/// Cluster of primitives greeting the reader; flies apart during the intro.
#[derive(Debug)]
pub struct IntroCluster {
    members: Vec<IntroMember>,
    intro_end: f32,
}

impl IntroCluster {
    pub fn new<R: Rng + ?Sized>(
        specs: &[IntroSpec],
        budget: ParticleBudget,
        intro_end: f32,
        rng: &mut R,
    ) -> Self {
        let members = specs
            .iter()
            .map(|spec| IntroMember {
                layer: Layer::new(
                    generate(spec.geometry, budget.adjust(spec.count), rng),
                    INTRO_POINT_SIZE,
                ),
                transform: Transform::at(spec.initial, INTRO_SCALE),
                opacity: 1.0,
                spec: spec.clone(),
            })
            .collect();
        Self { members, intro_end }
    }

    pub fn update(&mut self, progress: f32, dt: f32) {
        let fade = fade_progress(progress, self.intro_end);
        let spin = Vec2::from(INTRO_SPIN) * dt;
        for m in &mut self.members {
            let target = m.spec.initial + m.spec.direction * fade;
            m.transform.position = m.transform.position.lerp(target, AMBIENT_SMOOTHING);
            m.transform.scale = approach(
                m.transform.scale,
                INTRO_SCALE * (1.0 - fade * INTRO_SHRINK),
                AMBIENT_SMOOTHING,
            );
            m.opacity = approach(m.opacity, 1.0 - fade, AMBIENT_SMOOTHING);
            m.transform.rotation += spin;
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn opacity(&self, index: usize) -> Option<f32> {
        self.members.get(index).map(|m| m.opacity)
    }

    pub fn transform(&self, index: usize) -> Option<Transform> {
        self.members.get(index).map(|m| m.transform)
    }

    pub fn views(&self) -> impl Iterator<Item = CloudView<'_>> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, m)| CloudView::plain(CloudRole::Intro, i, &m.layer, m.transform, m.opacity))
    }

    pub fn release(&mut self) {
        self.members.clear();
    }
}

/// Fraction of the intro already scrolled past, in `[0, 1]`.
pub fn fade_progress(progress: f32, intro_end: f32) -> f32 {
    if intro_end <= 0.0 {
        return 1.0;
    }
    (progress / intro_end).clamp(0.0, 1.0)
}
