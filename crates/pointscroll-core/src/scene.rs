//! The orchestrator: owns every animated cloud, reads scroll progress once per
//! frame, updates in a fixed order and hands the result to a render surface.
//!
//! It knows nothing about individual animation kinds; that lives in
//! [`crate::motion`] and [`crate::animator`].

use crate::ambient::{BackgroundConfig, BackgroundField, HintConfig, IntroCluster, IntroSpec, ScrollHint};
use crate::animator::{Layer, Layers, ShapeAnimator};
use crate::constants::*;
use crate::device::ParticleBudget;
use crate::error::{SampleError, ShapeError};
use crate::generators::{generate, globe_layers, scattered_points, Geometry};
use crate::loading::{LoadQueue, LoadResult};
use crate::motion::{AnimationKind, MotionTable, ResolvedMotion};
use crate::points::PointCloud;
use crate::render::{CloudRole, CloudView, FrameView, RenderSurface};
use crate::resources::RenderResources;
use crate::sampler::sample_model;
use crate::scroll::{ScrollSource, SubscriptionId};
use crate::shape::{LoadState, ShapeId, ShapeSource, ShapeSpec};
use crate::timeline::{AnimationWindow, ScrollLayout};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::rc::Rc;

/// Everything needed to assemble a [`Scene`].
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub layout: ScrollLayout,
    pub shapes: Vec<ShapeSpec>,
    pub motion: MotionTable,
    pub background: BackgroundConfig,
    pub hint: HintConfig,
    pub intro: Vec<IntroSpec>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        use AnimationKind::*;
        let shapes = vec![
            ShapeSpec::primitive(0, "box", Geometry::Box, LeftToCenter, 3000),
            ShapeSpec::primitive(1, "torus", Geometry::Torus, ScatterToForm, 4000),
            ShapeSpec::primitive(2, "sphere", Geometry::Sphere, LeftToCenter, 5000),
            ShapeSpec::primitive(3, "octahedron", Geometry::Octahedron, ZoomThrough, 3000),
            ShapeSpec::primitive(4, "cone", Geometry::Cone, CurveZoom, 3500),
            ShapeSpec {
                name: "globe".to_string(),
                section: 5,
                kind: RotateInPlace,
                source: ShapeSource::Globe {
                    continent_count: 3800,
                    glow_count: GLOBE_GLOW_COUNT,
                },
                tint: [1.0; 3],
            },
        ];
        Self {
            layout: ScrollLayout::default(),
            shapes,
            motion: MotionTable::default(),
            background: BackgroundConfig::default(),
            hint: HintConfig::default(),
            intro: IntroSpec::stock(),
        }
    }
}

impl SceneConfig {
    /// Config with no sections; ambient particles only.
    pub fn empty() -> Self {
        Self {
            shapes: Vec::new(),
            ..Self::default()
        }
    }

    /// Append a model-derived shape in the section after the last one in use
    /// and return its id.
    pub fn push_model(&mut self, name: &str, url: &str, kind: AnimationKind, fine_scale: f32) -> ShapeId {
        let section = self.section_count();
        self.shapes
            .push(ShapeSpec::model(section, name, url, kind, fine_scale));
        ShapeId(self.shapes.len() - 1)
    }

    /// Number of scroll sections the shapes span (highest index + 1).
    pub fn section_count(&self) -> usize {
        self.shapes.iter().map(|s| s.section + 1).max().unwrap_or(0)
    }

    /// Layout actually used by a scene built from this config.
    pub fn fitted_layout(&self) -> ScrollLayout {
        self.layout.fitted(self.section_count())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    /// The scene was torn down; nothing was updated or drawn.
    Stopped,
}

struct ShapeSlot {
    spec: ShapeSpec,
    window: AnimationWindow,
    motion: ResolvedMotion,
    state: LoadState,
    animator: Option<ShapeAnimator>,
}

struct ScrollAttachment {
    source: Rc<dyn ScrollSource>,
    subscriptions: Vec<SubscriptionId>,
}

pub struct Scene {
    layout: ScrollLayout,
    sections: usize,
    budget: ParticleBudget,
    rng: StdRng,
    background: BackgroundField,
    hint: ScrollHint,
    intro: IntroCluster,
    slots: Vec<ShapeSlot>,
    resources: RenderResources,
    queue: LoadQueue,
    scroll: Option<ScrollAttachment>,
    progress: f32,
    frames: u64,
    disposed: bool,
}

impl Scene {
    pub fn new(config: SceneConfig, budget: ParticleBudget, resources: RenderResources, seed: u64) -> Self {
        let sections = config.section_count();
        let layout = config.fitted_layout();
        if layout != config.layout {
            log::info!(
                "{sections} sections overrun the page; section stride {:.3} -> {:.3}",
                config.layout.stride,
                layout.stride
            );
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let background = BackgroundField::new(&config.background, budget, &mut rng);
        let hint = ScrollHint::new(config.hint.clone(), config.layout.intro_end, &mut rng);
        let intro = IntroCluster::new(&config.intro, budget, config.layout.intro_end, &mut rng);

        let mut slots = Vec::with_capacity(config.shapes.len());
        for (index, spec) in config.shapes.into_iter().enumerate() {
            let id = ShapeId(index);
            let window = layout.window(spec.section);
            let motion = config.motion.resolve(spec.kind, spec.source.is_model());
            let mut slot = ShapeSlot {
                spec,
                window,
                motion,
                state: LoadState::Pending,
                animator: None,
            };
            match build_animator(id, &slot, budget, &mut rng) {
                Some(Ok(animator)) => {
                    slot.state = LoadState::Loaded;
                    slot.animator = Some(animator);
                }
                Some(Err(err)) => fail_slot(&mut slot, err),
                None => {}
            }
            slots.push(slot);
        }

        log::info!(
            "scene ready: {} sections, particle multiplier {}",
            slots.len(),
            budget.multiplier()
        );

        Self {
            layout,
            sections,
            budget,
            rng,
            background,
            hint,
            intro,
            slots,
            resources,
            queue: LoadQueue::new(),
            scroll: None,
            progress: 0.0,
            frames: 0,
            disposed: false,
        }
    }

    /// Read progress from `source` every frame. `subscriptions` are detached
    /// from it at teardown.
    pub fn attach_scroll(
        &mut self,
        source: Rc<dyn ScrollSource>,
        subscriptions: impl IntoIterator<Item = SubscriptionId>,
    ) {
        self.scroll = Some(ScrollAttachment {
            source,
            subscriptions: subscriptions.into_iter().collect(),
        });
    }

    /// Progress for hosts without a scroll source. Overwritten each frame
    /// when a source is attached.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Handle for asynchronous loaders.
    pub fn load_queue(&self) -> LoadQueue {
        self.queue.clone()
    }

    /// Model sections still waiting for data, with their asset URLs.
    pub fn model_requests(&self) -> Vec<(ShapeId, String)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s.state, LoadState::Pending))
            .filter_map(|(i, s)| match &s.spec.source {
                ShapeSource::Model { url, .. } => Some((ShapeId(i), url.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn frame<S: RenderSurface + ?Sized>(&mut self, dt: f32, surface: &mut S) -> FrameOutcome {
        if self.disposed {
            return FrameOutcome::Stopped;
        }
        self.apply_loads();
        if let Some(p) = self.scroll.as_ref().map(|s| s.source.progress()) {
            self.set_progress(p);
        }
        let progress = self.progress;

        self.background.update(dt);
        self.hint.update(progress, dt, &mut self.rng);
        self.intro.update(progress, dt);
        for animator in self.slots.iter_mut().filter_map(|s| s.animator.as_mut()) {
            animator.update(progress, dt);
        }

        let clouds = self.cloud_views();
        surface.render(&FrameView {
            clouds: &clouds,
            sprite: self.resources.sprite(),
            progress,
        });
        self.frames += 1;
        FrameOutcome::Rendered
    }

    fn cloud_views(&self) -> Vec<CloudView<'_>> {
        let mut clouds = Vec::with_capacity(self.slots.len() + 8);
        clouds.push(self.background.view());
        clouds.push(self.hint.view());
        clouds.extend(self.intro.views());
        for animator in self.slots.iter().filter_map(|s| s.animator.as_ref()) {
            let role = CloudRole::Shape(animator.id());
            for (i, layer) in animator.layers().iter().enumerate() {
                clouds.push(
                    CloudView::plain(role, i, layer, animator.transform(), animator.opacity())
                        .with_tint(animator.tint()),
                );
            }
        }
        clouds.retain(|c| c.opacity > 0.0 && !c.positions.is_empty());
        clouds
    }

    fn apply_loads(&mut self) {
        for (id, result) in self.queue.drain() {
            let Some(slot) = self.slots.get_mut(id.0) else {
                log::warn!("load result for unknown shape {id}");
                continue;
            };
            if !matches!(slot.state, LoadState::Pending) {
                log::debug!("{}: ignoring duplicate load result", slot.spec.name);
                continue;
            }
            match model_animator(id, slot, result, self.budget, &mut self.rng) {
                Ok(animator) => {
                    slot.animator = Some(animator);
                    slot.state = LoadState::Loaded;
                }
                Err(err) => fail_slot(slot, err),
            }
        }
    }

    /// Release every buffer, dispose render resources, detach from the
    /// scroll source and refuse further frames. Idempotent.
    pub fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.queue.close();
        if let Some(scroll) = self.scroll.take() {
            for id in scroll.subscriptions {
                if !scroll.source.unsubscribe(id) {
                    log::debug!("scroll subscription {id:?} was already gone");
                }
            }
        }
        self.background.release();
        self.hint.release();
        self.intro.release();
        for slot in &mut self.slots {
            if let Some(mut animator) = slot.animator.take() {
                animator.release();
            }
        }
        self.resources.dispose();
        log::info!("scene torn down after {} frames", self.frames);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn shape_count(&self) -> usize {
        self.slots.len()
    }

    pub fn shape_spec(&self, id: ShapeId) -> Option<&ShapeSpec> {
        self.slots.get(id.0).map(|s| &s.spec)
    }

    pub fn shape_state(&self, id: ShapeId) -> Option<&LoadState> {
        self.slots.get(id.0).map(|s| &s.state)
    }

    pub fn animator(&self, id: ShapeId) -> Option<&ShapeAnimator> {
        self.slots.get(id.0).and_then(|s| s.animator.as_ref())
    }

    /// Shape whose section the reader is currently inside, if any.
    pub fn current_section(&self) -> Option<ShapeId> {
        let section = self.layout.section_at(self.progress, self.sections)?;
        self.slots
            .iter()
            .position(|s| s.spec.section == section)
            .map(ShapeId)
    }

    /// Animation window of shape `id`.
    pub fn window(&self, id: ShapeId) -> Option<AnimationWindow> {
        self.slots.get(id.0).map(|s| s.window)
    }

    pub fn layout(&self) -> &ScrollLayout {
        &self.layout
    }

    pub fn budget(&self) -> ParticleBudget {
        self.budget
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn background(&self) -> &BackgroundField {
        &self.background
    }

    pub fn hint(&self) -> &ScrollHint {
        &self.hint
    }

    pub fn intro(&self) -> &IntroCluster {
        &self.intro
    }

    pub fn resources(&self) -> &RenderResources {
        &self.resources
    }

    /// Total points held in live buffers across the whole scene.
    pub fn buffered_points(&self) -> usize {
        let shapes: usize = self
            .slots
            .iter()
            .filter_map(|s| s.animator.as_ref())
            .flat_map(|a| a.layers())
            .map(|l| l.points.len())
            .sum();
        let intro: usize = self.intro.views().map(|v| v.positions.len()).sum();
        shapes + self.background.len() + self.hint.points().len() + intro
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Animator for a procedural section; `None` for sections waiting on a loader.
fn build_animator(
    id: ShapeId,
    slot: &ShapeSlot,
    budget: ParticleBudget,
    rng: &mut StdRng,
) -> Option<Result<ShapeAnimator, ShapeError>> {
    let empty = || ShapeError::EmptyGeometry {
        shape: slot.spec.name.clone(),
    };
    let animator = match &slot.spec.source {
        ShapeSource::Model { .. } => return None,
        ShapeSource::Primitive { geometry, count } => {
            let count = budget.adjust(*count);
            if count == 0 {
                return Some(Err(empty()));
            }
            if slot.motion.is_morph() {
                let scattered = scattered_points(count, SCATTER_RANGE, SCATTER_Z_OFFSET, rng);
                let formed = place(
                    generate(*geometry, count, rng),
                    MORPH_FORMED_SCALE,
                    MORPH_FORMED_OFFSET,
                );
                ShapeAnimator::with_morph(id, slot.window, slot.motion, scattered, formed, MORPH_POINT_SIZE)
            } else {
                let mut layers = Layers::new();
                layers.push(Layer::new(generate(*geometry, count, rng), SHAPE_POINT_SIZE));
                ShapeAnimator::new(id, slot.window, slot.motion, layers)
            }
        }
        ShapeSource::Globe {
            continent_count,
            glow_count,
        } => {
            let continent_count = budget.adjust(*continent_count);
            if continent_count == 0 {
                return Some(Err(empty()));
            }
            let layers = globe_layers(continent_count, budget.adjust(*glow_count), rng)
                .into_iter()
                .zip(GLOBE_LAYER_WEIGHTS.iter().zip(GLOBE_POINT_SIZES))
                .map(|(set, (&weight, size))| Layer::colored(set.positions, set.colors, weight, size))
                .collect::<Layers>();
            ShapeAnimator::new(id, slot.window, slot.motion, layers)
        }
    };
    Some(Ok(animator.with_tint(slot.spec.tint)))
}

fn model_animator(
    id: ShapeId,
    slot: &ShapeSlot,
    result: LoadResult,
    budget: ParticleBudget,
    rng: &mut StdRng,
) -> Result<ShapeAnimator, ShapeError> {
    let name = &slot.spec.name;
    let ShapeSource::Model {
        fine_scale,
        max_vertices,
        ..
    } = &slot.spec.source
    else {
        return Err(ShapeError::load_failure(name.as_str(), "not a model section"));
    };
    let vertices = result?;
    let sampled = sample_model(&vertices, *max_vertices, budget, *fine_scale).map_err(|e| match e {
        SampleError::NoVertices => ShapeError::EmptyGeometry { shape: name.clone() },
    })?;
    log::info!(
        "{name}: {} points (sampled from {})",
        sampled.points.len(),
        sampled.source_count
    );
    let animator = if slot.motion.is_morph() {
        let scattered = scattered_points(sampled.points.len(), SCATTER_RANGE, SCATTER_Z_OFFSET, rng);
        let formed = place(sampled.points, MODEL_SCALE, MODEL_FORMED_OFFSET);
        ShapeAnimator::with_morph(id, slot.window, slot.motion, scattered, formed, SHAPE_POINT_SIZE)
    } else {
        let mut layers = Layers::new();
        layers.push(Layer::new(sampled.points, SHAPE_POINT_SIZE));
        ShapeAnimator::new(id, slot.window, slot.motion, layers)
    };
    Ok(animator.with_tint(slot.spec.tint))
}

fn fail_slot(slot: &mut ShapeSlot, err: ShapeError) {
    if err.is_empty_geometry() {
        log::error!("{}: asset is valid but has no vertices; section stays hidden", slot.spec.name);
    } else {
        log::error!("{}: {err}; section stays hidden", slot.spec.name);
    }
    slot.animator = None;
    slot.state = LoadState::Failed(err);
}

/// Scale about the origin, then translate.
fn place(mut cloud: PointCloud, scale: f32, offset: Vec3) -> PointCloud {
    cloud.write_with(|buf| {
        for p in buf.chunks_exact_mut(3) {
            p[0] = p[0] * scale + offset.x;
            p[1] = p[1] * scale + offset.y;
            p[2] = p[2] * scale + offset.z;
        }
    });
    cloud
}
