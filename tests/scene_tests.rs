// Host-side tests for the scene orchestrator, driven through a recording
// render surface instead of a canvas.

use pointscroll_core::constants::MODEL_SPIN;
use pointscroll_core::{
    AnimationKind, Choreography, CloudRole, FrameOutcome, FrameView, Geometry, LoadState, ParticleBudget,
    RenderResources, RenderSurface, Scene, SceneConfig, ScrollChannel, ShapeError, ShapeId,
    ShapeSpec, SubscriptionId,
};
use std::rc::Rc;

const DT: f32 = 1.0 / 60.0;
const SEED: u64 = 11;

struct Recorded {
    progress: f32,
    clouds: Vec<(CloudRole, usize, f32, u64)>,
    has_sprite: bool,
}

impl Recorded {
    fn roles(&self) -> Vec<CloudRole> {
        self.clouds.iter().map(|c| c.0).collect()
    }

    fn shape(&self, id: ShapeId) -> Option<&(CloudRole, usize, f32, u64)> {
        self.clouds
            .iter()
            .find(|c| c.0 == CloudRole::Shape(id) && c.1 == 0)
    }
}

#[derive(Default)]
struct Recorder {
    frames: Vec<Recorded>,
}

impl RenderSurface for Recorder {
    fn render(&mut self, frame: &FrameView<'_>) {
        self.frames.push(Recorded {
            progress: frame.progress,
            clouds: frame
                .clouds
                .iter()
                .map(|c| (c.role, c.layer, c.opacity, c.version))
                .collect(),
            has_sprite: frame.sprite.is_some(),
        });
    }
}

fn scene(config: SceneConfig) -> Scene {
    Scene::new(config, ParticleBudget::FULL, RenderResources::build(), SEED)
}

fn box_config() -> SceneConfig {
    let mut config = SceneConfig::empty();
    config.shapes.push(ShapeSpec::primitive(
        0,
        "box",
        Geometry::Box,
        AnimationKind::LeftToCenter,
        300,
    ));
    config
}

fn model_config() -> SceneConfig {
    let mut config = SceneConfig::empty();
    config.push_model("horse", "models/horse.bin", AnimationKind::RightToCenter, 1.0);
    config
}

fn vertices(points: usize) -> Vec<f32> {
    (0..points)
        .flat_map(|i| [i as f32, (i % 7) as f32, -(i as f32) * 0.5])
        .collect()
}

fn run(scene: &mut Scene, surface: &mut Recorder, progress: f32, frames: usize) {
    scene.set_progress(progress);
    for _ in 0..frames {
        assert_eq!(scene.frame(DT, surface), FrameOutcome::Rendered);
    }
}

#[test]
fn render_is_called_once_per_frame() {
    let mut scene = scene(box_config());
    let mut surface = Recorder::default();
    run(&mut scene, &mut surface, 0.0, 5);
    assert_eq!(surface.frames.len(), 5);
    assert_eq!(scene.frames(), 5);
    assert!(surface.frames.iter().all(|f| f.has_sprite));
}

#[test]
fn clouds_are_ordered_ambient_first() {
    let mut scene = scene(box_config());
    let mut surface = Recorder::default();
    run(&mut scene, &mut surface, 0.0, 1);

    let roles = surface.frames[0].roles();
    assert_eq!(roles[0], CloudRole::Background);
    assert_eq!(roles[1], CloudRole::Hint);
    assert_eq!(roles[2..7], [CloudRole::Intro; 5]);
    // the box has not faded in yet, so it is not drawn
    assert_eq!(roles.len(), 7);

    run(&mut scene, &mut surface, 0.18, 30);
    let last = surface.frames.last().expect("frames");
    assert!(last.roles().ends_with(&[CloudRole::Shape(ShapeId(0))]));
    let (_, _, opacity, _) = last.shape(ShapeId(0)).expect("box visible");
    assert!(*opacity > 0.5, "opacity {opacity}");
    assert!((last.progress - 0.18).abs() < 1e-6);
}

#[test]
fn intro_fades_once_scrolled_past() {
    let mut scene = scene(SceneConfig::empty());
    let mut surface = Recorder::default();
    run(&mut scene, &mut surface, 0.5, 200);
    let last = surface.frames.last().expect("frames");
    for (role, _, opacity, _) in &last.clouds {
        match role {
            CloudRole::Background => assert!(*opacity > 0.5),
            other => assert!(*opacity < 1e-3, "{other:?} still at {opacity}"),
        }
    }
    assert!(scene.intro().opacity(0).expect("member") < 1e-3);
    assert!(scene.hint().opacity() < 1e-3);
}

#[test]
fn particle_budget_scales_shape_counts() {
    let scene = Scene::new(
        box_config(),
        ParticleBudget::new(0.5),
        RenderResources::build(),
        SEED,
    );
    let animator = scene.animator(ShapeId(0)).expect("box built");
    assert_eq!(animator.layers()[0].points.len(), 150);
    assert_eq!(scene.background().len(), 100);
}

#[test]
fn same_seed_builds_the_same_scene() {
    let a = scene(SceneConfig::default());
    let b = scene(SceneConfig::default());
    for i in 0..a.shape_count() {
        let (la, lb) = (
            a.animator(ShapeId(i)).expect("built").layers(),
            b.animator(ShapeId(i)).expect("built").layers(),
        );
        assert_eq!(la.len(), lb.len());
        for (x, y) in la.iter().zip(lb) {
            assert_eq!(x.points, y.points);
        }
    }
}

#[test]
fn default_scene_builds_every_procedural_section() {
    let scene = scene(SceneConfig::default());
    assert_eq!(scene.shape_count(), 6);
    for i in 0..6 {
        assert_eq!(scene.shape_state(ShapeId(i)), Some(&LoadState::Loaded));
    }
    let globe = scene.animator(ShapeId(5)).expect("globe");
    assert_eq!(globe.layers().len(), 3);
    assert_eq!(globe.layers()[0].points.len(), 3800);
    assert!(scene.model_requests().is_empty());
}

#[test]
fn zero_count_primitive_fails_as_empty_geometry() {
    let mut config = SceneConfig::empty();
    config
        .shapes
        .push(ShapeSpec::primitive(0, "dot", Geometry::Box, AnimationKind::ZoomThrough, 0));
    let scene = scene(config);
    let state = scene.shape_state(ShapeId(0)).expect("slot");
    assert!(matches!(state, LoadState::Failed(e) if e.is_empty_geometry()));
    assert!(scene.animator(ShapeId(0)).is_none());
}

#[test]
fn pending_models_are_skipped_until_loaded() {
    let mut scene = scene(model_config());
    let mut surface = Recorder::default();
    let id = ShapeId(0);

    assert_eq!(scene.model_requests(), vec![(id, "models/horse.bin".to_string())]);
    assert_eq!(scene.shape_state(id), Some(&LoadState::Pending));
    run(&mut scene, &mut surface, 0.18, 3);
    assert!(surface.frames.iter().all(|f| f.shape(id).is_none()));

    scene.load_queue().complete(id, Ok(vertices(20_000)));
    run(&mut scene, &mut surface, 0.18, 1);
    assert_eq!(scene.shape_state(id), Some(&LoadState::Loaded));
    assert!(scene.model_requests().is_empty());
    let points = scene.animator(id).expect("loaded").layers()[0].points.len();
    assert_eq!(points, 10_000);

    run(&mut scene, &mut surface, 0.18, 30);
    assert!(surface.frames.last().expect("frames").shape(id).is_some());
}

#[test]
fn failed_loads_leave_the_section_hidden() {
    let mut scene = scene(model_config());
    let mut surface = Recorder::default();
    let id = ShapeId(0);
    scene
        .load_queue()
        .complete(id, Err(ShapeError::load_failure("horse", "HTTP 404")));
    run(&mut scene, &mut surface, 0.18, 30);

    assert!(scene.shape_state(id).expect("slot").is_failed());
    assert!(scene.animator(id).is_none());
    assert_eq!(surface.frames.len(), 30);
    assert!(surface.frames.iter().all(|f| f.shape(id).is_none()));

    // a late success for a failed slot is ignored
    scene.load_queue().complete(id, Ok(vertices(100)));
    run(&mut scene, &mut surface, 0.18, 1);
    assert!(scene.shape_state(id).expect("slot").is_failed());
}

#[test]
fn empty_model_is_reported_as_empty_geometry() {
    let mut scene = scene(model_config());
    let mut surface = Recorder::default();
    scene.load_queue().complete(ShapeId(0), Ok(Vec::new()));
    run(&mut scene, &mut surface, 0.0, 1);
    assert_eq!(
        scene.shape_state(ShapeId(0)),
        Some(&LoadState::Failed(ShapeError::EmptyGeometry {
            shape: "horse".to_string()
        }))
    );
}

#[test]
fn morph_section_rewrites_its_buffer_while_forming() {
    let mut scene = scene(SceneConfig::default());
    let mut surface = Recorder::default();
    let torus = ShapeId(1);
    let w = scene.layout().window(1);
    let mid = w.section_start + 0.5 * (w.section_end - w.section_start);

    run(&mut scene, &mut surface, mid, 1);
    let first = scene.animator(torus).expect("torus").layers()[0].points.version();
    scene.set_progress(mid + 0.02);
    scene.frame(DT, &mut surface);
    let second = scene.animator(torus).expect("torus").layers()[0].points.version();
    assert!(second > first);

    // holding still does not rewrite
    scene.frame(DT, &mut surface);
    assert_eq!(
        scene.animator(torus).expect("torus").layers()[0].points.version(),
        second
    );
}

#[test]
fn attached_scroll_source_drives_progress() {
    let channel = ScrollChannel::new();
    let mut scene = scene(box_config());
    scene.attach_scroll(Rc::new(channel.clone()), Vec::<SubscriptionId>::new());
    let mut surface = Recorder::default();

    channel.set(0.3);
    scene.frame(DT, &mut surface);
    assert!((scene.progress() - 0.3).abs() < 1e-6);
    assert_eq!(scene.current_section(), None);

    channel.set(0.2);
    scene.frame(DT, &mut surface);
    assert_eq!(scene.current_section(), Some(ShapeId(0)));
    assert!((surface.frames[1].progress - 0.2).abs() < 1e-6);
}

#[test]
fn teardown_releases_everything_and_stops_frames() {
    let channel = ScrollChannel::new();
    let indicator = channel.subscribe(|_| {});
    let mut scene = scene(SceneConfig::default());
    scene.attach_scroll(Rc::new(channel.clone()), [indicator]);
    let queue = scene.load_queue();
    let mut surface = Recorder::default();
    run(&mut scene, &mut surface, 0.2, 3);
    assert!(scene.buffered_points() > 0);
    assert_eq!(channel.subscriber_count(), 1);

    scene.teardown();
    assert!(scene.is_disposed());
    assert_eq!(scene.buffered_points(), 0);
    assert_eq!(channel.subscriber_count(), 0);
    assert!(scene.resources().is_disposed());
    assert!(queue.is_closed());

    assert_eq!(scene.frame(DT, &mut surface), FrameOutcome::Stopped);
    assert_eq!(surface.frames.len(), 3);

    // loads finishing after teardown go nowhere
    queue.complete(ShapeId(0), Ok(vertices(10)));
    assert_eq!(queue.pending(), 0);

    scene.teardown();
    assert_eq!(scene.frames(), 3);
}

#[test]
fn dropping_the_scene_detaches_from_scroll() {
    let channel = ScrollChannel::new();
    let id = channel.subscribe(|_| {});
    {
        let mut scene = scene(SceneConfig::empty());
        scene.attach_scroll(Rc::new(channel.clone()), [id]);
    }
    assert_eq!(channel.subscriber_count(), 0);
    assert!(!channel.unsubscribe(id));
}

/// Default sections plus one model per kind, as the page configures them.
fn crowded_config() -> SceneConfig {
    let mut config = SceneConfig::default();
    for (i, kind) in AnimationKind::ALL.into_iter().enumerate() {
        config.push_model(&format!("model-{i}"), &format!("models/{i}.bin"), kind, 1.0);
    }
    config
}

#[test]
fn every_section_fits_inside_the_page() {
    for config in [SceneConfig::default(), crowded_config()] {
        let sections = config.section_count();
        let scene = scene(config);
        assert_eq!(scene.shape_count(), sections);
        for i in 0..scene.shape_count() {
            let w = scene.window(ShapeId(i)).expect("slot");
            assert!(w.preview_start >= 0.0, "section {i} previews at {}", w.preview_start);
            assert!(w.section_end <= 1.0 + 1e-6, "section {i} ends at {}", w.section_end);
        }
    }
    let last = scene(crowded_config()).window(ShapeId(11)).expect("slot");
    assert!((last.section_end - 1.0).abs() < 1e-5);
}

#[test]
fn appended_model_becomes_visible_while_scrolling_to_the_end() {
    let mut config = SceneConfig::default();
    let model = config.push_model("plane", "models/plane.bin", AnimationKind::LeftToCenter, 1.0);
    assert_eq!(model, ShapeId(6));
    let mut scene = scene(config);
    scene.load_queue().complete(model, Ok(vertices(3000)));

    let globe = ShapeId(5);
    let mut surface = Recorder::default();
    let (mut model_peak, mut globe_peak) = (0.0f32, 0.0f32);
    let frames = 3000;
    for f in 0..=frames {
        scene.set_progress(f as f32 / frames as f32);
        scene.frame(DT, &mut surface);
        model_peak = model_peak.max(scene.animator(model).expect("loaded").opacity());
        globe_peak = globe_peak.max(scene.animator(globe).expect("globe").opacity());
    }
    assert!(model_peak > 0.5, "model peak {model_peak}");
    assert!(globe_peak > 0.5, "globe peak {globe_peak}");
}

#[test]
fn scatter_to_form_model_morphs_its_points() {
    let mut config = SceneConfig::empty();
    let id = config.push_model("car", "models/car.bin", AnimationKind::ScatterToForm, 1.0);
    let mut scene = scene(config);
    scene.load_queue().complete(id, Ok(vertices(3000)));
    let mut surface = Recorder::default();

    let w = scene.window(id).expect("slot");
    let mid = w.section_start + 0.5 * (w.section_end - w.section_start);
    run(&mut scene, &mut surface, mid, 1);
    let animator = scene.animator(id).expect("loaded");
    assert_eq!(animator.motion().choreography, Choreography::Morph);
    assert!(animator.morph_progress().is_some());
    let first = animator.layers()[0].points.version();

    run(&mut scene, &mut surface, mid + 0.02, 1);
    let second = scene.animator(id).expect("loaded").layers()[0].points.version();
    assert!(second > first);
}

#[test]
fn rotate_in_place_model_spins_on_both_axes() {
    let mut config = SceneConfig::empty();
    let id = config.push_model("gun", "models/gun.bin", AnimationKind::RotateInPlace, 1.0);
    let mut scene = scene(config);
    scene.load_queue().complete(id, Ok(vertices(3000)));
    let mut surface = Recorder::default();

    let w = scene.window(id).expect("slot");
    run(&mut scene, &mut surface, w.section_start + 0.01, 60);
    let animator = scene.animator(id).expect("loaded");
    assert_eq!(animator.motion().choreography, Choreography::Spin);
    assert!(animator.morph_progress().is_none());
    let r = animator.transform().rotation;
    assert!((r.x - MODEL_SPIN[0] * DT * 60.0).abs() < 1e-4, "{r}");
    assert!((r.y - MODEL_SPIN[1] * DT * 60.0).abs() < 1e-4, "{r}");
}

#[test]
fn zero_dt_frames_settle_and_then_hold() {
    let mut scene = scene(SceneConfig::default());
    let mut surface = Recorder::default();
    scene.set_progress(0.18);
    for _ in 0..2000 {
        scene.frame(0.0, &mut surface);
    }
    assert_eq!(scene.background().transform().rotation, glam::Vec2::ZERO);
    for i in 0..scene.shape_count() {
        let animator = scene.animator(ShapeId(i)).expect("built");
        assert_eq!(animator.transform().rotation, glam::Vec2::ZERO, "section {i}");
    }

    let snapshot = |scene: &Scene| {
        let shapes: Vec<_> = (0..scene.shape_count())
            .map(|i| {
                let a = scene.animator(ShapeId(i)).expect("built");
                (a.transform(), a.opacity())
            })
            .collect();
        let intro: Vec<_> = (0..scene.intro().len())
            .map(|i| (scene.intro().transform(i), scene.intro().opacity(i)))
            .collect();
        let hint = (scene.hint().points().as_slice().to_vec(), scene.hint().opacity());
        (shapes, intro, hint)
    };
    let before = snapshot(&scene);
    scene.frame(0.0, &mut surface);
    scene.frame(0.0, &mut surface);
    let after = snapshot(&scene);

    for ((ta, oa), (tb, ob)) in before.0.iter().zip(&after.0) {
        assert!(ta.position.distance(tb.position) < 1e-6);
        assert!((ta.scale - tb.scale).abs() < 1e-6);
        assert!((oa - ob).abs() < 1e-6);
    }
    for ((ta, oa), (tb, ob)) in before.1.iter().zip(&after.1) {
        let (ta, tb) = (ta.expect("member"), tb.expect("member"));
        assert!(ta.position.distance(tb.position) < 1e-6);
        assert!((ta.scale - tb.scale).abs() < 1e-6);
        assert!((oa.expect("member") - ob.expect("member")).abs() < 1e-6);
    }
    assert_eq!(before.2 .0, after.2 .0);
    assert!((before.2 .1 - after.2 .1).abs() < 1e-6);
}
