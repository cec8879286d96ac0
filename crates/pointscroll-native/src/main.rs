use anyhow::Context;
use glam::Mat4;
use pointscroll_core::constants::MAX_CACHED_VERTICES;
use pointscroll_core::vertex_cache;
use pointscroll_core::{
    AnimationKind, Camera, CloudRole, FrameOutcome, FrameView, ParticleBudget, RenderResources,
    RenderSurface, Scene, SceneConfig, ShapeId,
};
use pointscroll_native::gltf_source;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const USAGE: &str = "usage:
  pointscroll-native preview [--frames N] [model.bin|model.glb ...]
  pointscroll-native bake <input.glb|input.gltf|input.bin> <output.bin> [--max N]";

const DEFAULT_FRAMES: usize = 600;
const FRAME_DT: f32 = 1.0 / 60.0;
const LOG_EVERY: u64 = 60;
const PREVIEW_SEED: u64 = 7;

/// Render surface that projects every point with the page camera and logs a
/// summary instead of drawing.
struct LogSurface {
    camera: Camera,
    peak_opacity: BTreeMap<ShapeId, f32>,
    frames: u64,
}

impl LogSurface {
    fn new() -> Self {
        Self {
            camera: Camera::new(16.0 / 9.0),
            peak_opacity: BTreeMap::new(),
            frames: 0,
        }
    }

    fn on_screen(&self, view_projection: Mat4, frame: &FrameView<'_>) -> usize {
        frame
            .clouds
            .iter()
            .map(|cloud| {
                let mvp = view_projection * cloud.transform.matrix();
                cloud
                    .positions
                    .iter()
                    .filter_map(|p| self.camera.project_with(&mvp, p))
                    .filter(|ndc| ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0)
                    .count()
            })
            .sum()
    }
}

impl RenderSurface for LogSurface {
    fn render(&mut self, frame: &FrameView<'_>) {
        for cloud in frame.shape_clouds() {
            if let CloudRole::Shape(id) = cloud.role {
                let peak = self.peak_opacity.entry(id).or_insert(0.0);
                *peak = peak.max(cloud.opacity);
            }
        }
        if self.frames % LOG_EVERY == 0 {
            let visible: Vec<String> = frame
                .shape_clouds()
                .filter(|c| c.layer == 0)
                .map(|c| format!("{:?}={:.2}", c.role, c.opacity))
                .collect();
            log::info!(
                "progress {:.3}: {} clouds, {}/{} points on screen, shapes [{}]",
                frame.progress,
                frame.clouds.len(),
                self.on_screen(self.camera.view_projection(), frame),
                frame.point_count(),
                visible.join(", ")
            );
        }
        self.frames += 1;
    }
}

/// Load raw xyz from a glTF model or an existing vertex cache.
fn read_vertices(path: &Path) -> anyhow::Result<Vec<f32>> {
    if gltf_source::is_gltf(path) {
        return gltf_source::import_vertices(path);
    }
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    vertex_cache::decode(&bytes).with_context(|| format!("decode {}", path.display()))
}

fn parse_count(flag: &str, value: Option<&String>) -> anyhow::Result<usize> {
    let value = value.ok_or_else(|| anyhow::anyhow!("{flag} needs a value\n{USAGE}"))?;
    value
        .parse()
        .with_context(|| format!("{flag}: '{value}' is not a count"))
}

fn preview(args: &[String]) -> anyhow::Result<()> {
    let mut frames = DEFAULT_FRAMES;
    let mut models = Vec::new();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--frames" => frames = parse_count("--frames", it.next())?.max(2),
            other => models.push(PathBuf::from(other)),
        }
    }

    let mut config = SceneConfig::default();
    for (i, path) in models.iter().enumerate() {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("model-{i}"));
        let kind = AnimationKind::ALL[i % AnimationKind::ALL.len()];
        config.push_model(&name, &path.to_string_lossy(), kind, 1.0);
    }

    let mut scene = Scene::new(config, ParticleBudget::FULL, RenderResources::build(), PREVIEW_SEED);
    let queue = scene.load_queue();
    for (id, url) in scene.model_requests() {
        let result = read_vertices(Path::new(&url))
            .map(|v| vertex_cache::bake(&v, MAX_CACHED_VERTICES))
            .map_err(|e| pointscroll_core::ShapeError::load_failure(url.as_str(), format!("{e:#}")));
        queue.complete(id, result);
    }

    let mut surface = LogSurface::new();
    for f in 0..frames {
        scene.set_progress(f as f32 / (frames - 1) as f32);
        if scene.frame(FRAME_DT, &mut surface) == FrameOutcome::Stopped {
            break;
        }
    }

    for i in 0..scene.shape_count() {
        let id = ShapeId(i);
        let name = scene.shape_spec(id).map_or("?", |s| s.name.as_str());
        let peak = surface.peak_opacity.get(&id).copied().unwrap_or(0.0);
        log::info!(
            "section {i} {name}: {:?}, peak opacity {peak:.2}",
            scene.shape_state(id)
        );
    }
    scene.teardown();
    Ok(())
}

fn bake(args: &[String]) -> anyhow::Result<()> {
    let mut max = MAX_CACHED_VERTICES;
    let mut paths = Vec::new();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--max" => max = parse_count("--max", it.next())?,
            other => paths.push(other),
        }
    }
    let [input, output] = paths.as_slice() else {
        anyhow::bail!("bake needs an input and an output path\n{USAGE}");
    };

    let source = read_vertices(Path::new(input))?;
    let baked = vertex_cache::bake(&source, max);
    std::fs::write(Path::new(output), vertex_cache::encode(&baked))
        .with_context(|| format!("write {output}"))?;
    log::info!(
        "baked {input}: {} -> {} vertices into {output}",
        source.len() / 3,
        baked.len() / 3
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => preview(&[]),
        Some("preview") => preview(&args[1..]),
        Some("bake") => bake(&args[1..]),
        Some("-h" | "--help") => {
            println!("{USAGE}");
            Ok(())
        }
        Some(other) => anyhow::bail!("unknown command '{other}'\n{USAGE}"),
    }
}
