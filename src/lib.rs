#![cfg(target_arch = "wasm32")]
use constants::{CANVAS_ID, CONTAINER_ID, MODEL_ASSETS};
use pointscroll_core::{AnimationKind, RenderResources, Scene, SceneConfig, ScrollChannel};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod loader;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("pointscroll-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Find `#app-canvas`, or create one inside `#canvas-container`.
fn locate_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    if let Some(el) = document.get_element_by_id(CANVAS_ID) {
        return el
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)));
    }
    let container = document
        .get_element_by_id(CONTAINER_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID} and #{CONTAINER_ID}"))?;
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas.set_id(CANVAS_ID);
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    Ok(canvas)
}

fn scene_config() -> SceneConfig {
    let mut config = SceneConfig::default();
    for &(name, url, kind, fine_scale) in MODEL_ASSETS {
        match kind.parse::<AnimationKind>() {
            Ok(kind) => {
                config.push_model(name, url, kind, fine_scale);
            }
            Err(e) => log::warn!("{name}: {e}; section skipped"),
        }
    }
    config
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas = locate_canvas(&document)?;
    dom::sync_canvas_backing_size(&canvas);

    let budget = dom::device_profile(&window).budget();
    let mut scene = Scene::new(scene_config(), budget, RenderResources::build(), rand::random());

    // Scroll progress: listeners write, the scene reads once per frame
    let channel = ScrollChannel::new();
    let indicator_doc = document.clone();
    let indicator = channel.subscribe(move |p| dom::update_scroll_indicator(&indicator_doc, p));
    scene.attach_scroll(Rc::new(channel.clone()), [indicator]);
    let listeners = events::wire_scroll_listeners(&window, &channel, &canvas)?;
    channel.set(dom::measure_scroll(&window).progress());

    loader::spawn_model_loads(&scene);

    let gpu = match render::GpuSurface::new(canvas).await {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            log::error!("WebGPU unavailable, nothing will be drawn: {e:?}");
            None
        }
    };
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(scene, gpu)));
    let handle = frame::start_loop(frame_ctx.clone());
    events::wire_teardown(&window, handle, listeners, frame_ctx)?;
    Ok(())
}
