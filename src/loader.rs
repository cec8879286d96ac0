use pointscroll_core::vertex_cache;
use pointscroll_core::{LoadQueue, Scene, ShapeError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("fetch {url}: {e:?}"))?;
    let resp: web::Response = resp_value
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("not a Response: {e:?}"))?;
    if !resp.ok() {
        anyhow::bail!("GET {url}: HTTP {}", resp.status());
    }
    let buffer = JsFuture::from(
        resp.array_buffer()
            .map_err(|e| anyhow::anyhow!("read body: {e:?}"))?,
    )
    .await
    .map_err(|e| anyhow::anyhow!("read body: {e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

async fn load_vertices(name: &str, url: &str) -> Result<Vec<f32>, ShapeError> {
    let bytes = fetch_bytes(url)
        .await
        .map_err(|e| ShapeError::load_failure(name, e))?;
    vertex_cache::decode(&bytes)
}

/// Fire off one fetch per pending model section. Results land in the scene's
/// load queue and are picked up at the start of a later frame.
pub fn spawn_model_loads(scene: &Scene) {
    let queue: LoadQueue = scene.load_queue();
    for (id, url) in scene.model_requests() {
        let name = scene
            .shape_spec(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string());
        let queue = queue.clone();
        log::info!("loading {name} from {url}");
        spawn_local(async move {
            let result = load_vertices(&name, &url).await;
            queue.complete(id, result);
        });
    }
}
