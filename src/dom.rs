use crate::constants::{MAX_DEVICE_PIXEL_RATIO, SCROLL_BAR_ID, SCROLL_PERCENT_ID};
use pointscroll_core::{DeviceProfile, ScrollMetrics};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn device_pixel_ratio() -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .min(MAX_DEVICE_PIXEL_RATIO)
}

/// Match the canvas backing store to its CSS size times the (capped) DPR.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    let dpr = device_pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    let w_px = (rect.width() * dpr) as u32;
    let h_px = (rect.height() * dpr) as u32;
    canvas.set_width(w_px.max(1));
    canvas.set_height(h_px.max(1));
}

pub fn measure_scroll(window: &web::Window) -> ScrollMetrics {
    let scroll_height = window
        .document()
        .and_then(|d| d.document_element())
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    let viewport_height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    ScrollMetrics {
        scroll_y: window.scroll_y().unwrap_or(0.0),
        scroll_height,
        viewport_height,
    }
}

pub fn device_profile(window: &web::Window) -> DeviceProfile {
    let viewport_width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let cores = window.navigator().hardware_concurrency();
    DeviceProfile {
        viewport_width,
        hardware_concurrency: (cores > 0.0).then_some(cores as u32),
    }
}

/// Update the page's scroll indicator; missing elements are ignored.
pub fn update_scroll_indicator(document: &web::Document, progress: f32) {
    let percent = (progress * 100.0).round();
    if let Some(bar) = document
        .get_element_by_id(SCROLL_BAR_ID)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
    {
        _ = bar.style().set_property("height", &format!("{percent}%"));
    }
    if let Some(label) = document.get_element_by_id(SCROLL_PERCENT_ID) {
        label.set_text_content(Some(&format!("{percent}%")));
    }
}
