use crate::dom;
use crate::frame::{FrameContext, LoopHandle};
use pointscroll_core::ScrollChannel;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// An attached DOM listener that can be detached again.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut()>,
}

impl Listener {
    pub fn add(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut() + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("add {event} listener: {e:?}"))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    pub fn remove(self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("remove {} listener: {:?}", self.event, e);
        }
    }
}

/// Publish scroll progress on `scroll` and `resize`; `resize` also resizes
/// the canvas backing store.
pub fn wire_scroll_listeners(
    window: &web::Window,
    channel: &ScrollChannel,
    canvas: &web::HtmlCanvasElement,
) -> anyhow::Result<Vec<Listener>> {
    let on_scroll = {
        let window = window.clone();
        let channel = channel.clone();
        move || channel.set(dom::measure_scroll(&window).progress())
    };
    let on_resize = {
        let window = window.clone();
        let channel = channel.clone();
        let canvas = canvas.clone();
        move || {
            dom::sync_canvas_backing_size(&canvas);
            channel.set(dom::measure_scroll(&window).progress());
        }
    };
    Ok(vec![
        Listener::add(window, "scroll", on_scroll)?,
        Listener::add(window, "resize", on_resize)?,
    ])
}

/// On `beforeunload`: stop the frame loop, detach listeners, tear the scene down.
pub fn wire_teardown(
    window: &web::Window,
    handle: LoopHandle,
    listeners: Vec<Listener>,
    frame_ctx: Rc<RefCell<FrameContext>>,
) -> anyhow::Result<()> {
    let mut pending = Some((handle, listeners));
    let closure = Closure::wrap(Box::new(move || {
        let Some((handle, listeners)) = pending.take() else {
            return;
        };
        handle.cancel();
        for listener in listeners {
            listener.remove();
        }
        frame_ctx.borrow_mut().teardown();
    }) as Box<dyn FnMut()>);
    window
        .add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("add beforeunload listener: {e:?}"))?;
    closure.forget();
    Ok(())
}
