use crate::constants::MAX_FRAME_DT_SEC;
use crate::render::{GpuSurface, Headless};
use instant::Instant;
use pointscroll_core::{FrameOutcome, Scene};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub scene: Scene,
    /// `None` when WebGPU could not be initialised; the scene still ticks.
    pub gpu: Option<GpuSurface>,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn new(scene: Scene, gpu: Option<GpuSurface>) -> Self {
        Self {
            scene,
            gpu,
            last_instant: Instant::now(),
        }
    }

    pub fn frame(&mut self) -> FrameOutcome {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        let dt_sec = dt.as_secs_f32().min(MAX_FRAME_DT_SEC);
        match self.gpu.as_mut() {
            Some(gpu) => self.scene.frame(dt_sec, gpu),
            None => self.scene.frame(dt_sec, &mut Headless),
        }
    }

    pub fn teardown(&mut self) {
        self.scene.teardown();
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.release();
        }
    }
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Running requestAnimationFrame loop.
pub struct LoopHandle {
    tick: Tick,
    raf_id: Rc<Cell<Option<i32>>>,
    cancelled: Rc<Cell<bool>>,
}

impl LoopHandle {
    /// Cancel the pending callback and drop the loop closure. No further
    /// frame runs after this returns.
    pub fn cancel(self) {
        self.cancelled.set(true);
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        self.tick.borrow_mut().take();
        log::debug!("frame loop cancelled");
    }
}

fn request_frame(tick: &Tick, raf_id: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(closure) = tick.borrow().as_ref() {
        match w.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => raf_id.set(Some(id)),
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let tick: Tick = Rc::new(RefCell::new(None));
    let raf_id = Rc::new(Cell::new(None));
    let cancelled = Rc::new(Cell::new(false));

    let tick_clone = tick.clone();
    let raf_clone = raf_id.clone();
    let cancelled_clone = cancelled.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        raf_clone.set(None);
        if cancelled_clone.get() {
            return;
        }
        let outcome = frame_ctx.borrow_mut().frame();
        if outcome == FrameOutcome::Stopped {
            log::debug!("scene stopped; not scheduling another frame");
            return;
        }
        request_frame(&tick_clone, &raf_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &raf_id);

    LoopHandle {
        tick,
        raf_id,
        cancelled,
    }
}
