//! Scroll progress: measurement and a single-writer broadcast channel.

use std::cell::RefCell;
use std::rc::Rc;

/// Raw page measurements, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// 0 at the top of the page, 1 at the bottom.
    pub fn progress(&self) -> f32 {
        let range = self.scroll_height - self.viewport_height;
        if range <= 0.0 || !range.is_finite() {
            return 0.0;
        }
        (self.scroll_y / range).clamp(0.0, 1.0) as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Anything the scene can read progress from and detach from on teardown.
pub trait ScrollSource {
    fn progress(&self) -> f32;
    /// Returns `false` if `id` was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

type Listener = Box<dyn FnMut(f32)>;

#[derive(Default)]
struct ChannelState {
    progress: f32,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    notifying: bool,
    removed_while_notifying: Vec<SubscriptionId>,
}

/// Cloneable handle; every clone sees the same progress and listeners.
#[derive(Clone, Default)]
pub struct ScrollChannel {
    state: Rc<RefCell<ChannelState>>,
}

impl ScrollChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> f32 {
        self.state.borrow().progress
    }

    /// Clamp, store and broadcast a new progress value. Listeners may
    /// subscribe or unsubscribe from inside the callback.
    pub fn set(&self, progress: f32) {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let mut listeners = {
            let mut state = self.state.borrow_mut();
            state.progress = progress;
            if state.notifying {
                return;
            }
            state.notifying = true;
            std::mem::take(&mut state.listeners)
        };
        for (_, listener) in listeners.iter_mut() {
            listener(progress);
        }
        let mut state = self.state.borrow_mut();
        let removed = std::mem::take(&mut state.removed_while_notifying);
        listeners.retain(|(id, _)| !removed.contains(id));
        listeners.append(&mut state.listeners);
        state.listeners = listeners;
        state.notifying = false;
    }

    pub fn subscribe(&self, listener: impl FnMut(f32) + 'static) -> SubscriptionId {
        let mut state = self.state.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(l, _)| *l != id);
        if state.listeners.len() != before {
            return true;
        }
        if state.notifying && id.0 < state.next_id {
            state.removed_while_notifying.push(id);
            return true;
        }
        false
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

impl ScrollSource for ScrollChannel {
    fn progress(&self) -> f32 {
        ScrollChannel::progress(self)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        ScrollChannel::unsubscribe(self, id)
    }
}
