//! Hand-off point between asynchronous loaders and the frame loop.
//!
//! Loaders push whole results; the scene drains them at the start of a frame,
//! so a shape is either absent or complete from the update loop's view.

use crate::error::ShapeError;
use crate::shape::ShapeId;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type LoadResult = Result<Vec<f32>, ShapeError>;

#[derive(Clone, Default)]
pub struct LoadQueue {
    inbox: Rc<RefCell<Vec<(ShapeId, LoadResult)>>>,
    closed: Rc<Cell<bool>>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a finished load. Ignored once the queue is closed.
    pub fn complete(&self, id: ShapeId, result: LoadResult) {
        if self.closed.get() {
            log::debug!("dropping load result for shape {id}: scene is gone");
            return;
        }
        self.inbox.borrow_mut().push((id, result));
    }

    pub fn drain(&self) -> Vec<(ShapeId, LoadResult)> {
        std::mem::take(&mut *self.inbox.borrow_mut())
    }

    pub fn pending(&self) -> usize {
        self.inbox.borrow().len()
    }

    pub fn close(&self) {
        self.closed.set(true);
        self.inbox.borrow_mut().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}
