use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct LoopInner {
    pending: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl LoopInner {
    fn request(&self) {
        if self.pending.get().is_some() {
            return;
        }
        let Some(w) = web::window() else {
            return;
        };
        let tick = self.tick.borrow();
        if let Some(cb) = tick.as_ref() {
            match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => self.pending.set(Some(id)),
                Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
            }
        }
    }

    fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(w) = web::window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
    }
}

/// A requestAnimationFrame loop. The frame callback returns whether another
/// frame should be requested; frames never overlap since the next request is
/// only made after the current callback returns.
///
/// Dropping the loop cancels any pending frame and frees the callback.
pub struct AnimationLoop {
    inner: Rc<LoopInner>,
}

/// Non-owning handle used by event callbacks to pause/resume the loop.
#[derive(Clone)]
pub struct LoopControl {
    inner: Weak<LoopInner>,
}

impl AnimationLoop {
    pub fn new(mut on_frame: impl FnMut(f64) -> bool + 'static) -> Self {
        let inner = Rc::new(LoopInner {
            pending: Cell::new(None),
            tick: RefCell::new(None),
        });
        let weak = Rc::downgrade(&inner);
        *inner.tick.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.pending.set(None);
            if on_frame(timestamp) {
                inner.request();
            }
        }) as Box<dyn FnMut(f64)>));
        Self { inner }
    }

    pub fn control(&self) -> LoopControl {
        LoopControl {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn resume(&self) {
        self.inner.request();
    }

    pub fn pause(&self) {
        self.inner.cancel();
    }
}

impl LoopControl {
    pub fn resume(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.request();
        }
    }

    pub fn pause(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel();
        }
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.inner.cancel();
        self.inner.tick.borrow_mut().take();
    }
}
