//! Task scheduling on the browser event loop.

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use selvage_core::schedule::Task;
use selvage_core::{Scheduler, TaskHandle};

/// Schedules on `setTimeout(0)` and `requestAnimationFrame`.
#[derive(Clone, Debug)]
pub struct BrowserScheduler {
    window: Option<web_sys::Window>,
}

impl Default for BrowserScheduler {
    fn default() -> Self {
        Self {
            window: web_sys::window(),
        }
    }
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A pending timeout or animation frame.
pub enum BrowserTask {
    Timeout(Timeout),
    Frame {
        window: web_sys::Window,
        id: i32,
        closure: Closure<dyn FnMut()>,
    },
}

impl TaskHandle for BrowserTask {
    fn cancel(self) {
        match self {
            BrowserTask::Timeout(timeout) => {
                let _ = timeout.cancel();
            }
            BrowserTask::Frame { window, id, closure } => {
                if let Err(err) = window.cancel_animation_frame(id) {
                    tracing::debug!(?err, "cancelAnimationFrame failed");
                }
                drop(closure);
            }
        }
    }

    fn detach(self) {
        match self {
            BrowserTask::Timeout(timeout) => {
                let _ = timeout.forget();
            }
            BrowserTask::Frame { closure, .. } => closure.forget(),
        }
    }
}

impl Scheduler for BrowserScheduler {
    type Handle = BrowserTask;

    fn defer(&self, task: Task) -> BrowserTask {
        BrowserTask::Timeout(Timeout::new(0, task))
    }

    fn next_frame(&self, task: Task) -> BrowserTask {
        let Some(window) = self.window.clone() else {
            return self.defer(task);
        };
        let slot = Rc::new(Cell::new(Some(task)));
        let frame_slot = slot.clone();
        let closure = Closure::once(move || {
            if let Some(task) = frame_slot.take() {
                task();
            }
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => BrowserTask::Frame {
                window,
                id,
                closure,
            },
            Err(err) => {
                tracing::debug!(?err, "requestAnimationFrame failed, using a timeout");
                self.defer(slot.take().unwrap_or_else(|| Box::new(|| {})))
            }
        }
    }
}
