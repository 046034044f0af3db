//! `setTimeout` / `setInterval` backed [`Scheduler`].

use folio_core::{Scheduler, TimerHandle};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

enum Registered {
    Timeout { js_id: i32, closure: Closure<dyn FnMut()> },
    Interval { js_id: i32, closure: Closure<dyn FnMut()> },
}

type Registry = Rc<RefCell<HashMap<TimerHandle, Registered>>>;

pub struct BrowserClock {
    origin: Instant,
    next: Cell<u64>,
    timers: Registry,
}

impl BrowserClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            next: Cell::new(0),
            timers: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    fn fresh_handle(&self) -> TimerHandle {
        let id = self.next.get() + 1;
        self.next.set(id);
        TimerHandle(id)
    }
}

#[inline]
fn to_js_ms(d: Duration) -> i32 {
    d.as_millis().min(i32::MAX as u128) as i32
}

impl Scheduler for BrowserClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let handle = self.fresh_handle();
        let registry: Weak<RefCell<HashMap<TimerHandle, Registered>>> = Rc::downgrade(&self.timers);
        let closure = Closure::once(move || {
            let fired = registry
                .upgrade()
                .and_then(|registry| registry.borrow_mut().remove(&handle));
            // Still executing; free the JS function once this task returns.
            spawn_local(async move { drop(fired) });
            callback();
        });
        let Some(window) = web::window() else {
            log::error!("[clock] no window; timeout {:?} will never fire", handle);
            return handle;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            to_js_ms(delay),
        ) {
            Ok(js_id) => {
                self.timers
                    .borrow_mut()
                    .insert(handle, Registered::Timeout { js_id, closure });
            }
            Err(e) => log::error!("[clock] setTimeout failed: {:?}", e),
        }
        handle
    }

    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) -> TimerHandle {
        let handle = self.fresh_handle();
        let closure = Closure::wrap(callback);
        let Some(window) = web::window() else {
            log::error!("[clock] no window; interval {:?} will never fire", handle);
            return handle;
        };
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            to_js_ms(period),
        ) {
            Ok(js_id) => {
                self.timers
                    .borrow_mut()
                    .insert(handle, Registered::Interval { js_id, closure });
            }
            Err(e) => log::error!("[clock] setInterval failed: {:?}", e),
        }
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        let Some(registered) = self.timers.borrow_mut().remove(&handle) else {
            return;
        };
        let window = web::window();
        match registered {
            Registered::Timeout { js_id, closure } => {
                if let Some(w) = window {
                    w.clear_timeout_with_handle(js_id);
                }
                // A fired timeout is already out of the registry, so this one never ran.
                drop(closure);
            }
            Registered::Interval { js_id, closure } => {
                if let Some(w) = window {
                    w.clear_interval_with_handle(js_id);
                }
                // May be cancelled from inside its own callback; free it after this task.
                spawn_local(async move { drop(closure) });
            }
        }
    }
}
