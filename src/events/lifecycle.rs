use crate::frame::{self, FrameContext};
use folio_core::{EffectScheduler, LikeSync, Typewriter};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything that owns timers and must stop when the page goes away.
pub struct Lifecycle {
    pub effects: EffectScheduler,
    pub likes: LikeSync,
    pub typewriter: Typewriter,
    pub frame_ctx: Rc<RefCell<FrameContext>>,
    /// Run flag of the current render loop.
    pub frame_running: RefCell<Rc<Cell<bool>>>,
    /// Cleared on teardown; gates the DOM listeners that have no core owner.
    pub page_active: Rc<Cell<bool>>,
}

impl Lifecycle {
    fn teardown(&self) {
        if !self.page_active.replace(false) {
            return;
        }
        self.frame_running.borrow().set(false);
        self.typewriter.teardown();
        self.likes.teardown();
        self.effects.teardown();
    }

    fn resume(&self) {
        if self.page_active.replace(true) {
            return;
        }
        self.effects.activate();
        self.likes.initialize();
        self.typewriter.start();
        let running = Rc::new(Cell::new(true));
        *self.frame_running.borrow_mut() = running.clone();
        frame::start_loop(self.frame_ctx.clone(), running);
    }
}

/// Tear down on `pagehide`; bring everything back when the page is restored
/// from the back-forward cache.
pub fn wire_lifecycle(window: &web::Window, lifecycle: Lifecycle) {
    let lifecycle = Rc::new(lifecycle);

    let on_hide = lifecycle.clone();
    let hide = Closure::wrap(Box::new(move |ev: web::PageTransitionEvent| {
        log::info!("[lifecycle] pagehide persisted={}; tearing down", ev.persisted());
        on_hide.teardown();
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("pagehide", hide.as_ref().unchecked_ref());
    hide.forget();

    let show = Closure::wrap(Box::new(move |ev: web::PageTransitionEvent| {
        if !ev.persisted() {
            return;
        }
        log::info!("[lifecycle] restored from back-forward cache; resuming");
        lifecycle.resume();
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("pageshow", show.as_ref().unchecked_ref());
    show.forget();
}
