use crate::constants::{LIKE_BUTTON_ID, NO_FLAME_ATTR, TILT_SELECTOR};
use crate::dom;
use crate::input;
use folio_core::{EffectScheduler, LikeSync, TiltGains, TiltTracker};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Primary-button clicks anywhere on the page spawn a flame at the pointer.
pub fn wire_flame_clicks(document: &web::Document, effects: EffectScheduler) {
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        if ev.button() != 0 || input::suppresses_flame(ev.target()) {
            return;
        }
        let p = input::client_point(&ev);
        effects.spawn_flame(p.x, p.y);
    }) as Box<dyn FnMut(_)>);
    _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn wire_like_button(document: &web::Document, likes: LikeSync) {
    let button = dom::add_click_listener(document, LIKE_BUTTON_ID, move || {
        let outcome = likes.like();
        log::info!("[click] like -> {:?}", outcome);
    });
    match button {
        // the like control never doubles as a flame trigger
        Some(el) => {
            let _ = el.set_attribute(NO_FLAME_ATTR, "");
        }
        None => log::warn!("[dom] missing #{}; likes disabled", LIKE_BUTTON_ID),
    }
}

/// Attach a tilt tracker to every `[data-tilt]` element.
///
/// Listeners stay attached for the page's life but do nothing while
/// `page_active` is cleared.
pub fn wire_tilt(document: &web::Document, gains: TiltGains, page_active: &Rc<Cell<bool>>) {
    let Ok(nodes) = document.query_selector_all(TILT_SELECTOR) else {
        return;
    };
    for i in 0..nodes.length() {
        let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let tracker = Rc::new(RefCell::new(TiltTracker::new(gains)));
        wire_tilt_move(&el, tracker.clone(), page_active.clone());
        wire_tilt_touch(&el, tracker.clone(), page_active.clone());
        wire_tilt_reset(&el, tracker, page_active.clone(), "pointerleave");
    }
}

fn wire_tilt_move(el: &web::Element, tracker: Rc<RefCell<TiltTracker>>, active: Rc<Cell<bool>>) {
    let target = el.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if !active.get() {
            return;
        }
        let rect = input::element_rect(&target);
        let tilt = tracker
            .borrow_mut()
            .on_pointer_move(input::client_point(&ev), &rect);
        dom::set_transform(&target, &tilt.to_css());
    }) as Box<dyn FnMut(_)>);
    _ = el.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_tilt_touch(el: &web::Element, tracker: Rc<RefCell<TiltTracker>>, active: Rc<Cell<bool>>) {
    let target = el.clone();
    let gate = active.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        if !gate.get() {
            return;
        }
        let Some(point) = input::first_touch_point(&ev) else {
            return;
        };
        let rect = input::element_rect(&target);
        let tilt = tracker.borrow_mut().on_pointer_move(point, &rect);
        dom::set_transform(&target, &tilt.to_css());
    }) as Box<dyn FnMut(_)>);
    _ = el.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
    closure.forget();
    wire_tilt_reset(el, tracker, active, "touchend");
}

fn wire_tilt_reset(
    el: &web::Element,
    tracker: Rc<RefCell<TiltTracker>>,
    active: Rc<Cell<bool>>,
    event: &str,
) {
    let target = el.clone();
    let closure = Closure::wrap(Box::new(move || {
        if !active.get() {
            return;
        }
        let tilt = tracker.borrow_mut().on_leave();
        dom::set_transform(&target, &tilt.to_css());
    }) as Box<dyn FnMut()>);
    _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}
