use crate::constants::NO_FLAME_SELECTOR;
use folio_core::ElementRect;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn client_point(ev: &web::MouseEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

#[inline]
pub fn first_touch_point(ev: &web::TouchEvent) -> Option<Vec2> {
    let touch = ev.touches().get(0)?;
    Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32))
}

#[inline]
pub fn element_rect(el: &web::Element) -> ElementRect {
    let rect = el.get_bounding_client_rect();
    ElementRect {
        left: rect.left() as f32,
        top: rect.top() as f32,
        width: rect.width() as f32,
        height: rect.height() as f32,
    }
}

/// Clicks inside navigation or the like control do not spawn flames.
pub fn suppresses_flame(target: Option<web::EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .and_then(|el| el.closest(NO_FLAME_SELECTOR).ok().flatten())
        .is_some()
}
