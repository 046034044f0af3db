use crate::constants::{FLAME_CLASS, HEART_CLASS, LIKED_ATTR, PEEK_CLASS};
use crate::dom;
use crate::reconcile::reconcile_ids;
use folio_core::{EffectId, EffectScheduler, EphemeralEffect, LikeState, LikeSync, Typewriter};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Per-frame view of the core state onto the DOM.
pub struct FrameContext {
    pub document: web::Document,
    pub effects: EffectScheduler,
    pub likes: LikeSync,
    pub typewriter: Typewriter,

    pub effect_layer: web::Element,
    pub heart_layer: Option<web::Element>,
    pub like_button: Option<web::Element>,
    pub like_count: Option<web::Element>,
    pub typewriter_text: Option<web::Element>,
    pub cursor: Option<web::Element>,

    pub rendered: Vec<EffectId>,
    pub nodes: HashMap<EffectId, web::Element>,
    pub last_like: Option<LikeState>,
    pub last_text: String,
    pub last_cursor: Option<bool>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        self.render_typewriter();
        self.render_likes();
        self.render_effects();
    }

    fn render_typewriter(&mut self) {
        let state = self.typewriter.state();
        if let Some(el) = &self.typewriter_text {
            if state.revealed != self.last_text {
                el.set_text_content(Some(&state.revealed));
                self.last_text = state.revealed;
            }
        }
        if let Some(cursor) = &self.cursor {
            if self.last_cursor != Some(state.cursor_visible) {
                let style = if state.cursor_visible { "" } else { "visibility:hidden" };
                let _ = cursor.set_attribute("style", style);
                self.last_cursor = Some(state.cursor_visible);
            }
        }
    }

    fn render_likes(&mut self) {
        let state = self.likes.state();
        if self.last_like == Some(state) {
            return;
        }
        if let Some(el) = &self.like_count {
            el.set_text_content(Some(&state.count.to_string()));
        }
        if let Some(el) = &self.like_button {
            let _ = el.set_attribute(LIKED_ATTR, if state.liked_locally { "1" } else { "0" });
        }
        self.last_like = Some(state);
    }

    fn render_effects(&mut self) {
        let live = self.effects.effects();
        let live_ids: Vec<EffectId> = live.iter().map(EphemeralEffect::id).collect();
        let diff = reconcile_ids(&self.rendered, &live_ids);

        for id in &diff.removed {
            if let Some(node) = self.nodes.remove(id) {
                node.remove();
            }
        }
        for effect in live.iter().filter(|e| diff.added.contains(&e.id())) {
            match self.build_node(effect) {
                Ok(node) => {
                    self.nodes.insert(effect.id(), node);
                }
                Err(e) => log::warn!("[frame] effect {} not drawn: {:?}", effect.id(), e),
            }
        }
        self.rendered = live_ids;
    }

    fn build_node(&self, effect: &EphemeralEffect) -> anyhow::Result<web::Element> {
        let (node, parent) = match effect {
            EphemeralEffect::FlameBurst(f) => (
                dom::create_div(
                    &self.document,
                    FLAME_CLASS,
                    &format!("position:absolute;left:{:.0}px;top:{:.0}px", f.x, f.y),
                )?,
                &self.effect_layer,
            ),
            EphemeralEffect::HeartBurst(_) => (
                dom::create_div(&self.document, HEART_CLASS, "")?,
                self.heart_layer.as_ref().unwrap_or(&self.effect_layer),
            ),
            EphemeralEffect::PeekMascot(p) => (
                dom::create_div(
                    &self.document,
                    &format!("{PEEK_CLASS} {PEEK_CLASS}-{}", p.side.as_str()),
                    &format!("position:absolute;{}:0;top:{:.1}%", p.side.as_str(), p.top_percent),
                )?,
                &self.effect_layer,
            ),
        };
        parent
            .append_child(&node)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(node)
    }
}

/// Drive `FrameContext::frame` from `requestAnimationFrame` until `running` clears.
///
/// Each loop owns its own flag; a restarted loop gets a fresh one.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>, running: Rc<Cell<bool>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !running.get() {
            // break the self-reference; free the closure once this call returns
            let stale = tick_clone.borrow_mut().take();
            spawn_local(async move { drop(stale) });
            return;
        }
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
