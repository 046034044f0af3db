#![cfg(target_arch = "wasm32")]
use folio_core::{EffectScheduler, LikeSync, Scheduler, TiltGains, Typewriter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod api;
mod clock;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod reconcile;
mod storage;

use constants::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("folio-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let config = dom::read_config(&document);
    let scheduler: Rc<dyn Scheduler> = Rc::new(clock::BrowserClock::new());

    let effects = EffectScheduler::new(&config, scheduler.clone(), StdRng::from_entropy());

    let base = api::api_base(&window, &document, &config);
    log::info!("[likes] counter service at {}", base);
    let likes = LikeSync::new(
        &config,
        Rc::new(api::HttpCounter::new(base)),
        Rc::new(storage::LocalStore::open()),
        scheduler.clone(),
        effects.clone(),
    );

    let typewriter_text = document.query_selector(TYPEWRITER_SELECTOR).ok().flatten();
    let tagline = typewriter_text
        .as_ref()
        .and_then(|el| el.get_attribute(TYPEWRITER_ATTR))
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TAGLINE.to_owned());
    let typewriter = Typewriter::new(tagline, config.typewriter_timings(), scheduler.clone());

    let effect_layer = dom::ensure_effect_layer(&document)?;

    events::wire_flame_clicks(&document, effects.clone());
    events::wire_like_button(&document, likes.clone());
    let page_active = Rc::new(Cell::new(true));
    events::wire_tilt(&document, TiltGains::from(&config), &page_active);

    effects.activate();
    likes.initialize();
    typewriter.start();

    let running = Rc::new(Cell::new(true));
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        document: document.clone(),
        effects: effects.clone(),
        likes: likes.clone(),
        typewriter: typewriter.clone(),
        effect_layer,
        heart_layer: document.get_element_by_id(LIKE_HEARTS_ID),
        like_button: document.get_element_by_id(LIKE_BUTTON_ID),
        like_count: document.get_element_by_id(LIKE_COUNT_ID),
        typewriter_text,
        cursor: document.query_selector(CURSOR_SELECTOR).ok().flatten(),
        rendered: Vec::new(),
        nodes: HashMap::new(),
        last_like: None,
        last_text: String::new(),
        last_cursor: None,
    }));
    frame::start_loop(frame_ctx.clone(), running.clone());

    events::wire_lifecycle(
        &window,
        events::Lifecycle {
            effects,
            likes,
            typewriter,
            frame_ctx,
            frame_running: RefCell::new(running),
            page_active,
        },
    );
    Ok(())
}
