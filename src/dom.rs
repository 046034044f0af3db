use crate::constants::{CONFIG_SCRIPT_ID, EFFECT_LAYER_ID};
use folio_core::FeedbackConfig;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) -> Option<web::Element> {
    let el = document.get_element_by_id(element_id)?;
    let closure =
        wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
    Some(el)
}

const LAYER_STYLE: &str =
    "position:fixed;inset:0;pointer-events:none;overflow:hidden;z-index:60";

/// The fixed full-page container effects are drawn into; created if missing.
pub fn ensure_effect_layer(document: &web::Document) -> anyhow::Result<web::Element> {
    if let Some(el) = document.get_element_by_id(EFFECT_LAYER_ID) {
        return Ok(el);
    }
    let layer = create_div(document, "fx-layer", LAYER_STYLE)?;
    layer.set_id(EFFECT_LAYER_ID);
    let body = document.body().ok_or_else(|| anyhow::anyhow!("no <body>"))?;
    body.append_child(&layer)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(layer)
}

pub fn create_div(
    document: &web::Document,
    class: &str,
    style: &str,
) -> anyhow::Result<web::Element> {
    let el = document
        .create_element("div")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    el.set_class_name(class);
    if !style.is_empty() {
        let _ = el.set_attribute("style", style);
    }
    Ok(el)
}

pub fn set_transform(el: &web::Element, css: &str) {
    if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
        let _ = html.style().set_property("transform", css);
    }
}

/// JSON overrides from `<script id="folio-config" type="application/json">`.
pub fn read_config(document: &web::Document) -> FeedbackConfig {
    let Some(json) = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|el| el.text_content())
    else {
        return FeedbackConfig::default();
    };
    match FeedbackConfig::from_json(&json) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("[config] ignoring #{}: {}", CONFIG_SCRIPT_ID, e);
            FeedbackConfig::default()
        }
    }
}
