//! `fetch`-backed client for the shared like counter.

use crate::constants::API_BASE_META_SELECTOR;
use folio_core::{
    endpoint_url, parse_count, resolve_api_base, CountCallback, CountResult, CounterError,
    CounterService, FeedbackConfig, LIKES_INCREMENT_PATH, LIKES_PATH,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

pub struct HttpCounter {
    base: String,
}

impl HttpCounter {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn request(&self, path: &str, method: &'static str, done: CountCallback) {
        let url = endpoint_url(&self.base, path);
        spawn_local(async move {
            let result = request_count(&url, method).await;
            if let Err(e) = &result {
                log::debug!("[api] {} {} failed: {}", method, url, e);
            }
            done(result);
        });
    }
}

impl CounterService for HttpCounter {
    fn fetch_count(&self, done: CountCallback) {
        self.request(LIKES_PATH, "GET", done);
    }

    fn increment(&self, done: CountCallback) {
        self.request(LIKES_INCREMENT_PATH, "POST", done);
    }
}

fn network(e: JsValue) -> CounterError {
    CounterError::Network(format!("{:?}", e))
}

async fn request_count(url: &str, method: &str) -> CountResult {
    let window = web::window().ok_or_else(|| CounterError::Network("no window".into()))?;
    let init = web::RequestInit::new();
    init.set_method(method);
    let request = web::Request::new_with_str_and_init(url, &init).map_err(network)?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(network)?;

    let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    if !response.ok() {
        return Err(CounterError::Status(response.status()));
    }
    let body = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?
        .as_string()
        .ok_or_else(|| CounterError::Malformed("body is not text".into()))?;
    parse_count(&body)
}

/// Endpoint root: config, then `<meta name="folio-api-base">`, then the
/// build-time `FOLIO_API_BASE`, else derived from the page origin.
pub fn api_base(
    window: &web::Window,
    document: &web::Document,
    config: &FeedbackConfig,
) -> String {
    let meta = document
        .query_selector(API_BASE_META_SELECTOR)
        .ok()
        .flatten()
        .and_then(|el| el.get_attribute("content"));
    let override_base = config
        .api_base
        .clone()
        .or(meta)
        .or_else(|| option_env!("FOLIO_API_BASE").map(str::to_owned));
    let origin = window.location().origin().unwrap_or_default();
    resolve_api_base(override_base.as_deref(), &origin)
}
