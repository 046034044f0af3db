//! Tunable timings and endpoint resolution.
//!
//! Every field defaults to the value in `constants.rs`, so a partial JSON
//! object (or none at all) yields a working configuration.

use crate::constants::*;
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedbackConfig {
    pub flame_ttl_ms: u64,
    pub heart_ttl_ms: u64,
    pub heart_cooldown_ms: u64,
    pub heart_limit: usize,
    pub peek_ttl_ms: u64,
    pub peek_interval_ms: u64,
    pub peek_top_min: f32,
    pub peek_top_max: f32,
    pub type_step_ms: u64,
    pub type_pause_ms: u64,
    pub delete_step_ms: u64,
    pub cursor_blink_ms: u64,
    pub tilt_x_gain: f32,
    pub tilt_y_gain: f32,
    pub tilt_scale: f32,
    pub poll_interval_ms: u64,
    pub storage_key: String,
    pub api_base: Option<String>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            flame_ttl_ms: FLAME_TTL_MS,
            heart_ttl_ms: HEART_TTL_MS,
            heart_cooldown_ms: HEART_COOLDOWN_MS,
            heart_limit: HEART_BURST_LIMIT,
            peek_ttl_ms: PEEK_TTL_MS,
            peek_interval_ms: PEEK_INTERVAL_MS,
            peek_top_min: PEEK_TOP_MIN_PERCENT,
            peek_top_max: PEEK_TOP_MAX_PERCENT,
            type_step_ms: TYPE_STEP_MS,
            type_pause_ms: TYPE_PAUSE_MS,
            delete_step_ms: DELETE_STEP_MS,
            cursor_blink_ms: CURSOR_BLINK_MS,
            tilt_x_gain: TILT_X_GAIN_DEG,
            tilt_y_gain: TILT_Y_GAIN_DEG,
            tilt_scale: TILT_HOVER_SCALE,
            poll_interval_ms: LIKE_POLL_INTERVAL_MS,
            storage_key: LIKED_STORAGE_KEY.to_owned(),
            api_base: None,
        }
    }
}

impl FeedbackConfig {
    /// Parse a (possibly partial) JSON override.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Typewriter step, pause and blink periods as durations, each at least 1 ms.
    pub fn typewriter_timings(&self) -> TypewriterTimings {
        let at_least_1ms = |millis: u64| Duration::from_millis(millis.max(1));
        TypewriterTimings {
            type_step: at_least_1ms(self.type_step_ms),
            pause: at_least_1ms(self.type_pause_ms),
            delete_step: at_least_1ms(self.delete_step_ms),
            cursor_blink: at_least_1ms(self.cursor_blink_ms),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypewriterTimings {
    pub type_step: Duration,
    pub pause: Duration,
    pub delete_step: Duration,
    pub cursor_blink: Duration,
}

impl Default for TypewriterTimings {
    fn default() -> Self {
        FeedbackConfig::default().typewriter_timings()
    }
}

// Dev-server ports that are swapped for the API port when no override is given.
const FRONTEND_PORTS: [&str; 2] = ["5173", "3000"];
const API_PORT: &str = "8000";

/// Work out the counter service root for a page served from `origin`.
///
/// An explicit override always wins. Otherwise a known dev-server port is
/// replaced by the API port, either as `host:5173` or as the `-5173.`
/// subdomain form used by preview hosts. Anything else is used unchanged.
pub fn resolve_api_base(override_base: Option<&str>, origin: &str) -> String {
    if let Some(base) = override_base.map(str::trim).filter(|b| !b.is_empty()) {
        return base.trim_end_matches('/').to_owned();
    }
    let origin = origin.trim_end_matches('/');
    for port in FRONTEND_PORTS {
        let colon = format!(":{port}");
        if let Some(stripped) = origin.strip_suffix(&colon) {
            return format!("{stripped}:{API_PORT}");
        }
        let sub = format!("-{port}.");
        if origin.contains(&sub) {
            return origin.replacen(&sub, &format!("-{API_PORT}."), 1);
        }
    }
    origin.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = FeedbackConfig::from_json(r#"{"flame_ttl_ms": 500, "api_base": "https://x"}"#)
            .expect("valid config");
        assert_eq!(cfg.flame_ttl_ms, 500);
        assert_eq!(cfg.api_base.as_deref(), Some("https://x"));
        assert_eq!(cfg.heart_ttl_ms, HEART_TTL_MS);
        assert_eq!(cfg.storage_key, LIKED_STORAGE_KEY);
    }

    #[test]
    fn override_wins_and_is_trimmed() {
        assert_eq!(
            resolve_api_base(Some("https://api.site.dev/"), "http://localhost:5173"),
            "https://api.site.dev"
        );
        // blank override falls through to the heuristic
        assert_eq!(
            resolve_api_base(Some("  "), "http://localhost:3000"),
            "http://localhost:8000"
        );
    }

    #[test]
    fn swaps_dev_port_and_subdomain() {
        assert_eq!(
            resolve_api_base(None, "http://localhost:5173"),
            "http://localhost:8000"
        );
        assert_eq!(
            resolve_api_base(None, "https://ab12-3000.preview.host"),
            "https://ab12-8000.preview.host"
        );
        assert_eq!(
            resolve_api_base(None, "https://folio.example.com/"),
            "https://folio.example.com"
        );
    }
}
