//! Remote like-counter contract.
//!
//! The service speaks two endpoints, both answering `{ "count": <integer> }`:
//! `GET /likes` and `POST /likes/increment`. Implementations report results
//! through a completion callback so callers never block on the network.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CounterError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

pub type CountResult = Result<u64, CounterError>;
pub type CountCallback = Box<dyn FnOnce(CountResult)>;

pub trait CounterService {
    /// Read the current shared count.
    fn fetch_count(&self, done: CountCallback);

    /// Increment the shared count once, reporting the new value.
    fn increment(&self, done: CountCallback);
}

#[derive(Deserialize)]
struct CountPayload {
    count: u64,
}

/// Decode a `{ "count": n }` body. Negative, fractional or missing counts are malformed.
pub fn parse_count(body: &str) -> CountResult {
    serde_json::from_str::<CountPayload>(body)
        .map(|p| p.count)
        .map_err(|e| CounterError::Malformed(e.to_string()))
}

/// Join an endpoint root and a path without doubling or dropping the slash.
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
