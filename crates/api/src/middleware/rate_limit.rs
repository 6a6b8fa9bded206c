use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

/// Upper bound on tracked clients before the oldest entries are dropped.
const DEFAULT_MAX_KEYS: usize = 10_000;

/// Sliding-window request counter keyed by client.
///
/// A `limit` of `0` disables limiting.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    window: Duration,
    limit: u32,
    max_keys: usize,
}

impl RateLimiter {
    pub fn new(window: Duration, limit: u32) -> Self {
        Self::with_max_keys(window, limit, DEFAULT_MAX_KEYS)
    }

    pub fn with_max_keys(window: Duration, limit: u32, max_keys: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            window,
            limit,
            max_keys,
        }
    }

    /// Record a request from `key`. Returns `false` once the window is full.
    pub fn allow(&self, key: &str) -> bool {
        if self.limit == 0 {
            return true;
        }

        let now = Instant::now();
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let queue = inner.entry(key.to_string()).or_default();
        prune_queue(queue, now, self.window);
        if queue.len() >= self.limit as usize {
            return false;
        }
        queue.push_back(now);

        inner.retain(|_, events| {
            prune_queue(events, now, self.window);
            !events.is_empty()
        });

        if inner.len() > self.max_keys {
            let overflow = inner.len() - self.max_keys;
            let evicted: Vec<String> = inner
                .keys()
                .filter(|k| k.as_str() != key)
                .take(overflow)
                .cloned()
                .collect();
            for k in evicted {
                inner.remove(&k);
            }
        }

        true
    }
}

fn prune_queue(queue: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(front) = queue.front() {
        if now.duration_since(*front) >= window {
            queue.pop_front();
        } else {
            break;
        }
    }
}

/// Client key for a request: the peer IP when the server was started with
/// connect info, `"unknown"` otherwise.
fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Reject requests over the per-client budget with 429.
pub async fn throttle(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = client_key(&request);
    if state.limiter.allow(&key) {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
        AppError::TooManyRequests.into_response()
    }
}
