use std::sync::Arc;

use watches_core::watch::{WatchService, WatchStore};

use crate::config::ServerConfig;
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub watches: WatchService,
    pub config: Arc<ServerConfig>,
    /// Per-client request budget shared by every route.
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(store: Arc<dyn WatchStore>, config: ServerConfig) -> Self {
        let limiter = RateLimiter::new(config.throttle_window(), config.throttle_limit);
        Self {
            watches: WatchService::new(store),
            config: Arc::new(config),
            limiter,
        }
    }
}
