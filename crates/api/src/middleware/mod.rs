//! Request middleware.
//!
//! - [`rate_limit::throttle`] -- Per-client sliding-window rate limiting.

pub mod rate_limit;
