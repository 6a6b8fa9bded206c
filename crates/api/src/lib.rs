//! HTTP boundary for the watches inventory service.
//!
//! Exposes the router builder, configuration, handlers and middleware so the
//! binary and the integration tests share one stack.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
