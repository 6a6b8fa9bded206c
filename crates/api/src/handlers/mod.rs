//! HTTP handlers, grouped by resource.

pub mod watch;
