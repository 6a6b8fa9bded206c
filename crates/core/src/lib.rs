//! Domain core for the watches inventory service.
//!
//! Pure logic only: text canonicalization, field validation, pagination
//! arithmetic and the [`watch::WatchService`] that sits between the HTTP
//! boundary and whatever implements [`watch::WatchStore`]. Nothing in here
//! knows about HTTP or SQL.

pub mod currency;
pub mod error;
pub mod pagination;
pub mod text;
pub mod types;
pub mod validation;
pub mod watch;
