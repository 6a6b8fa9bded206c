//! Input validation and canonicalization for watch payloads.

pub mod predicates;
pub mod rules;
pub mod watch;

pub use rules::{FieldPipeline, FieldViolation, Step, Violations};
pub use watch::{validate_create, validate_update, CreateWatchInput, UpdateWatchInput};
