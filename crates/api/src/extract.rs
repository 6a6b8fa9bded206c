//! Custom request extractors.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use watches_core::types::DbId;

use crate::error::AppError;

/// Integer `{id}` path segment.
///
/// Anything that does not parse as an integer is rejected with
/// [`AppError::MalformedId`] (406) instead of axum's default 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParam(pub DbId);

impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::MalformedId)?;
        raw.parse::<DbId>()
            .map(IdParam)
            .map_err(|_| AppError::MalformedId)
    }
}
