//! Route definitions for watches.

use axum::routing::get;
use axum::Router;

use crate::handlers::watch;
use crate::state::AppState;

/// Routes mounted at `/watches`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PATCH  /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(watch::list).post(watch::create))
        .route(
            "/{id}",
            get(watch::get_by_id)
                .patch(watch::update)
                .delete(watch::delete),
        )
}
