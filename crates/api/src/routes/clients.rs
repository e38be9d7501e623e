//! Route definitions for the `/clients` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/clients`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> register
/// GET    /{id}             -> get_by_id
/// PUT    /{id}/interest    -> update_interest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::list).post(clients::register))
        .route("/{id}", get(clients::get_by_id))
        .route("/{id}/interest", put(clients::update_interest))
}
