//! Route definitions for the `/poll` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::poll;
use crate::state::AppState;

/// Routes mounted at `/poll`.
///
/// ```text
/// GET    /{client_id}      -> poll
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{client_id}", get(poll::poll))
}
