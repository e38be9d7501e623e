//! Route definitions for the `/webhook` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// Routes mounted at `/webhook`.
///
/// ```text
/// POST   /                 -> receive
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(webhook::receive))
}
