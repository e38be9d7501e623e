pub mod clients;
pub mod events;
pub mod health;
pub mod poll;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree, mounted at the root.
///
/// Route hierarchy:
///
/// ```text
/// /health                         service and database health (GET)
///
/// /webhook                        receive a signed webhook (POST)
///
/// /clients                        list, register (GET, POST)
/// /clients/{id}                   get (GET)
/// /clients/{id}/interest          replace interest lists (PUT)
///
/// /poll/{client_id}               deliver new matching events (GET)
///
/// /events                         recent event summaries (GET, ?limit, offset)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/webhook", webhook::router())
        .nest("/clients", clients::router())
        .nest("/poll", poll::router())
        .nest("/events", events::router())
}
