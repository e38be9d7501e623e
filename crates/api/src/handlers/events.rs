//! Handler for the operational event listing.

use axum::extract::{Query, State};
use axum::Json;
use hookhub_db::models::event::EventSummary;
use hookhub_db::repositories::EventRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::query::PaginationParams;
use crate::state::AppState;

/// Page of recent events.
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    /// Total number of stored events.
    pub total: i64,
    /// Newest first, without payloads.
    pub events: Vec<EventSummary>,
}

/// GET /events
pub async fn list_recent(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<EventListResponse>> {
    let total = EventRepo::count(&state.pool).await?;
    let events = EventRepo::list_recent(&state.pool, params.limit(), params.offset()).await?;
    Ok(Json(EventListResponse { total, events }))
}
