//! Handler for client polls.

use axum::extract::{Path, State};
use axum::Json;
use hookhub_core::types::{DbId, Timestamp};
use hookhub_db::models::event::StoredEvent;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// One delivered event as seen by a client.
#[derive(Debug, Serialize)]
pub struct PolledMessage {
    pub identifier: String,
    pub timestamp: Timestamp,
    pub event_type: String,
    pub org_name: Option<String>,
    pub repo_name: Option<String>,
    pub payload: serde_json::Value,
}

impl From<StoredEvent> for PolledMessage {
    fn from(event: StoredEvent) -> Self {
        Self {
            identifier: event.identifier,
            timestamp: event.received_at,
            event_type: event.event_type,
            org_name: event.org_name,
            repo_name: event.repo_name,
            payload: event.payload,
        }
    }
}

/// Poll response payload.
#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub client_id: DbId,
    pub messages: Vec<PolledMessage>,
    pub total_new_messages: usize,
    pub poll_timestamp: Timestamp,
}

/// GET /poll/{client_id}
///
/// Returns every stored event the client is interested in and has not
/// received before, oldest first. Each event is returned at most once per
/// client.
pub async fn poll(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<PollResponse>> {
    let outcome = state.delivery.poll(client_id).await?;

    Ok(Json(PollResponse {
        client_id: outcome.client_id,
        total_new_messages: outcome.count(),
        messages: outcome.events.into_iter().map(PolledMessage::from).collect(),
        poll_timestamp: outcome.poll_timestamp,
    }))
}
