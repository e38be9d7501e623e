//! Handler for inbound webhooks.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use hookhub_core::types::Timestamp;
use hookhub_events::IngestRequest;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Event type header set by the sender.
pub const EVENT_HEADER: &str = "x-github-event";
/// HMAC-SHA256 signature header (`sha256=<hex>`).
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
/// Sender-assigned delivery id header.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// Acknowledgement returned for a stored webhook.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub event_type: String,
    pub delivery_id: Option<String>,
    pub saved_identifier: String,
    pub timestamp: Timestamp,
}

/// POST /webhook
///
/// The body is taken as raw bytes: the signature covers the exact bytes
/// sent, so it must be checked before any JSON parsing.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookResponse>> {
    let event = state
        .ingest
        .ingest(IngestRequest {
            body: &body,
            event_type: header_str(&headers, EVENT_HEADER),
            signature: header_str(&headers, SIGNATURE_HEADER),
            delivery_id: header_str(&headers, DELIVERY_HEADER),
        })
        .await?;

    Ok(Json(WebhookResponse {
        status: "success",
        message: "Webhook received",
        event_type: event.event_type,
        delivery_id: event.delivery_id,
        saved_identifier: event.identifier,
        timestamp: event.received_at,
    }))
}

/// A header value as text; absent or non-ASCII values count as missing.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
