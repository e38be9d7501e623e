//! Event entity models.

use chrono::Utc;
use hookhub_core::types::{EventSeq, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A raw row from the `events` table.
///
/// `payload` and `received_at` are kept as text and decoded by
/// [`EventRow::decode`], so one unreadable row surfaces as a per-row error
/// instead of aborting the query that fetched it.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub seq: EventSeq,
    pub identifier: String,
    pub event_type: String,
    pub delivery_id: Option<String>,
    pub org_name: Option<String>,
    pub repo_name: Option<String>,
    pub payload: String,
    pub received_at: String,
}

/// Why a stored row could not be turned into a [`StoredEvent`].
#[derive(Debug, thiserror::Error)]
pub enum RowDecodeError {
    #[error("payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("received_at is not an RFC 3339 timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

impl EventRow {
    pub fn decode(self) -> Result<StoredEvent, RowDecodeError> {
        let payload = serde_json::from_str(&self.payload)?;
        let received_at = chrono::DateTime::parse_from_rfc3339(&self.received_at)?.with_timezone(&Utc);
        Ok(StoredEvent {
            seq: self.seq,
            identifier: self.identifier,
            event_type: self.event_type,
            delivery_id: self.delivery_id,
            org_name: self.org_name,
            repo_name: self.repo_name,
            payload,
            received_at,
        })
    }
}

/// A persisted, immutable event with its decoded payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEvent {
    pub seq: EventSeq,
    pub identifier: String,
    pub event_type: String,
    pub delivery_id: Option<String>,
    pub org_name: Option<String>,
    pub repo_name: Option<String>,
    pub payload: serde_json::Value,
    pub received_at: Timestamp,
}

/// Insert DTO for the `events` table.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub identifier: String,
    pub event_type: String,
    pub delivery_id: Option<String>,
    pub org_name: Option<String>,
    pub repo_name: Option<String>,
    pub payload: serde_json::Value,
    pub received_at: Timestamp,
}

impl NewEvent {
    /// The stored form of this event once the store has assigned `seq`.
    pub fn into_stored(self, seq: EventSeq) -> StoredEvent {
        StoredEvent {
            seq,
            identifier: self.identifier,
            event_type: self.event_type,
            delivery_id: self.delivery_id,
            org_name: self.org_name,
            repo_name: self.repo_name,
            payload: self.payload,
            received_at: self.received_at,
        }
    }
}

/// Payload-free listing entry for operational inspection.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventSummary {
    pub seq: EventSeq,
    pub identifier: String,
    pub event_type: String,
    pub delivery_id: Option<String>,
    pub org_name: Option<String>,
    pub repo_name: Option<String>,
    pub received_at: String,
}
