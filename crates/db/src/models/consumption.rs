//! Consumption ledger models.

use hookhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `consumptions` table: proof that an event was delivered
/// to a client.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Consumption {
    pub id: DbId,
    pub client_id: DbId,
    pub event_identifier: String,
    pub event_type: String,
    pub org_name: Option<String>,
    pub repo_name: Option<String>,
    pub consumed_at: Timestamp,
}
