//! Repository for the `consumptions` table (the consumption ledger).

use std::collections::HashSet;

use hookhub_core::types::{DbId, EventSeq, Timestamp};
use sqlx::SqlitePool;

use crate::models::consumption::Consumption;
use crate::models::event::StoredEvent;

/// Column list for `consumptions` queries.
const CONSUMPTION_COLUMNS: &str =
    "id, client_id, event_identifier, event_type, org_name, repo_name, consumed_at";

/// Provides insert-if-absent and lookup operations for delivery markers.
pub struct ConsumptionRepo;

impl ConsumptionRepo {
    /// Identifiers of events stored after `after_seq` that have already been
    /// delivered to `client_id`.
    pub async fn consumed_since(
        pool: &SqlitePool,
        client_id: DbId,
        after_seq: EventSeq,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let identifiers: Vec<String> = sqlx::query_scalar(
            "SELECT c.event_identifier \
             FROM consumptions c \
             JOIN events e ON e.identifier = c.event_identifier \
             WHERE c.client_id = $1 AND e.seq > $2",
        )
        .bind(client_id)
        .bind(after_seq)
        .fetch_all(pool)
        .await?;
        Ok(identifiers.into_iter().collect())
    }

    /// Record that `event` was delivered to `client_id`, unless a record
    /// already exists.
    ///
    /// Returns `true` only when this call created the record; the caller
    /// must deliver the event exactly when this returns `true`.
    pub async fn insert_if_absent(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        client_id: DbId,
        event: &StoredEvent,
        consumed_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO consumptions \
                (client_id, event_identifier, event_type, org_name, repo_name, consumed_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (client_id, event_identifier) DO NOTHING",
        )
        .bind(client_id)
        .bind(&event.identifier)
        .bind(&event.event_type)
        .bind(&event.org_name)
        .bind(&event.repo_name)
        .bind(consumed_at)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// All delivery records for a client, oldest first.
    pub async fn list_for_client(
        pool: &SqlitePool,
        client_id: DbId,
    ) -> Result<Vec<Consumption>, sqlx::Error> {
        let query = format!(
            "SELECT {CONSUMPTION_COLUMNS} FROM consumptions WHERE client_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Consumption>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }
}
