//! Repository for the append-only `events` table.

use hookhub_core::types::EventSeq;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::event::{EventRow, EventSummary, NewEvent};

/// Column list for `events` queries.
const EVENT_COLUMNS: &str =
    "seq, identifier, event_type, delivery_id, org_name, repo_name, payload, received_at";

/// Column list for payload-free listings.
const SUMMARY_COLUMNS: &str =
    "seq, identifier, event_type, delivery_id, org_name, repo_name, received_at";

/// Provides append and scan operations for events. There is deliberately
/// no update or delete.
pub struct EventRepo;

impl EventRepo {
    /// Append an event, returning its store position.
    ///
    /// Fails with a unique-constraint violation if the identifier already
    /// exists; an existing row is never overwritten.
    pub async fn insert(pool: &SqlitePool, event: &NewEvent) -> Result<EventSeq, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO events \
                (identifier, event_type, delivery_id, org_name, repo_name, payload, received_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING seq",
        )
        .bind(&event.identifier)
        .bind(&event.event_type)
        .bind(&event.delivery_id)
        .bind(&event.org_name)
        .bind(&event.repo_name)
        .bind(Json(&event.payload))
        .bind(event.received_at)
        .fetch_one(pool)
        .await
    }

    /// Fetch up to `limit` rows stored after `after_seq`, oldest first.
    pub async fn fetch_after(
        pool: &SqlitePool,
        after_seq: EventSeq,
        limit: i64,
    ) -> Result<Vec<EventRow>, sqlx::Error> {
        let query =
            format!("SELECT {EVENT_COLUMNS} FROM events WHERE seq > $1 ORDER BY seq LIMIT $2");
        sqlx::query_as::<_, EventRow>(&query)
            .bind(after_seq)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Find one event row by identifier.
    pub async fn find_by_identifier(
        pool: &SqlitePool,
        identifier: &str,
    ) -> Result<Option<EventRow>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE identifier = $1");
        sqlx::query_as::<_, EventRow>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// List recent events newest-first, without payloads.
    pub async fn list_recent(
        pool: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EventSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM events ORDER BY seq DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, EventSummary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Identifier of the most recently stored event, if any.
    pub async fn latest_identifier(pool: &SqlitePool) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT identifier FROM events ORDER BY seq DESC LIMIT 1")
            .fetch_optional(pool)
            .await
    }

    /// Total number of stored events.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(pool)
            .await
    }
}
