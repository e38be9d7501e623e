//! Repository for the `clients` table (the client registry).

use hookhub_core::types::{DbId, EventSeq, Timestamp};
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::client::Client;

/// Column list for `clients` queries.
const CLIENT_COLUMNS: &str = "\
    id, name, description, interested_orgs, interested_repos, \
    created_at, last_poll_at, event_cursor";

/// Provides registration, lookup, and poll bookkeeping for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Register a client, or return the existing one with the same name.
    ///
    /// Idempotent by `name`: an existing record is returned unchanged (its
    /// description and interest lists are not touched). The boolean is
    /// `true` when a new row was created. Safe under concurrent calls with
    /// the same name.
    pub async fn register(
        pool: &SqlitePool,
        name: &str,
        description: Option<&str>,
        interested_orgs: &[String],
        interested_repos: &[String],
        created_at: Timestamp,
    ) -> Result<(Client, bool), sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO clients (name, description, interested_orgs, interested_repos, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .bind(Json(interested_orgs))
        .bind(Json(interested_repos))
        .bind(created_at)
        .execute(pool)
        .await?;

        let client = Self::find_by_name(pool, name)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok((client, result.rows_affected() > 0))
    }

    /// Find a client by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a client by its unique name.
    pub async fn find_by_name(
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE name = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all clients in registration order.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY id");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }

    /// Replace a client's interest lists. `None` keeps the current list.
    ///
    /// Resets the scan cursor so that events which now match are evaluated
    /// on the next poll; already-delivered events stay delivered.
    pub async fn update_interest(
        pool: &SqlitePool,
        id: DbId,
        interested_orgs: Option<&[String]>,
        interested_repos: Option<&[String]>,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET \
                interested_orgs = COALESCE($2, interested_orgs), \
                interested_repos = COALESCE($3, interested_repos), \
                event_cursor = 0 \
             WHERE id = $1 \
             RETURNING {CLIENT_COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(interested_orgs.map(Json))
            .bind(interested_repos.map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Record a completed poll inside the poll's transaction.
    ///
    /// Sets `last_poll_at` and advances the scan cursor; the cursor never
    /// moves backwards. Returns `false` if the client does not exist.
    pub async fn touch_poll(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        id: DbId,
        polled_at: Timestamp,
        cursor: EventSeq,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET last_poll_at = $2, event_cursor = MAX(event_cursor, $3) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(polled_at)
        .bind(cursor)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
