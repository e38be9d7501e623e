//! Delivery engine: computes and records each client's new events.
//!
//! A poll resolves the client, scans the event store from the client's
//! cursor, filters out already-consumed events and events outside the
//! client's interest, then records a consumption row for every match and
//! advances the cursor in a single transaction. Events are returned only
//! after that transaction commits.
//!
//! Polls for the same client are serialized by a per-client lock; polls for
//! different clients never wait on each other. Independently of the lock,
//! the ledger insert is insert-if-absent, so an event can only be handed to
//! a client by the call that actually created its consumption row.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::TryStreamExt;
use hookhub_core::types::{DbId, EventSeq, Timestamp};
use hookhub_db::models::client::{Client, UpdateClientInterest};
use hookhub_db::models::event::StoredEvent;
use hookhub_db::repositories::{ClientRepo, ConsumptionRepo};
use hookhub_db::DbPool;
use tokio::sync::{Mutex, RwLock};

use crate::error::DeliveryError;
use crate::store::EventStore;

/// Result of one poll.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub client_id: DbId,
    /// Newly delivered events, oldest first.
    pub events: Vec<StoredEvent>,
    pub poll_timestamp: Timestamp,
}

impl PollOutcome {
    pub fn count(&self) -> usize {
        self.events.len()
    }
}

/// Computes and records per-client deliveries.
pub struct DeliveryEngine {
    pool: DbPool,
    store: Arc<EventStore>,
    client_locks: RwLock<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl DeliveryEngine {
    pub fn new(pool: DbPool, store: Arc<EventStore>) -> Self {
        Self {
            pool,
            store,
            client_locks: RwLock::new(HashMap::new()),
        }
    }

    /// Deliver every stored event that matches the client's interest and
    /// has not been delivered to it before.
    ///
    /// Unknown clients fail with [`DeliveryError::ClientNotFound`] before any
    /// state is touched. `last_poll_at` is updated on every successful poll,
    /// including polls that find nothing.
    pub async fn poll(&self, client_id: DbId) -> Result<PollOutcome, DeliveryError> {
        self.require_client(client_id).await?;

        let lock = self.client_lock(client_id).await;
        let _guard = lock.lock().await;

        // Re-read under the lock: a poll that just finished may have moved
        // the cursor.
        let client = self.require_client(client_id).await?;
        let (matched, cursor) = self.scan(&client).await?;

        let poll_timestamp = Utc::now();
        let delivered = self
            .record(client_id, matched, poll_timestamp, cursor)
            .await
            .map_err(DeliveryError::storage(client_id))?;

        tracing::info!(
            client_id,
            client_name = %client.name,
            delivered = delivered.len(),
            cursor,
            "Client polled"
        );

        Ok(PollOutcome {
            client_id,
            events: delivered,
            poll_timestamp,
        })
    }

    /// Edit a client's interest lists.
    ///
    /// Takes the client's poll lock so the cursor reset cannot be overwritten
    /// by a poll that is already in flight. Unknown clients fail before a
    /// lock is created for them.
    pub async fn update_interest(
        &self,
        client_id: DbId,
        interested_orgs: Option<&[String]>,
        interested_repos: Option<&[String]>,
    ) -> Result<Client, DeliveryError> {
        self.require_client(client_id).await?;

        let lock = self.client_lock(client_id).await;
        let _guard = lock.lock().await;

        let client =
            ClientRepo::update_interest(&self.pool, client_id, interested_orgs, interested_repos)
                .await
                .map_err(DeliveryError::storage(client_id))?
                .ok_or(DeliveryError::ClientNotFound(client_id))?;

        tracing::info!(
            client_id,
            client_name = %client.name,
            orgs = ?client.interested_orgs,
            repos = ?client.interested_repos,
            "Client interest updated"
        );
        Ok(client)
    }

    /// Convenience wrapper taking the update DTO.
    pub async fn apply_interest_update(
        &self,
        client_id: DbId,
        update: &UpdateClientInterest,
    ) -> Result<Client, DeliveryError> {
        self.update_interest(
            client_id,
            update.interested_orgs.as_deref(),
            update.interested_repos.as_deref(),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn require_client(&self, client_id: DbId) -> Result<Client, DeliveryError> {
        ClientRepo::find_by_id(&self.pool, client_id)
            .await
            .map_err(DeliveryError::storage(client_id))?
            .ok_or(DeliveryError::ClientNotFound(client_id))
    }

    /// Return the lock serializing polls of `client_id`, creating it on first
    /// use.
    async fn client_lock(&self, client_id: DbId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.client_locks.read().await.get(&client_id) {
            return Arc::clone(lock);
        }
        let mut locks = self.client_locks.write().await;
        Arc::clone(locks.entry(client_id).or_default())
    }

    /// Scan events after the client's cursor and collect the undelivered
    /// ones it is interested in. Returns the matches (storage order) and the
    /// highest `seq` scanned.
    async fn scan(&self, client: &Client) -> Result<(Vec<StoredEvent>, EventSeq), DeliveryError> {
        let consumed = ConsumptionRepo::consumed_since(&self.pool, client.id, client.event_cursor)
            .await
            .map_err(DeliveryError::storage(client.id))?;
        let interest = client.interest();

        let mut cursor = client.event_cursor;
        let mut matched = Vec::new();
        let mut events = self.store.enumerate(Some(client.event_cursor));

        while let Some(event) = events
            .try_next()
            .await
            .map_err(DeliveryError::storage(client.id))?
        {
            cursor = cursor.max(event.seq);
            if consumed.contains(&event.identifier) {
                continue;
            }
            if interest.matches(event.org_name.as_deref(), event.repo_name.as_deref()) {
                matched.push(event);
            }
        }

        Ok((matched, cursor))
    }

    /// Write consumption rows and poll bookkeeping in one transaction.
    /// Returns only the events whose consumption row this call created.
    async fn record(
        &self,
        client_id: DbId,
        matched: Vec<StoredEvent>,
        polled_at: Timestamp,
        cursor: EventSeq,
    ) -> Result<Vec<StoredEvent>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let mut delivered = Vec::with_capacity(matched.len());
        for event in matched {
            if ConsumptionRepo::insert_if_absent(&mut tx, client_id, &event, polled_at).await? {
                delivered.push(event);
            } else {
                tracing::debug!(
                    client_id,
                    identifier = %event.identifier,
                    "Event already consumed by client, not delivering again"
                );
            }
        }

        ClientRepo::touch_poll(&mut tx, client_id, polled_at, cursor).await?;
        tx.commit().await?;

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn unknown_clients_leave_no_lock_behind(pool: SqlitePool) {
        let store = Arc::new(EventStore::new(pool.clone()));
        let engine = DeliveryEngine::new(pool, store);

        for id in 1..=50 {
            let update = engine.update_interest(id, Some(&[][..]), None).await;
            assert!(matches!(update, Err(DeliveryError::ClientNotFound(_))));
            let poll = engine.poll(id).await;
            assert!(matches!(poll, Err(DeliveryError::ClientNotFound(_))));
        }

        assert!(engine.client_locks.read().await.is_empty());
    }
}
