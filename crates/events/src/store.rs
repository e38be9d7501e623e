//! Append-only event store.
//!
//! [`EventStore`] is the only writer of the `events` table. Identifier
//! generation and the insert run under one writer lock, so identifiers,
//! `seq` values, and commit order all agree: once a reader sees `seq = n`,
//! every event with a smaller `seq` is already visible. Poll cursors rely on
//! this.
//!
//! The generator is seeded from the newest stored identifier on the first
//! write, so identifiers keep increasing across restarts even if the clock
//! has stepped back.

use std::collections::VecDeque;

use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt};
use hookhub_core::identifier::IdentifierGenerator;
use hookhub_core::metadata::EventMetadata;
use hookhub_core::types::EventSeq;
use hookhub_db::models::event::{EventRow, NewEvent, StoredEvent};
use hookhub_db::repositories::EventRepo;
use hookhub_db::DbPool;
use tokio::sync::Mutex;

/// Rows fetched per round-trip while enumerating.
const DEFAULT_SCAN_BATCH: i64 = 256;

/// Durable, append-only log of ingested events.
pub struct EventStore {
    pool: DbPool,
    /// `None` until the first write seeds it from the stored log.
    writer: Mutex<Option<IdentifierGenerator>>,
    scan_batch: i64,
}

impl EventStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            writer: Mutex::new(None),
            scan_batch: DEFAULT_SCAN_BATCH,
        }
    }

    /// Override the number of rows fetched per page during [`enumerate`](Self::enumerate).
    pub fn with_scan_batch(mut self, scan_batch: i64) -> Self {
        self.scan_batch = scan_batch.max(1);
        self
    }

    /// Persist a new event and return it with its assigned identifier and
    /// store position.
    pub async fn persist(
        &self,
        event_type: &str,
        delivery_id: Option<String>,
        metadata: EventMetadata,
        payload: serde_json::Value,
    ) -> Result<StoredEvent, sqlx::Error> {
        let mut writer = self.writer.lock().await;
        if writer.is_none() {
            *writer = Some(self.resume_generator().await?);
        }
        let ids = writer.get_or_insert_with(IdentifierGenerator::new);

        let received_at = Utc::now();
        let event = NewEvent {
            identifier: ids.next(event_type, received_at),
            event_type: event_type.to_string(),
            delivery_id,
            org_name: metadata.org_name,
            repo_name: metadata.repo_name,
            payload,
            received_at,
        };

        let seq = EventRepo::insert(&self.pool, &event).await.inspect_err(|e| {
            tracing::error!(
                identifier = %event.identifier,
                event_type = %event.event_type,
                error = %e,
                "Failed to store event"
            );
        })?;
        drop(writer);

        tracing::info!(
            identifier = %event.identifier,
            seq,
            event_type = %event.event_type,
            org = event.org_name.as_deref().unwrap_or("-"),
            repo = event.repo_name.as_deref().unwrap_or("-"),
            "Event stored"
        );

        Ok(event.into_stored(seq))
    }

    /// Generator continuing after the newest identifier already stored.
    async fn resume_generator(&self) -> Result<IdentifierGenerator, sqlx::Error> {
        let latest = EventRepo::latest_identifier(&self.pool).await?;
        if let Some(identifier) = &latest {
            tracing::debug!(%identifier, "Resuming identifiers after newest stored event");
        }
        Ok(latest
            .as_deref()
            .map(IdentifierGenerator::resume_after)
            .unwrap_or_default())
    }

    /// Lazily enumerate stored events in storage order, starting after
    /// `after_seq` (or from the beginning).
    ///
    /// The stream is finite: it ends at the newest event visible when the
    /// last page was fetched. Restart it from any `seq` already seen. Rows
    /// whose payload cannot be decoded are logged and skipped; a database
    /// error is yielded once and ends the stream.
    pub fn enumerate(
        &self,
        after_seq: Option<EventSeq>,
    ) -> BoxStream<'static, Result<StoredEvent, sqlx::Error>> {
        let state = ScanState {
            pool: self.pool.clone(),
            batch: self.scan_batch,
            cursor: after_seq.unwrap_or(0),
            buffer: VecDeque::new(),
            exhausted: false,
        };

        stream::unfold(state, |mut state| async move {
            loop {
                if let Some(row) = state.buffer.pop_front() {
                    let identifier = row.identifier.clone();
                    let seq = row.seq;
                    match row.decode() {
                        Ok(event) => return Some((Ok(event), state)),
                        Err(e) => {
                            tracing::warn!(%identifier, seq, error = %e, "Skipping unreadable stored event");
                            continue;
                        }
                    }
                }

                if state.exhausted {
                    return None;
                }

                if let Err(e) = state.fetch_page().await {
                    state.exhausted = true;
                    return Some((Err(e), state));
                }
            }
        })
        .boxed()
    }
}

/// Pagination state of one [`EventStore::enumerate`] call.
struct ScanState {
    pool: DbPool,
    batch: i64,
    cursor: EventSeq,
    buffer: VecDeque<EventRow>,
    exhausted: bool,
}

impl ScanState {
    async fn fetch_page(&mut self) -> Result<(), sqlx::Error> {
        let rows = EventRepo::fetch_after(&self.pool, self.cursor, self.batch).await?;
        if (rows.len() as i64) < self.batch {
            self.exhausted = true;
        }
        if let Some(last) = rows.last() {
            self.cursor = last.seq;
        }
        self.buffer.extend(rows);
        Ok(())
    }
}
