use std::sync::Arc;
use std::time::Instant;

use hookhub_events::{DeliveryEngine, EventStore, IngestPipeline};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: hookhub_db::DbPool,
    /// Inbound webhook pipeline (verify, parse, extract, persist).
    pub ingest: Arc<IngestPipeline>,
    /// Per-client delivery engine.
    pub delivery: Arc<DeliveryEngine>,
    /// When the service started, for `/health` uptime.
    pub started_at: Instant,
}

impl AppState {
    /// Wire the event store, ingestion pipeline, and delivery engine onto
    /// one pool. Both services share the same store.
    pub fn new(pool: hookhub_db::DbPool, config: &ServerConfig) -> Self {
        let store = Arc::new(EventStore::new(pool.clone()));
        let ingest = Arc::new(IngestPipeline::new(
            Arc::clone(&store),
            config.webhook_secret.clone(),
        ));
        let delivery = Arc::new(DeliveryEngine::new(pool.clone(), store));

        Self {
            pool,
            ingest,
            delivery,
            started_at: Instant::now(),
        }
    }
}
