//! Error types for ingestion and delivery.

use hookhub_core::types::DbId;

/// Why an inbound webhook was not stored.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The signature header was missing or did not match the body.
    #[error("webhook signature verification failed")]
    Signature,

    /// The authenticated body is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Payload(#[source] serde_json::Error),

    /// The event could not be written.
    #[error("failed to store event: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Why a poll or interest edit could not be completed.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("client {0} not found")]
    ClientNotFound(DbId),

    #[error("storage failure for client {client_id}: {source}")]
    Storage {
        client_id: DbId,
        #[source]
        source: sqlx::Error,
    },
}

impl DeliveryError {
    /// Adapter for `map_err` that tags a database error with the client.
    pub(crate) fn storage(client_id: DbId) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Storage { client_id, source }
    }
}
