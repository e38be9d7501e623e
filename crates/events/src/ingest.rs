//! Inbound webhook pipeline: verify, parse, extract, persist.
//!
//! The signature is checked against the raw bytes before any parsing, so an
//! unauthenticated caller never causes JSON work and never sees parser
//! error detail.

use std::sync::Arc;

use hookhub_core::identifier::UNKNOWN_EVENT_TYPE;
use hookhub_core::metadata;
use hookhub_core::signature::{self, WebhookSecret};
use hookhub_db::models::event::StoredEvent;

use crate::error::IngestError;
use crate::store::EventStore;

/// One inbound webhook delivery as received from the transport.
#[derive(Debug, Clone, Copy)]
pub struct IngestRequest<'a> {
    /// Raw request body, exactly as signed by the sender.
    pub body: &'a [u8],
    /// Event type header (`X-GitHub-Event`).
    pub event_type: Option<&'a str>,
    /// Signature header (`X-Hub-Signature-256`).
    pub signature: Option<&'a str>,
    /// Sender's delivery id (`X-GitHub-Delivery`); echoed, not required to be unique.
    pub delivery_id: Option<&'a str>,
}

/// Authenticates and stores inbound webhooks.
pub struct IngestPipeline {
    store: Arc<EventStore>,
    secret: Option<WebhookSecret>,
}

impl IngestPipeline {
    pub fn new(store: Arc<EventStore>, secret: Option<WebhookSecret>) -> Self {
        if secret.is_none() {
            tracing::warn!(
                "No webhook secret configured: inbound webhooks are accepted WITHOUT signature verification"
            );
        }
        Self { store, secret }
    }

    /// Whether signatures are being enforced.
    pub fn verifies_signatures(&self) -> bool {
        self.secret.is_some()
    }

    /// Run one delivery through the pipeline.
    pub async fn ingest(&self, request: IngestRequest<'_>) -> Result<StoredEvent, IngestError> {
        let event_type = request
            .event_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(UNKNOWN_EVENT_TYPE);

        if !signature::verify(request.body, request.signature, self.secret.as_ref()) {
            tracing::warn!(
                event_type,
                delivery_id = request.delivery_id.unwrap_or("-"),
                signature_present = request.signature.is_some(),
                "Webhook signature verification failed"
            );
            return Err(IngestError::Signature);
        }

        let payload: serde_json::Value = serde_json::from_slice(request.body).map_err(|e| {
            tracing::warn!(
                event_type,
                delivery_id = request.delivery_id.unwrap_or("-"),
                error = %e,
                "Webhook payload is not valid JSON"
            );
            IngestError::Payload(e)
        })?;

        let meta = metadata::extract(&payload);

        tracing::info!(
            event_type,
            delivery_id = request.delivery_id.unwrap_or("-"),
            "Webhook received"
        );

        let stored = self
            .store
            .persist(
                event_type,
                request.delivery_id.map(str::to_string),
                meta,
                payload,
            )
            .await?;

        Ok(stored)
    }
}
