//! Event ingestion and fan-out for hookhub.
//!
//! - [`EventStore`]: append-only event log with ordered, restartable scans.
//! - [`IngestPipeline`]: authenticates inbound webhooks and stores them.
//! - [`DeliveryEngine`]: per-client, at-most-once delivery on poll.

pub mod delivery;
pub mod error;
pub mod ingest;
pub mod store;

pub use delivery::{DeliveryEngine, PollOutcome};
pub use error::{DeliveryError, IngestError};
pub use ingest::{IngestPipeline, IngestRequest};
pub use store::EventStore;
