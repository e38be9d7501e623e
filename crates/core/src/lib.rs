//! Domain logic for the hookhub webhook relay.
//!
//! Everything in this crate is pure: no I/O, no database, no HTTP. The
//! storage and transport crates build on these primitives.
//!
//! - [`signature`]: HMAC-SHA256 verification of inbound webhook bodies.
//! - [`metadata`]: organization/repository extraction from payloads.
//! - [`interest`]: client interest filters and the event match rule.
//! - [`identifier`]: collision-free, store-ordered event identifiers.
//! - [`clients`]: client registration input validation.

pub mod clients;
pub mod error;
pub mod identifier;
pub mod interest;
pub mod metadata;
pub mod signature;
pub mod types;
