//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` (or an open transaction) as the first argument.

pub mod client_repo;
pub mod consumption_repo;
pub mod event_repo;

pub use client_repo::ClientRepo;
pub use consumption_repo::ConsumptionRepo;
pub use event_repo::EventRepo;
