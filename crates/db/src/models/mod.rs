//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Serialize` representations returned to API callers
//! - `Deserialize` DTOs for inserts and updates

pub mod client;
pub mod consumption;
pub mod event;
