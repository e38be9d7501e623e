//! Client (downstream consumer) models.

use hookhub_core::interest::InterestFilter;
use hookhub_core::types::{DbId, EventSeq, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `clients` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(json)]
    pub interested_orgs: Vec<String>,
    #[sqlx(json)]
    pub interested_repos: Vec<String>,
    pub created_at: Timestamp,
    pub last_poll_at: Option<Timestamp>,
    /// Highest event `seq` already scanned for this client.
    #[serde(skip)]
    pub event_cursor: EventSeq,
}

impl Client {
    pub fn interest(&self) -> InterestFilter {
        InterestFilter::new(
            self.interested_orgs.iter().cloned(),
            self.interested_repos.iter().cloned(),
        )
    }
}

/// DTO for registering a client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub description: Option<String>,
    pub interested_orgs: Option<Vec<String>>,
    pub interested_repos: Option<Vec<String>>,
}

/// DTO for editing a client's interest. `None` leaves a list unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClientInterest {
    pub interested_orgs: Option<Vec<String>>,
    pub interested_repos: Option<Vec<String>>,
}
