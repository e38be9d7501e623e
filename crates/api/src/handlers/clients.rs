//! Handlers for the `/clients` resource (the client registry).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use hookhub_core::clients::{normalize_interest_list, validate_client_name};
use hookhub_core::error::CoreError;
use hookhub_core::types::DbId;
use hookhub_db::models::client::{Client, CreateClient, UpdateClientInterest};
use hookhub_db::repositories::ClientRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /clients
///
/// Idempotent by name: registering an existing name returns the stored
/// client unchanged with `200`; a new client is returned with `201`.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let name = input.name.trim();
    validate_client_name(name)?;

    let orgs = normalize_interest_list(
        "interested_orgs",
        input.interested_orgs.as_deref().unwrap_or_default(),
    )?;
    let repos = normalize_interest_list(
        "interested_repos",
        input.interested_repos.as_deref().unwrap_or_default(),
    )?;
    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let (client, created) =
        ClientRepo::register(&state.pool, name, description, &orgs, &repos, Utc::now()).await?;

    if created {
        tracing::info!(
            client_id = client.id,
            client_name = %client.name,
            orgs = ?client.interested_orgs,
            repos = ?client.interested_repos,
            "Client registered"
        );
        Ok((StatusCode::CREATED, Json(client)))
    } else {
        tracing::debug!(client_id = client.id, client_name = %client.name, "Client already registered");
        Ok((StatusCode::OK, Json(client)))
    }
}

/// GET /clients
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Client>>> {
    let clients = ClientRepo::list(&state.pool).await?;
    Ok(Json(clients))
}

/// GET /clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(client))
}

/// PUT /clients/{id}/interest
///
/// Replaces the lists that are present in the body. Events that match the
/// new interest are picked up on the next poll; nothing already delivered
/// is delivered again.
pub async fn update_interest(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClientInterest>,
) -> AppResult<Json<Client>> {
    let update = UpdateClientInterest {
        interested_orgs: input
            .interested_orgs
            .map(|orgs| normalize_interest_list("interested_orgs", &orgs))
            .transpose()?,
        interested_repos: input
            .interested_repos
            .map(|repos| normalize_interest_list("interested_repos", &repos))
            .transpose()?,
    };

    let client = state.delivery.apply_interest_update(id, &update).await?;
    Ok(Json(client))
}
