use axum::extract::State;
use axum::routing::{patch, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::auth::middleware::{Authorized, perm};
use crate::dto::{EditProfileRequest, ProfileResponse, RegisterProfileRequest};
use crate::error::AppError;
use crate::extract::ValidJson;
use crate::services::ProfileService;
use crate::state::AppState;

/// Host and player self-registration routes.
///
/// Hosting requires `create:game`; playing requires `join:game`, which hosts usually hold
/// as well, so a host can also register and join as a player.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/host/register", post(register_host))
        .route("/host/edit", patch(edit_host))
        .route("/player/register", post(register_player))
        .route("/player/edit", patch(edit_player))
}

#[derive(Serialize)]
struct HostEnvelope {
    success: bool,
    host: ProfileResponse,
}

#[derive(Serialize)]
struct PlayerEnvelope {
    success: bool,
    player: ProfileResponse,
}

/// `POST /host/register`: Register the caller as a host.
async fn register_host(
    State(state): State<AppState>,
    auth: Authorized<perm::CreateGame>,
    ValidJson(body): ValidJson<RegisterProfileRequest>,
) -> Result<Json<HostEnvelope>, AppError> {
    let profile = body.validate()?;
    let host = ProfileService::register_host(&state.db, &auth.caller.id, profile).await?;

    Ok(Json(HostEnvelope {
        success: true,
        host: host.into(),
    }))
}

/// `PATCH /host/edit`: Update the caller's host profile.
async fn edit_host(
    State(state): State<AppState>,
    auth: Authorized<perm::CreateGame>,
    ValidJson(body): ValidJson<EditProfileRequest>,
) -> Result<Json<HostEnvelope>, AppError> {
    let patch = body.validate()?;
    let host = ProfileService::edit_host(&state.db, &auth.caller.id, patch).await?;

    Ok(Json(HostEnvelope {
        success: true,
        host: host.into(),
    }))
}

/// `POST /player/register`: Register the caller as a player.
async fn register_player(
    State(state): State<AppState>,
    auth: Authorized<perm::JoinGame>,
    ValidJson(body): ValidJson<RegisterProfileRequest>,
) -> Result<Json<PlayerEnvelope>, AppError> {
    let profile = body.validate()?;
    let player = ProfileService::register_player(&state.db, &auth.caller.id, profile).await?;

    Ok(Json(PlayerEnvelope {
        success: true,
        player: player.into(),
    }))
}

/// `PATCH /player/edit`: Update the caller's player profile.
async fn edit_player(
    State(state): State<AppState>,
    auth: Authorized<perm::JoinGame>,
    ValidJson(body): ValidJson<EditProfileRequest>,
) -> Result<Json<PlayerEnvelope>, AppError> {
    let patch = body.validate()?;
    let player = ProfileService::edit_player(&state.db, &auth.caller.id, patch).await?;

    Ok(Json(PlayerEnvelope {
        success: true,
        player: player.into(),
    }))
}
