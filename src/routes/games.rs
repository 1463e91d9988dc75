use axum::extract::State;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::auth::middleware::{Authorized, perm};
use crate::dto::{CreateGameRequest, EditGameRequest, GameResponse, ListGamesQuery, ProfileResponse};
use crate::error::AppError;
use crate::extract::{GameId, ValidJson, ValidQuery};
use crate::services::{ListingService, RegistrationService};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Game listing, lifecycle and seat registration routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games))
        .route("/game/create", post(create_game))
        .route("/game/{game_id}", delete(delete_game))
        .route("/game/{game_id}/players", get(list_players))
        .route("/game/{game_id}/join", post(join_game))
        .route("/game/{game_id}/unregister", delete(unregister_game))
        .route("/game/{game_id}/edit", patch(edit_game))
}

// ─────────────────────────────────────────────────────────────────────────────
// Response envelopes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GameEnvelope {
    success: bool,
    game: GameResponse,
}

#[derive(Serialize)]
struct GamesEnvelope {
    success: bool,
    games: Vec<GameResponse>,
}

#[derive(Serialize)]
struct PlayersEnvelope {
    success: bool,
    players: Vec<ProfileResponse>,
}

#[derive(Serialize)]
struct DeletedEnvelope {
    success: bool,
    game_id: i32,
}

impl GameEnvelope {
    fn new(game: crate::entities::game::Model) -> Json<Self> {
        Json(Self {
            success: true,
            game: game.into(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /games?page=&page_length=`: Games ordered by start time.
async fn list_games(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListGamesQuery>,
) -> Result<Json<GamesEnvelope>, AppError> {
    let page = query.into_page(state.config.default_page_length)?;
    let games = ListingService::list_games(&state.db, page).await?;

    Ok(Json(GamesEnvelope {
        success: true,
        games: games.into_iter().map(GameResponse::from).collect(),
    }))
}

/// `GET /game/{game_id}/players`: Players holding a seat in the game.
async fn list_players(
    State(state): State<AppState>,
    GameId(game_id): GameId,
) -> Result<Json<PlayersEnvelope>, AppError> {
    let players = ListingService::players_for_game(&state.db, game_id).await?;

    Ok(Json(PlayersEnvelope {
        success: true,
        players: players.into_iter().map(ProfileResponse::from).collect(),
    }))
}

/// `POST /game/create`: Create a game owned by the caller.
async fn create_game(
    State(state): State<AppState>,
    auth: Authorized<perm::CreateGame>,
    ValidJson(body): ValidJson<CreateGameRequest>,
) -> Result<Json<GameEnvelope>, AppError> {
    let new_game = body.validate()?;
    let game = RegistrationService::create_game(&state.db, &auth.caller.id, new_game).await?;
    Ok(GameEnvelope::new(game))
}

/// `POST /game/{game_id}/join`: Claim a seat for the caller.
async fn join_game(
    State(state): State<AppState>,
    auth: Authorized<perm::JoinGame>,
    GameId(game_id): GameId,
) -> Result<Json<GameEnvelope>, AppError> {
    let game = RegistrationService::join_game(&state.db, &auth.caller.id, game_id).await?;
    Ok(GameEnvelope::new(game))
}

/// `DELETE /game/{game_id}/unregister`: Give up the caller's seat.
async fn unregister_game(
    State(state): State<AppState>,
    auth: Authorized<perm::JoinGame>,
    GameId(game_id): GameId,
) -> Result<Json<GameEnvelope>, AppError> {
    let game = RegistrationService::unregister_game(&state.db, &auth.caller.id, game_id).await?;
    Ok(GameEnvelope::new(game))
}

/// `PATCH /game/{game_id}/edit`: Partially update a game the caller owns.
async fn edit_game(
    State(state): State<AppState>,
    auth: Authorized<perm::EditGame>,
    GameId(game_id): GameId,
    ValidJson(body): ValidJson<EditGameRequest>,
) -> Result<Json<GameEnvelope>, AppError> {
    let patch = body.validate()?;
    let game = RegistrationService::edit_game(&state.db, &auth.caller.id, game_id, patch).await?;
    Ok(GameEnvelope::new(game))
}

/// `DELETE /game/{game_id}`: Delete a game the caller owns, with its registrations.
async fn delete_game(
    State(state): State<AppState>,
    auth: Authorized<perm::DeleteGame>,
    GameId(game_id): GameId,
) -> Result<Json<DeletedEnvelope>, AppError> {
    let game_id = RegistrationService::delete_game(&state.db, &auth.caller.id, game_id).await?;

    Ok(Json(DeletedEnvelope {
        success: true,
        game_id,
    }))
}
