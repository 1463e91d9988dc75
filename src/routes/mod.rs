mod games;
mod health;
mod profiles;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health`: lightweight health check
/// - `GET /api/v1/health`: detailed health check with database connectivity
/// - `GET /games`, `GET /game/{game_id}/players`: public listings
/// - `/game/...`: game lifecycle and seat registration (bearer token required)
/// - `/host/...`, `/player/...`: self-registration and profile edits (bearer token required)
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new().merge(health::api_router());

    Router::new()
        .merge(health::root_router())
        .merge(games::router())
        .merge(profiles::router())
        .nest("/api/v1", api_v1)
}
