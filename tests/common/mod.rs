#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::ConnectOptions;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use lfg_api::auth::jwt;
use lfg_api::config::{Config, DEFAULT_PAGE_LENGTH, Environment};
use lfg_api::state::AppState;

pub const HOST_PERMISSIONS: &[&str] = &["create:game", "edit:game", "delete:game", "join:game"];
pub const PLAYER_PERMISSIONS: &[&str] = &["join:game"];

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
        jwt_audience: Some("lfg-api".to_string()),
        jwt_issuer: None,
        frontend_url: "http://localhost:3001".to_string(),
        default_page_length: DEFAULT_PAGE_LENGTH,
    }
}

/// Application state backed by an in-memory `SQLite` database with migrations applied.
pub async fn test_state() -> AppState {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    AppState::new(db, test_config())
}

/// Application state over a file-backed `SQLite` database with a pool of several
/// connections, so transactions really run side by side.
///
/// The returned directory owns the database file; keep it alive for the whole test.
pub async fn pooled_state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("lfg.db").display());

    let mut opts = ConnectOptions::new(url);
    opts.max_connections(4).min_connections(1).sqlx_logging(false);
    let db = sea_orm::Database::connect(opts)
        .await
        .unwrap_or_else(|e| panic!("connect: {e}"));
    Migrator::up(&db, None)
        .await
        .unwrap_or_else(|e| panic!("migrate: {e}"));

    (AppState::new(db, test_config()), dir)
}

pub fn test_app(state: &AppState) -> Router {
    lfg_api::routes::router().with_state(state.clone())
}

/// Mint a token for `subject` the way the identity provider would.
pub fn token(subject: &str, permissions: &[&str]) -> String {
    jwt::issue_token(&test_config(), subject, permissions, 900).unwrap_or_default()
}

pub fn host_token(subject: &str) -> String {
    token(subject, HOST_PERMISSIONS)
}

pub fn player_token(subject: &str) -> String {
    token(subject, PLAYER_PERMISSIONS)
}

/// Send a request and return (status, parsed JSON body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_default();

    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let json = serde_json::from_slice(&bytes).unwrap_or_default();

    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value, token: &str) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn patch_json(app: &Router, uri: &str, body: &Value, token: &str) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, Some(body), Some(token)).await
}

pub async fn post(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::POST, uri, None, Some(token)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

/// Register `subject` as a host.
pub async fn register_host(app: &Router, subject: &str) {
    let (status, body) = post_json(
        app,
        "/host/register",
        &json!({ "name": format!("host {subject}"), "email": format!("{subject}@host.test") }),
        &host_token(subject),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "host registration failed: {body}");
}

/// Register `subject` as a player.
pub async fn register_player(app: &Router, subject: &str) {
    let (status, body) = post_json(
        app,
        "/player/register",
        &json!({ "name": format!("player {subject}"), "email": format!("{subject}@player.test") }),
        &player_token(subject),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "player registration failed: {body}");
}

/// Create a game hosted by `host` and return its id.
pub async fn create_game(app: &Router, host: &str, max_players: i32, start_time: &str) -> i64 {
    let (status, body) = post_json(
        app,
        "/game/create",
        &json!({
            "start_time": start_time,
            "max_players": max_players,
            "platform": "PokerStars",
        }),
        &host_token(host),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create game failed: {body}");
    body["game"]["id"].as_i64().unwrap_or_default()
}

pub async fn join(app: &Router, player: &str, game_id: i64) -> (StatusCode, Value) {
    post(app, &format!("/game/{game_id}/join"), &player_token(player)).await
}

pub async fn unregister(app: &Router, player: &str, game_id: i64) -> (StatusCode, Value) {
    delete(app, &format!("/game/{game_id}/unregister"), &player_token(player)).await
}

/// Assert the standard failure envelope.
pub fn assert_error(body: &Value, status: StatusCode) {
    assert_eq!(body["success"], false, "{body}");
    assert_eq!(body["code"], status.as_u16(), "{body}");
    assert_eq!(
        body["name"],
        status.canonical_reason().unwrap_or_default(),
        "{body}"
    );
}
