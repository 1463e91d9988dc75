//! Schema-level guarantees that hold even when writes bypass the services.

mod common;

use chrono::{FixedOffset, TimeZone};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};

use lfg_api::entities::{game, host, player, registration};

async fn insert_host(db: &DatabaseConnection, id: &str) -> Result<host::Model, DbErr> {
    host::ActiveModel {
        id: Set(id.to_string()),
        name: Set(format!("host {id}")),
        email: Set(format!("{id}@host.test")),
    }
    .insert(db)
    .await
}

async fn insert_player(db: &DatabaseConnection, id: &str) -> Result<player::Model, DbErr> {
    player::ActiveModel {
        id: Set(id.to_string()),
        name: Set(format!("player {id}")),
        email: Set(format!("{id}@player.test")),
    }
    .insert(db)
    .await
}

async fn insert_game(
    db: &DatabaseConnection,
    host_id: &str,
    max_players: i32,
    num_registered: i32,
) -> Result<game::Model, DbErr> {
    let start_time = FixedOffset::east_opt(0)
        .and_then(|utc| utc.with_ymd_and_hms(2026, 7, 1, 18, 0, 0).single())
        .unwrap_or_default();

    game::ActiveModel {
        start_time: Set(start_time),
        max_players: Set(max_players),
        num_registered: Set(num_registered),
        platform: Set("PokerStars".to_string()),
        host_id: Set(host_id.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

async fn insert_registration(
    db: &DatabaseConnection,
    game_id: i32,
    player_id: &str,
) -> Result<registration::Model, DbErr> {
    registration::ActiveModel {
        game_id: Set(game_id),
        player_id: Set(player_id.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

async fn registrations_for(db: &DatabaseConnection, game_id: i32) -> u64 {
    registration::Entity::find()
        .filter(registration::Column::GameId.eq(game_id))
        .count(db)
        .await
        .unwrap_or_default()
}

#[tokio::test]
async fn table_size_outside_bounds_is_rejected() {
    let state = common::test_state().await;
    assert!(insert_host(&state.db, "auth0|h").await.is_ok());

    assert!(insert_game(&state.db, "auth0|h", 10, 0).await.is_err());
    assert!(insert_game(&state.db, "auth0|h", 1, 0).await.is_err());
    assert!(insert_game(&state.db, "auth0|h", 9, 0).await.is_ok());
}

#[tokio::test]
async fn seats_cannot_exceed_table_size() {
    let state = common::test_state().await;
    assert!(insert_host(&state.db, "auth0|h").await.is_ok());

    assert!(insert_game(&state.db, "auth0|h", 3, 4).await.is_err());
    assert!(insert_game(&state.db, "auth0|h", 3, -1).await.is_err());

    let game = insert_game(&state.db, "auth0|h", 3, 3).await;
    assert!(game.is_ok());

    // Raising the count past the table size through a raw update is refused as well.
    let overfilled = game.map(|game| {
        let mut active: game::ActiveModel = game.into();
        active.num_registered = Set(4);
        active
    });
    if let Ok(active) = overfilled {
        assert!(active.update(&state.db).await.is_err());
    }
}

#[tokio::test]
async fn game_requires_existing_host() {
    let state = common::test_state().await;

    assert!(insert_game(&state.db, "auth0|nobody", 4, 0).await.is_err());
}

#[tokio::test]
async fn duplicate_registration_is_a_unique_violation() {
    let state = common::test_state().await;
    assert!(insert_host(&state.db, "auth0|h").await.is_ok());
    assert!(insert_player(&state.db, "auth0|p").await.is_ok());
    let game_id = insert_game(&state.db, "auth0|h", 4, 0)
        .await
        .map(|game| game.id)
        .unwrap_or_default();

    assert!(insert_registration(&state.db, game_id, "auth0|p").await.is_ok());

    let duplicate = insert_registration(&state.db, game_id, "auth0|p").await;
    assert!(matches!(
        duplicate.as_ref().err().and_then(DbErr::sql_err),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn deleting_a_host_removes_games_and_registrations() {
    let state = common::test_state().await;
    assert!(insert_host(&state.db, "auth0|h").await.is_ok());
    assert!(insert_player(&state.db, "auth0|p").await.is_ok());
    let game_id = insert_game(&state.db, "auth0|h", 4, 1)
        .await
        .map(|game| game.id)
        .unwrap_or_default();
    assert!(insert_registration(&state.db, game_id, "auth0|p").await.is_ok());

    assert!(
        host::Entity::delete_by_id("auth0|h")
            .exec(&state.db)
            .await
            .is_ok()
    );

    let remaining = game::Entity::find_by_id(game_id)
        .one(&state.db)
        .await
        .unwrap_or_default();
    assert!(remaining.is_none());
    assert_eq!(registrations_for(&state.db, game_id).await, 0);

    let player = player::Entity::find_by_id("auth0|p")
        .one(&state.db)
        .await
        .unwrap_or_default();
    assert!(player.is_some());
}

#[tokio::test]
async fn deleting_a_player_removes_their_registrations() {
    let state = common::test_state().await;
    assert!(insert_host(&state.db, "auth0|h").await.is_ok());
    assert!(insert_player(&state.db, "auth0|p").await.is_ok());
    let game_id = insert_game(&state.db, "auth0|h", 4, 1)
        .await
        .map(|game| game.id)
        .unwrap_or_default();
    assert!(insert_registration(&state.db, game_id, "auth0|p").await.is_ok());

    assert!(
        player::Entity::delete_by_id("auth0|p")
            .exec(&state.db)
            .await
            .is_ok()
    );

    assert_eq!(registrations_for(&state.db, game_id).await, 0);
    let game = game::Entity::find_by_id(game_id)
        .one(&state.db)
        .await
        .unwrap_or_default();
    assert!(game.is_some());
}
