use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, QueryFilter, QuerySelect, Set, SqlErr,
};

use crate::db::in_transaction;
use crate::dto::{GamePatch, NewGame};
use crate::entities::{game, host, player, registration};
use crate::error::AppError;

/// Game lifecycle and seat bookkeeping.
///
/// `num_registered` only moves together with a registration row, inside one transaction,
/// and never past `max_players`.
pub struct RegistrationService;

impl RegistrationService {
    /// Create a game owned by `host_id` with no seats taken.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the host has not registered, or
    /// [`AppError::InvalidData`] if the store rejects the row.
    pub async fn create_game(
        db: &DatabaseConnection,
        host_id: &str,
        new_game: NewGame,
    ) -> Result<game::Model, AppError> {
        let host_id = host_id.to_string();

        in_transaction(db, move |txn| {
            Box::pin(async move {
                if host::Entity::find_by_id(host_id.as_str())
                    .one(txn)
                    .await?
                    .is_none()
                {
                    return Err(AppError::Validation(
                        "Host must register before creating a game.".to_string(),
                    ));
                }

                let game = game::ActiveModel {
                    start_time: Set(new_game.start_time),
                    max_players: Set(new_game.max_players),
                    num_registered: Set(0),
                    platform: Set(new_game.platform),
                    host_id: Set(host_id),
                    ..Default::default()
                }
                .insert(txn)
                .await
                .map_err(AppError::store)?;

                tracing::info!(game_id = game.id, host_id = %game.host_id, "game created");
                Ok(game)
            })
        })
        .await
    }

    /// Claim a seat in `game_id` for `player_id`.
    ///
    /// Checks run in a fixed order and the first failure wins: game exists, a seat is free,
    /// the player is not already seated.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the game does not exist
    /// - [`AppError::CapacityExceeded`] if every seat is taken
    /// - [`AppError::AlreadyRegistered`] if the player already holds a seat
    /// - [`AppError::Validation`] if the caller has not registered as a player
    pub async fn join_game(
        db: &DatabaseConnection,
        player_id: &str,
        game_id: i32,
    ) -> Result<game::Model, AppError> {
        let player_id = player_id.to_string();

        in_transaction(db, move |txn| {
            Box::pin(async move {
                let game = find_game_for_update(txn, game_id).await?;
                if game.is_full() {
                    return Err(game_full(game_id));
                }

                if find_registration(txn, game_id, &player_id).await?.is_some() {
                    return Err(already_registered(game_id));
                }

                if player::Entity::find_by_id(player_id.as_str())
                    .one(txn)
                    .await?
                    .is_none()
                {
                    return Err(AppError::Validation(
                        "Player must register before joining a game.".to_string(),
                    ));
                }

                claim_seat(txn, game_id).await?;
                insert_registration(txn, game_id, &player_id).await?;

                let game = reload_game(txn, game_id).await?;
                tracing::info!(
                    game_id,
                    player_id = %player_id,
                    num_registered = game.num_registered,
                    "player joined game"
                );
                Ok(game)
            })
        })
        .await
    }

    /// Give up `player_id`'s seat in `game_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the player holds no seat in the game.
    pub async fn unregister_game(
        db: &DatabaseConnection,
        player_id: &str,
        game_id: i32,
    ) -> Result<game::Model, AppError> {
        let player_id = player_id.to_string();

        in_transaction(db, move |txn| {
            Box::pin(async move {
                let removed = registration::Entity::delete_many()
                    .filter(registration::Column::GameId.eq(game_id))
                    .filter(registration::Column::PlayerId.eq(player_id.as_str()))
                    .exec(txn)
                    .await
                    .map_err(AppError::store)?;
                if removed.rows_affected == 0 {
                    return Err(AppError::NotFound(format!(
                        "Player not registered for game {game_id}"
                    )));
                }

                release_seat(txn, game_id).await?;

                let game = reload_game(txn, game_id).await?;
                tracing::info!(
                    game_id,
                    player_id = %player_id,
                    num_registered = game.num_registered,
                    "player left game"
                );
                Ok(game)
            })
        })
        .await
    }

    /// Apply `patch` to a game owned by `host_id`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the game does not exist
    /// - [`AppError::Forbidden`] if `host_id` does not own it
    /// - [`AppError::Validation`] if `max_players` would drop below the seats taken
    pub async fn edit_game(
        db: &DatabaseConnection,
        host_id: &str,
        game_id: i32,
        patch: GamePatch,
    ) -> Result<game::Model, AppError> {
        let host_id = host_id.to_string();

        in_transaction(db, move |txn| {
            Box::pin(async move {
                let game = find_game_for_update(txn, game_id).await?;
                if game.host_id != host_id {
                    return Err(AppError::Forbidden(
                        "Cannot edit someone else's game".to_string(),
                    ));
                }

                if patch
                    .max_players
                    .is_some_and(|max_players| max_players < game.num_registered)
                {
                    return Err(AppError::Validation(format!(
                        "max_players cannot be lower than the {} players already registered",
                        game.num_registered
                    )));
                }

                if patch.is_empty() {
                    return Ok(game);
                }

                let mut active: game::ActiveModel = game.into();
                patch.apply(&mut active);
                let game = active.update(txn).await.map_err(AppError::store)?;

                tracing::info!(game_id, host_id = %host_id, "game edited");
                Ok(game)
            })
        })
        .await
    }

    /// Delete a game owned by `host_id` together with its registrations.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the game does not exist
    /// - [`AppError::Forbidden`] if `host_id` does not own it
    pub async fn delete_game(
        db: &DatabaseConnection,
        host_id: &str,
        game_id: i32,
    ) -> Result<i32, AppError> {
        let host_id = host_id.to_string();

        in_transaction(db, move |txn| {
            Box::pin(async move {
                let game = find_game_for_update(txn, game_id).await?;
                if game.host_id != host_id {
                    return Err(AppError::Forbidden(
                        "Cannot delete someone else's game".to_string(),
                    ));
                }

                let seats = registration::Entity::delete_many()
                    .filter(registration::Column::GameId.eq(game_id))
                    .exec(txn)
                    .await
                    .map_err(AppError::store)?;
                game::Entity::delete_by_id(game_id)
                    .exec(txn)
                    .await
                    .map_err(AppError::store)?;

                tracing::info!(
                    game_id,
                    host_id = %host_id,
                    registrations = seats.rows_affected,
                    "game deleted"
                );
                Ok(game_id)
            })
        })
        .await
    }
}

/// Load a game and hold its row, or the whole database on `SQLite`, until the transaction
/// ends.
///
/// `SQLite` has no row locks and upgrading a read transaction to a write one fails with
/// `SQLITE_BUSY` instead of waiting, so the write lock is taken up front with a no-op update
/// before anything is read.
async fn find_game_for_update(
    txn: &DatabaseTransaction,
    game_id: i32,
) -> Result<game::Model, AppError> {
    let mut query = game::Entity::find_by_id(game_id);
    if txn.get_database_backend() == DbBackend::Sqlite {
        game::Entity::update_many()
            .col_expr(
                game::Column::NumRegistered,
                Expr::col(game::Column::NumRegistered).into(),
            )
            .filter(game::Column::Id.eq(game_id))
            .exec(txn)
            .await
            .map_err(AppError::store)?;
    } else {
        query = query.lock_exclusive();
    }

    query
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Game {game_id} not found.")))
}

/// Take one seat in `game_id`, provided one is still free.
///
/// The free-seat condition is part of the `UPDATE` itself, so a seat can never be claimed
/// past `max_players` even if the caller's earlier read is stale.
///
/// # Errors
///
/// Returns [`AppError::CapacityExceeded`] if no seat was free (or the game is gone).
pub async fn claim_seat<C>(conn: &C, game_id: i32) -> Result<(), AppError>
where
    C: ConnectionTrait,
{
    let claimed = game::Entity::update_many()
        .col_expr(
            game::Column::NumRegistered,
            Expr::col(game::Column::NumRegistered).add(1),
        )
        .filter(game::Column::Id.eq(game_id))
        .filter(Expr::col(game::Column::NumRegistered).lt(Expr::col(game::Column::MaxPlayers)))
        .exec(conn)
        .await
        .map_err(AppError::store)?;

    if claimed.rows_affected == 0 {
        return Err(game_full(game_id));
    }
    Ok(())
}

/// Give back one seat in `game_id`. The count never drops below zero.
///
/// # Errors
///
/// Returns [`AppError::InvalidData`] if the store rejects the update.
pub async fn release_seat<C>(conn: &C, game_id: i32) -> Result<(), AppError>
where
    C: ConnectionTrait,
{
    let released = game::Entity::update_many()
        .col_expr(
            game::Column::NumRegistered,
            Expr::col(game::Column::NumRegistered).sub(1),
        )
        .filter(game::Column::Id.eq(game_id))
        .filter(game::Column::NumRegistered.gt(0))
        .exec(conn)
        .await
        .map_err(AppError::store)?;

    if released.rows_affected == 0 {
        tracing::warn!(game_id, "seat released with num_registered already at zero");
    }
    Ok(())
}

/// Record `player_id`'s seat in `game_id`.
///
/// # Errors
///
/// Returns [`AppError::AlreadyRegistered`] if the pair already exists, or
/// [`AppError::InvalidData`] for any other rejected insert.
pub async fn insert_registration<C>(
    conn: &C,
    game_id: i32,
    player_id: &str,
) -> Result<registration::Model, AppError>
where
    C: ConnectionTrait,
{
    registration::ActiveModel {
        game_id: Set(game_id),
        player_id: Set(player_id.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => already_registered(game_id),
        _ => AppError::store(err),
    })
}

async fn reload_game(txn: &DatabaseTransaction, game_id: i32) -> Result<game::Model, AppError> {
    game::Entity::find_by_id(game_id)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Game {game_id} not found.")))
}

async fn find_registration(
    txn: &DatabaseTransaction,
    game_id: i32,
    player_id: &str,
) -> Result<Option<registration::Model>, AppError> {
    Ok(registration::Entity::find()
        .filter(registration::Column::GameId.eq(game_id))
        .filter(registration::Column::PlayerId.eq(player_id))
        .one(txn)
        .await?)
}

fn game_full(game_id: i32) -> AppError {
    AppError::CapacityExceeded(format!("Game {game_id} is full."))
}

fn already_registered(game_id: i32) -> AppError {
    AppError::AlreadyRegistered(format!("Player already registered for game {game_id}"))
}
