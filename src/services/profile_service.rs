use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set, SqlErr};

use crate::dto::{NewProfile, ProfilePatch};
use crate::entities::{host, player};
use crate::error::AppError;

/// Self-registration and profile edits for hosts and players.
///
/// Both are keyed by the identity-provider subject of the caller.
pub struct ProfileService;

impl ProfileService {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the caller is already registered as a host.
    pub async fn register_host(
        db: &DatabaseConnection,
        host_id: &str,
        profile: NewProfile,
    ) -> Result<host::Model, AppError> {
        if host::Entity::find_by_id(host_id).one(db).await?.is_some() {
            return Err(host_conflict());
        }

        let host = host::ActiveModel {
            id: Set(host_id.to_string()),
            name: Set(profile.name),
            email: Set(profile.email),
        }
        .insert(db)
        .await
        .map_err(|err| duplicate_or_store(err, host_conflict))?;

        tracing::info!(host_id = %host.id, "host registered");
        Ok(host)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the caller has not registered as a host.
    pub async fn edit_host(
        db: &DatabaseConnection,
        host_id: &str,
        patch: ProfilePatch,
    ) -> Result<host::Model, AppError> {
        let host = host::Entity::find_by_id(host_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Host must register before creating a game.".to_string())
            })?;

        if patch.is_empty() {
            return Ok(host);
        }

        let mut active: host::ActiveModel = host.into();
        patch.apply_to_host(&mut active);
        let host = active.update(db).await.map_err(AppError::store)?;

        tracing::info!(host_id = %host.id, "host edited");
        Ok(host)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the caller is already registered as a player.
    pub async fn register_player(
        db: &DatabaseConnection,
        player_id: &str,
        profile: NewProfile,
    ) -> Result<player::Model, AppError> {
        if player::Entity::find_by_id(player_id).one(db).await?.is_some() {
            return Err(player_conflict());
        }

        let player = player::ActiveModel {
            id: Set(player_id.to_string()),
            name: Set(profile.name),
            email: Set(profile.email),
        }
        .insert(db)
        .await
        .map_err(|err| duplicate_or_store(err, player_conflict))?;

        tracing::info!(player_id = %player.id, "player registered");
        Ok(player)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the caller has not registered as a player.
    pub async fn edit_player(
        db: &DatabaseConnection,
        player_id: &str,
        patch: ProfilePatch,
    ) -> Result<player::Model, AppError> {
        let player = player::Entity::find_by_id(player_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Player must register first.".to_string()))?;

        if patch.is_empty() {
            return Ok(player);
        }

        let mut active: player::ActiveModel = player.into();
        patch.apply_to_player(&mut active);
        let player = active.update(db).await.map_err(AppError::store)?;

        tracing::info!(player_id = %player.id, "player edited");
        Ok(player)
    }
}

/// Two first calls racing past the existence check meet at the primary key.
fn duplicate_or_store(err: DbErr, conflict: fn() -> AppError) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict(),
        _ => AppError::store(err),
    }
}

fn host_conflict() -> AppError {
    AppError::Conflict("Host already registered.".to_string())
}

fn player_conflict() -> AppError {
    AppError::Conflict("Player already registered.".to_string())
}
