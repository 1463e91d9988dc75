use sea_orm::{
    DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, QuerySelect,
};

use crate::dto::Page;
use crate::entities::{game, player};
use crate::error::AppError;

/// Read-only views over games and their players.
pub struct ListingService;

impl ListingService {
    /// Games ordered by start time (ties broken by id), one page at a time.
    ///
    /// The first page is always answered, even when there are no games.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the page starts past the last game.
    pub async fn list_games(
        db: &DatabaseConnection,
        page: Page,
    ) -> Result<Vec<game::Model>, AppError> {
        let total = game::Entity::find().count(db).await?;
        let offset = page
            .offset()
            .filter(|&offset| offset == 0 || offset < total)
            .ok_or_else(|| {
                AppError::NotFound(format!("Page number {} is out of bounds", page.number))
            })?;

        let games = game::Entity::find()
            .order_by_asc(game::Column::StartTime)
            .order_by_asc(game::Column::Id)
            .offset(offset)
            .limit(page.length)
            .all(db)
            .await?;

        Ok(games)
    }

    /// Players holding a seat in `game_id`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the game does not exist.
    pub async fn players_for_game(
        db: &DatabaseConnection,
        game_id: i32,
    ) -> Result<Vec<player::Model>, AppError> {
        let game = game::Entity::find_by_id(game_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game id {game_id} not found.")))?;

        let players = game
            .find_related(player::Entity)
            .order_by_asc(player::Column::Name)
            .order_by_asc(player::Column::Id)
            .all(db)
            .await?;

        Ok(players)
    }
}
