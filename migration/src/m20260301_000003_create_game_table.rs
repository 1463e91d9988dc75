use sea_orm_migration::prelude::*;

/// Creates the `game` table.
///
/// Capacity is enforced in the schema as well as in the engine:
/// `2 <= max_players <= 9` and `0 <= num_registered <= max_players`.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
    StartTime,
    MaxPlayers,
    NumRegistered,
    Platform,
    HostId,
}

#[derive(DeriveIden)]
enum Host {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Game::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Game::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Game::MaxPlayers)
                            .integer()
                            .not_null()
                            .check(Expr::col(Game::MaxPlayers).between(2, 9)),
                    )
                    .col(
                        ColumnDef::new(Game::NumRegistered)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Game::NumRegistered).gte(0)),
                    )
                    .col(ColumnDef::new(Game::Platform).string_len(50).not_null())
                    .col(ColumnDef::new(Game::HostId).string_len(255).not_null())
                    .check(Expr::col(Game::NumRegistered).lte(Expr::col(Game::MaxPlayers)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_host_id")
                            .from(Game::Table, Game::HostId)
                            .to(Host::Table, Host::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_start_time")
                    .table(Game::Table)
                    .col(Game::StartTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Game::Table).to_owned())
            .await
    }
}
