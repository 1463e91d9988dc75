use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Smallest and largest table size a game may be created with.
pub const MIN_PLAYERS: i32 = 2;
pub const MAX_PLAYERS: i32 = 9;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub start_time: DateTimeWithTimeZone,
    pub max_players: i32,
    pub num_registered: i32,
    pub platform: String,
    pub host_id: String,
}

impl Model {
    /// Whether every seat has been claimed.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.num_registered >= self.max_players
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::host::Entity",
        from = "Column::HostId",
        to = "super::host::Column::Id",
        on_delete = "Cascade"
    )]
    Host,
    #[sea_orm(has_many = "super::registration::Entity")]
    Registrations,
}

impl Related<super::host::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Host.def()
    }
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        super::registration::Relation::Player.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::registration::Relation::Game.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
