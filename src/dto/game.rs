use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use super::{required, text};
use crate::entities::game::{self, MAX_PLAYERS, MIN_PLAYERS};
use crate::error::AppError;

/// Naive formats accepted for `start_time`; they are read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// ============ Request DTOs ============

/// `POST /game/create` body. Every field is required.
#[derive(Debug, Default, Deserialize)]
pub struct CreateGameRequest {
    pub start_time: Option<String>,
    pub max_players: Option<i32>,
    pub platform: Option<String>,
}

/// `PATCH /game/{game_id}/edit` body. Omitted fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct EditGameRequest {
    pub start_time: Option<String>,
    pub max_players: Option<i32>,
    pub platform: Option<String>,
}

// ============ Validated inputs ============

/// A game ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub start_time: DateTime<FixedOffset>,
    pub max_players: i32,
    pub platform: String,
}

/// Validated partial update of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamePatch {
    pub start_time: Option<DateTime<FixedOffset>>,
    pub max_players: Option<i32>,
    pub platform: Option<String>,
}

impl CreateGameRequest {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] naming the first missing or invalid field.
    pub fn validate(self) -> Result<NewGame, AppError> {
        let start_time = required("start_time", self.start_time)?;
        let max_players = required("max_players", self.max_players)?;
        let platform = required("platform", self.platform)?;

        Ok(NewGame {
            start_time: start_time_field(&start_time)?,
            max_players: max_players_field(max_players)?,
            platform: text("platform", &platform)?,
        })
    }
}

impl EditGameRequest {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for the first provided field with a bad value.
    pub fn validate(self) -> Result<GamePatch, AppError> {
        Ok(GamePatch {
            start_time: self.start_time.as_deref().map(start_time_field).transpose()?,
            max_players: self.max_players.map(max_players_field).transpose()?,
            platform: self
                .platform
                .as_deref()
                .map(|p| text("platform", p))
                .transpose()?,
        })
    }
}

impl GamePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.max_players.is_none() && self.platform.is_none()
    }

    /// Copy the provided fields onto `active`.
    pub fn apply(self, active: &mut game::ActiveModel) {
        if let Some(start_time) = self.start_time {
            active.start_time = Set(start_time);
        }
        if let Some(max_players) = self.max_players {
            active.max_players = Set(max_players);
        }
        if let Some(platform) = self.platform {
            active.platform = Set(platform);
        }
    }
}

/// Parse a start time given as RFC 3339, or as a naive timestamp read as UTC.
///
/// The result is normalized to UTC so that stored values order chronologically.
#[must_use]
pub fn parse_start_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).fixed_offset());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

fn start_time_field(raw: &str) -> Result<DateTime<FixedOffset>, AppError> {
    parse_start_time(raw)
        .ok_or_else(|| AppError::Validation(format!("start_time '{raw}' is not a valid timestamp")))
}

fn max_players_field(max_players: i32) -> Result<i32, AppError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&max_players) {
        Ok(max_players)
    } else {
        Err(AppError::Validation(format!(
            "max_players must be between {MIN_PLAYERS} and {MAX_PLAYERS}"
        )))
    }
}

// ============ Response DTOs ============

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub id: i32,
    pub start_time: String,
    pub platform: String,
    pub max_players: i32,
    pub num_registered: i32,
    pub host_id: String,
}

impl From<game::Model> for GameResponse {
    fn from(game: game::Model) -> Self {
        Self {
            id: game.id,
            start_time: game.start_time.to_rfc3339(),
            platform: game.platform,
            max_players: game.max_players,
            num_registered: game.num_registered,
            host_id: game.host_id,
        }
    }
}
