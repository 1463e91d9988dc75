pub mod game;
pub mod listing;
pub mod profile;

pub use game::{CreateGameRequest, EditGameRequest, GamePatch, GameResponse, NewGame};
pub use listing::{ListGamesQuery, Page};
pub use profile::{EditProfileRequest, NewProfile, ProfilePatch, ProfileResponse, RegisterProfileRequest};

use crate::error::AppError;

/// Longest `name` / `email` / `platform` the schema stores.
pub const MAX_TEXT_LEN: usize = 50;

/// Require a field that the client may have omitted or sent as `null`.
pub(crate) fn required<T>(field: &str, value: Option<T>) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("{field} required")))
}

/// Trim a text field and check it fits the column.
pub(crate) fn text(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::Validation(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(value.to_string())
}
