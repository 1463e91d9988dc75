use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use serde_json::json;

use crate::auth::AuthError;

/// Unified application error type that maps to JSON HTTP responses.
///
/// Every failure is rendered as `{ "success": false, "code": <status>, "description": "...",
/// "name": "<reason phrase>" }`; authentication failures also carry `"error": "<auth code>"`.
#[derive(Debug)]
pub enum AppError {
    /// 422 Unprocessable Entity (missing or malformed field)
    Validation(String),
    /// 401 Unauthorized
    Unauthorized(AuthError),
    /// 403 Forbidden (authenticated, but not the owner)
    Forbidden(String),
    /// 404 Not Found
    NotFound(String),
    /// 403 Forbidden (identity already registered)
    Conflict(String),
    /// 422 Unprocessable Entity (player already holds a seat in the game)
    AlreadyRegistered(String),
    /// 422 Unprocessable Entity (no free seat left)
    CapacityExceeded(String),
    /// 422 Unprocessable Entity (the store rejected a write; the cause is logged, not returned)
    InvalidData,
    /// 500 Internal Server Error (wraps any error, logs details, returns generic message)
    Internal(anyhow::Error),
}

impl AppError {
    /// Translate a store failure raised while writing.
    ///
    /// Constraint and statement failures become [`AppError::InvalidData`]; losing the
    /// connection itself is an internal error.
    #[must_use]
    pub fn store(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::Internal(err.into()),
            other => {
                tracing::warn!(error = %other, "store rejected write, transaction rolled back");
                Self::InvalidData
            }
        }
    }

    /// HTTP status this error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::AlreadyRegistered(_)
            | Self::CapacityExceeded(_)
            | Self::InvalidData => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::Conflict(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::Unauthorized(err) => write!(f, "unauthorized ({}): {}", err.code, err.description),
            Self::Forbidden(msg) => write!(f, "forbidden: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Conflict(msg) => write!(f, "conflict: {msg}"),
            Self::AlreadyRegistered(msg) => write!(f, "already registered: {msg}"),
            Self::CapacityExceeded(msg) => write!(f, "capacity exceeded: {msg}"),
            Self::InvalidData => write!(f, "invalid data"),
            Self::Internal(err) => write!(f, "internal error: {err:#}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let name = status.canonical_reason().unwrap_or("Error");

        let (description, auth_code) = match self {
            Self::Validation(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::AlreadyRegistered(msg)
            | Self::CapacityExceeded(msg) => (msg, None),
            Self::Unauthorized(err) => (err.description, Some(err.code)),
            Self::InvalidData => ("Invalid data".to_string(), None),
            Self::Internal(err) => {
                tracing::error!("Internal server error: {err:#}");
                ("An internal error occurred".to_string(), None)
            }
        };

        let mut body = json!({
            "success": false,
            "code": status.as_u16(),
            "description": description,
            "name": name,
        });
        if let Some(code) = auth_code {
            body["error"] = json!(code);
        }

        (status, Json(body)).into_response()
    }
}

/// Allow `?` to automatically convert any `anyhow::Error` into `AppError::Internal`.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(
            AppError::CapacityExceeded(String::new()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::Conflict(String::new()).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound(String::new()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidData.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_store_errors_hide_cause() {
        let err = AppError::store(DbErr::Custom("CHECK constraint failed".to_string()));
        assert!(matches!(err, AppError::InvalidData));
    }
}
