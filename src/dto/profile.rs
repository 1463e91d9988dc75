use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use super::{required, text};
use crate::entities::{host, player};
use crate::error::AppError;

/// `POST /host/register` and `POST /player/register` body.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// `PATCH /host/edit` and `PATCH /player/edit` body.
#[derive(Debug, Default, Deserialize)]
pub struct EditProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl RegisterProfileRequest {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] naming the first missing or invalid field.
    pub fn validate(self) -> Result<NewProfile, AppError> {
        let name = required("name", self.name)?;
        let email = required("email", self.email)?;
        Ok(NewProfile {
            name: text("name", &name)?,
            email: email_field(&email)?,
        })
    }
}

impl EditProfileRequest {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for the first provided field with a bad value.
    pub fn validate(self) -> Result<ProfilePatch, AppError> {
        Ok(ProfilePatch {
            name: self.name.as_deref().map(|n| text("name", n)).transpose()?,
            email: self.email.as_deref().map(email_field).transpose()?,
        })
    }
}

impl ProfilePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    pub fn apply_to_host(self, active: &mut host::ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(email) = self.email {
            active.email = Set(email);
        }
    }

    pub fn apply_to_player(self, active: &mut player::ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(email) = self.email {
            active.email = Set(email);
        }
    }
}

fn email_field(raw: &str) -> Result<String, AppError> {
    let email = text("email", raw)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::Validation(
            "email must be a valid address".to_string(),
        )),
    }
}

// ============ Response DTOs ============

/// Public view of a host or player.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<host::Model> for ProfileResponse {
    fn from(host: host::Model) -> Self {
        Self {
            id: host.id,
            name: host.name,
            email: host.email,
        }
    }
}

impl From<player::Model> for ProfileResponse {
    fn from(player: player::Model) -> Self {
        Self {
            id: player.id,
            name: player.name,
            email: player.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_email_is_named() {
        let err = RegisterProfileRequest {
            name: Some("host person".to_string()),
            email: None,
        }
        .validate()
        .err();
        assert!(matches!(err, Some(AppError::Validation(msg)) if msg == "email required"));
    }

    #[test]
    fn test_email_shape() {
        let err = RegisterProfileRequest {
            name: Some("a".to_string()),
            email: Some("nope".to_string()),
        }
        .validate();
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_patch() {
        let patch = EditProfileRequest::default().validate().unwrap_or_default();
        assert!(patch.is_empty());
    }
}
