//! Ingress guard: turns a bearer token into a verified [`Caller`] and checks the
//! permission an endpoint requires. Nothing here touches the database; ownership of
//! games is decided by the registration engine.

pub mod jwt;
pub mod middleware;

use std::fmt;

/// Permissions granted by the identity provider and required by endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    CreateGame,
    JoinGame,
    EditGame,
    DeleteGame,
}

impl Permission {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateGame => "create:game",
            Self::JoinGame => "join:game",
            Self::EditGame => "edit:game",
            Self::DeleteGame => "delete:game",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication failure, always reported with HTTP 401.
///
/// `code` is a stable machine-readable reason (`token_expired`, `invalid_header`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub code: &'static str,
    pub description: String,
}

impl AuthError {
    #[must_use]
    pub fn new(code: &'static str, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

/// Verified identity of the caller: the token subject and its granted permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: String,
    pub permissions: Vec<String>,
}

impl Caller {
    #[must_use]
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.iter().any(|p| p == permission.as_str())
    }
}

/// Token verification collaborator.
///
/// Implementations check signature, expiry and audience of a raw bearer token and
/// return the subject with its permissions.
pub trait TokenVerifier: Send + Sync + fmt::Debug {
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the token is malformed, expired, or carries
    /// unexpected claims.
    fn verify(&self, raw_token: &str) -> Result<Caller, AuthError>;
}
