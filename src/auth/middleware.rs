use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use crate::auth::{AuthError, Caller, Permission, TokenVerifier};
use crate::error::AppError;
use crate::state::AppState;

/// Marker types naming the permission an endpoint requires.
pub mod perm {
    use crate::auth::Permission;

    /// Binds a marker type to the permission it stands for.
    pub trait Required {
        const PERMISSION: Permission;
    }

    #[derive(Debug)]
    pub struct CreateGame;
    #[derive(Debug)]
    pub struct JoinGame;
    #[derive(Debug)]
    pub struct EditGame;
    #[derive(Debug)]
    pub struct DeleteGame;

    impl Required for CreateGame {
        const PERMISSION: Permission = Permission::CreateGame;
    }
    impl Required for JoinGame {
        const PERMISSION: Permission = Permission::JoinGame;
    }
    impl Required for EditGame {
        const PERMISSION: Permission = Permission::EditGame;
    }
    impl Required for DeleteGame {
        const PERMISSION: Permission = Permission::DeleteGame;
    }
}

/// Caller authorized for permission `P`, extracted from `Authorization: Bearer <token>`.
///
/// Runs before the handler body; the handler receives the caller explicitly:
/// ```ignore
/// async fn handler(auth: Authorized<perm::JoinGame>) -> impl IntoResponse {
///     let player_id = auth.caller.id;
/// }
/// ```
#[derive(Debug)]
pub struct Authorized<P> {
    pub caller: Caller,
    _permission: PhantomData<P>,
}

impl<P> FromRequestParts<AppState> for Authorized<P>
where
    P: perm::Required + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = authorize(P::PERMISSION, &parts.headers, state.verifier.as_ref())
            .map_err(|err| {
                tracing::debug!(code = err.code, permission = %P::PERMISSION, "request rejected by guard");
                AppError::Unauthorized(err)
            })?;

        Ok(Self {
            caller,
            _permission: PhantomData,
        })
    }
}

/// Resolve the caller behind a request and require `permission`.
///
/// # Errors
///
/// Returns an [`AuthError`] if the header is missing or malformed, the token fails
/// verification, or the permission was not granted.
pub fn authorize(
    permission: Permission,
    headers: &HeaderMap,
    verifier: &dyn TokenVerifier,
) -> Result<Caller, AuthError> {
    let token = bearer_token(headers)?;
    let caller = verifier.verify(token)?;

    if !caller.has(permission) {
        return Err(AuthError::new("unauthorized", "Permission not found."));
    }

    Ok(caller)
}

/// Extract the raw token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AuthError::new(
                "authorization_header_missing",
                "Authorization header is expected.",
            )
        })?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::new(
            "invalid_header",
            "Authorization header must be bearer token.",
        )),
    }
}
