use std::fmt;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthError, Caller, TokenVerifier};
use crate::config::Config;

/// Claims carried by identity-provider access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the host / player id.
    pub sub: String,
    /// Granted permissions such as `"join:game"`. Absent on tokens without RBAC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
    /// Audience: a string or an array of strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// HS256 verifier for bearer tokens.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    #[must_use]
    pub fn new(secret: &str, audience: Option<&str>, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            config.jwt_audience.as_deref(),
            config.jwt_issuer.as_deref(),
        )
    }
}

impl fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, raw_token: &str) -> Result<Caller, AuthError> {
        let token_data =
            decode::<Claims>(raw_token, &self.key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        AuthError::new("token_expired", "Token expired.")
                    }
                    ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::new(
                        "invalid_claims",
                        "Incorrect claims. Please, check the audience and issuer.",
                    ),
                    _ => AuthError::new("invalid_token", "Unable to parse authentication token."),
                }
            })?;

        let claims = token_data.claims;
        let permissions = claims.permissions.ok_or_else(|| {
            AuthError::new("invalid_claims", "Permissions not included in JWT.")
        })?;

        Ok(Caller {
            id: claims.sub,
            permissions,
        })
    }
}

/// Sign an access token the way the identity provider would.
///
/// Used by local tooling and tests; production tokens come from the identity provider.
///
/// # Errors
///
/// Returns an error if JWT encoding fails.
pub fn issue_token(
    config: &Config,
    subject: &str,
    permissions: &[&str],
    ttl_secs: i64,
) -> anyhow::Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: subject.to_string(),
        permissions: Some(permissions.iter().map(ToString::to_string).collect()),
        exp: now + ttl_secs,
        iat: now,
        aud: config
            .jwt_audience
            .as_ref()
            .map(|aud| serde_json::Value::String(aud.clone())),
        iss: config.jwt_issuer.clone(),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| anyhow::anyhow!("Failed to encode access token: {e}"))
}
