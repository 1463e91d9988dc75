use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::TokenVerifier;
use crate::auth::jwt::JwtVerifier;
use crate::config::Config;

/// Shared application state available to all request handlers via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Build state with the HS256 verifier configured from `config`.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let verifier = Arc::new(JwtVerifier::from_config(&config));
        Self {
            db,
            config,
            verifier,
        }
    }
}
