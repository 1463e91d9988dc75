use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionError,
    TransactionTrait,
};

use crate::error::AppError;

/// Establish a connection to the database with connection pooling.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;
    Ok(db)
}

/// Run `f` inside a single transaction.
///
/// The transaction commits only when `f` returns `Ok`; an `Err` from `f`, a failed commit,
/// or the future being dropped rolls it back.
///
/// # Errors
///
/// Returns the error produced by `f`, or a translated store error if the transaction could
/// not be opened or committed.
pub async fn in_transaction<T, F>(db: &DatabaseConnection, f: F) -> Result<T, AppError>
where
    T: Send,
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'c>>
        + Send,
{
    db.transaction(f).await.map_err(|e| match e {
        TransactionError::Transaction(err) => err,
        TransactionError::Connection(db_err) => AppError::store(db_err),
    })
}
