/*!
 * Transaction helper
 *
 * Runs a closure inside a database transaction, committing on `Ok` and
 * rolling back on `Err` while keeping the caller's error type intact.
 */

use futures::future::BoxFuture;
use metrics::counter;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionError, TransactionTrait};
use tracing::warn;

/// Execute a function within a database transaction
///
/// ```rust,ignore
/// let receipt = with_transaction(&db, |txn| {
///     Box::pin(async move {
///         let location = resolve_tray(txn, "TRAY001").await?;
///         insert_device(txn, &entry, location).await?;
///         Ok(location)
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<F, T, E>(db: &DatabaseConnection, f: F) -> Result<T, E>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> BoxFuture<'a, Result<T, E>> + Send,
    T: Send,
    E: From<DbErr> + std::error::Error + Send,
{
    let result = db.transaction(f).await;
    if result.is_err() {
        counter!("intake_db.transaction.rolled_back", 1);
        warn!("Transaction rolled back");
    }
    result.map_err(|e| match e {
        TransactionError::Connection(db_err) => E::from(db_err),
        TransactionError::Transaction(err) => err,
    })
}
