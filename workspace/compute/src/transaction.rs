//! Unit-of-work helper shared by every multi-step operation.

use sea_orm::DatabaseTransaction;
use tracing::{debug, error};

use crate::error::Result;

/// Commits `txn` when `result` is `Ok`, otherwise rolls it back before returning the error.
///
/// Operations run their steps against the transaction and hand the outcome here,
/// so a failure in any step leaves no partial state behind.
pub(crate) async fn commit_or_rollback<T>(txn: DatabaseTransaction, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            debug!("Rolling back transaction: {}", err);
            if let Err(rollback_err) = txn.rollback().await {
                error!("Failed to roll back transaction: {}", rollback_err);
            }
            Err(err)
        }
    }
}
