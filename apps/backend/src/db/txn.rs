use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::warn;

use super::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::trace_ctx;

/// Boxed future borrowing the transaction for the duration of the closure.
pub type TxnFuture<'a, R> = Pin<Box<dyn Future<Output = Result<R, AppError>> + 'a>>;

/// A transaction injected into request extensions; `with_txn` runs inside it
/// and leaves commit/rollback to whoever created it.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }
}

/// Execute `f` within one database transaction.
///
/// 1) If a `SharedTxn` is in request extensions, use it (no commit/rollback here)
/// 2) Otherwise begin a transaction, run the closure, commit on Ok and roll back on Err
///
/// Dropping the returned future before it completes drops the open
/// transaction, which rolls it back.
pub async fn with_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, R>,
{
    // Clone out of extensions before awaiting so no RefCell borrow is held.
    let shared_txn: Option<SharedTxn> = req.and_then(|r| r.extensions().get::<SharedTxn>().cloned());

    if let Some(shared) = shared_txn {
        return f(shared.transaction()).await;
    }

    let txn = require_db(state)?.begin().await?;

    match f(&txn).await {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve the original error
            if let Err(rollback_err) = txn.rollback().await {
                warn!(
                    trace_id = %trace_ctx::trace_id(),
                    error = %rollback_err,
                    "rollback failed"
                );
            }
            Err(err)
        }
    }
}
