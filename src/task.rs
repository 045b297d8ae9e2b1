//! Cancelable wrapper around an in-flight asynchronous operation.
//!
//! A view that tears down before its fetch settles must never observe the
//! result. `CancelableTask` suppresses observation without aborting the
//! underlying operation: the request keeps running to completion on the
//! runtime, but once `cancel` has been called the awaiter only ever sees
//! [`PeonyAdminError::Canceled`].

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{PeonyAdminError, Result};

/// Handle over a pending asynchronous operation whose resolution can be
/// suppressed on demand.
pub struct CancelableTask<T> {
    handle: JoinHandle<Result<T>>,
    token: CancellationToken,
}

impl<T: Send + 'static> CancelableTask<T> {
    /// Spawn `operation` on the tokio runtime and return a cancelable handle
    /// over its eventual outcome.
    pub fn spawn<F>(operation: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(operation);
        Self { handle, token }
    }

    /// Suppress observation of the outcome. Idempotent. The underlying
    /// operation is not aborted; only the awaiter's view of it changes.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check whether `cancel` has been called.
    pub fn is_canceled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A clone of the cancellation token, for owners that need to cancel
    /// after the task itself has been handed to an awaiter.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Await the operation's outcome.
    ///
    /// Yields the operation's own `Ok`/`Err` unchanged unless `cancel` was
    /// invoked before the outcome was observed; then yields
    /// [`PeonyAdminError::Canceled`] regardless of how the operation settled.
    /// A cancel that races with consumption may lose: whichever happens
    /// first determines what the caller sees.
    pub async fn outcome(self) -> Result<T> {
        let Self { handle, token } = self;

        tokio::select! {
            _ = token.cancelled() => Err(PeonyAdminError::Canceled),
            settled = handle => {
                // Cancel-after-settle still wins as long as the outcome has
                // not been handed to the caller yet.
                if token.is_cancelled() {
                    return Err(PeonyAdminError::Canceled);
                }
                match settled {
                    Ok(result) => result,
                    Err(join_error) => Err(PeonyAdminError::general(format!(
                        "task failed to complete: {}",
                        join_error
                    ))),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_outcome_without_cancel_is_unchanged() {
        let task = CancelableTask::spawn(async { Ok(42) });
        assert_eq!(task.outcome().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_failure_without_cancel_propagates() {
        let task: CancelableTask<u32> =
            CancelableTask::spawn(async { Err(PeonyAdminError::general("boom")) });
        let error = task.outcome().await.unwrap_err();
        assert!(error.to_string().contains("boom"));
        assert!(!error.is_canceled());
    }

    #[tokio::test]
    async fn test_cancel_before_settle_yields_canceled() {
        let (tx, rx) = oneshot::channel::<()>();
        let task = CancelableTask::spawn(async move {
            let _ = rx.await;
            Ok(7)
        });

        task.cancel();
        let token = task.cancellation_token();
        let outcome = task.outcome().await;
        assert!(outcome.unwrap_err().is_canceled());
        assert!(token.is_cancelled());

        // Unblock the operation; it runs to completion unobserved.
        let _ = tx.send(());
    }

    #[tokio::test]
    async fn test_cancel_after_settle_before_observation_yields_canceled() {
        let task = CancelableTask::spawn(async { Ok("done") });

        // Let the spawned operation settle before canceling.
        tokio::time::sleep(Duration::from_millis(20)).await;
        task.cancel();

        assert!(task.outcome().await.unwrap_err().is_canceled());
    }

    #[tokio::test]
    async fn test_cancel_suppresses_failure_too() {
        let task: CancelableTask<u32> =
            CancelableTask::spawn(async { Err(PeonyAdminError::general("original failure")) });
        task.cancel();
        assert!(task.outcome().await.unwrap_err().is_canceled());
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let task = CancelableTask::spawn(async { Ok(1) });
        task.cancel();
        task.cancel();
        assert!(task.is_canceled());
        assert!(task.outcome().await.unwrap_err().is_canceled());
    }

    #[tokio::test]
    async fn test_underlying_operation_is_not_aborted() {
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();
        let (tx, rx) = oneshot::channel::<()>();

        let task = CancelableTask::spawn(async move {
            let _ = rx.await;
            ran_clone.store(true, Ordering::SeqCst);
            Ok(())
        });

        task.cancel();
        assert!(task.outcome().await.unwrap_err().is_canceled());

        // The operation still runs once unblocked.
        let _ = tx.send(());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_via_cloned_token() {
        let (_tx, rx) = oneshot::channel::<()>();
        let task = CancelableTask::spawn(async move {
            let _ = rx.await;
            Ok(0)
        });

        let token = task.cancellation_token();
        token.cancel();
        assert!(task.outcome().await.unwrap_err().is_canceled());
    }
}
