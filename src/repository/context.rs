use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::GameError;

/// Caller-supplied deadline and cancellation for one service operation.
///
/// Every repository call runs under [`CallContext::run`]. When the deadline
/// passes or the token fires, the in-flight future is dropped; an open
/// transaction is rolled back on drop, so nothing partial is committed.
#[derive(Debug, Clone)]
pub struct CallContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl CallContext {
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, CancellationToken::new())
    }

    #[must_use]
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            cancel,
        }
    }

    /// Race `operation` against the deadline and the cancellation token.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Cancelled`] or [`GameError::Timeout`] (tagged with `label`)
    /// when the call is cut short, otherwise whatever `operation` returns.
    pub async fn run<T, F>(&self, label: &'static str, operation: F) -> Result<T, GameError>
    where
        F: Future<Output = Result<T, GameError>>,
    {
        if Instant::now() >= self.deadline {
            tracing::warn!(operation = label, "deadline passed before call");
            return Err(GameError::Timeout(label));
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                tracing::debug!(operation = label, "call cancelled");
                Err(GameError::Cancelled(label))
            }
            outcome = tokio::time::timeout_at(self.deadline, operation) => {
                outcome.unwrap_or_else(|_| {
                    tracing::warn!(operation = label, "call exceeded deadline");
                    Err(GameError::Timeout(label))
                })
            }
        }
    }
}
