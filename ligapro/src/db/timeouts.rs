//! Database timeout helpers
//!
//! Bounds how long a league transaction may hold its row lock.

use std::time::Duration;
use tokio::time::timeout;

/// Default timeout for single queries (5 seconds)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for a read-compute-write transaction (10 seconds)
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// A database operation did not finish in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Database operation timed out after {0:?}")]
pub struct TimedOut(pub Duration);

/// Run `future`, failing with [`TimedOut`] after `duration`.
///
/// Dropping a timed-out sqlx transaction rolls it back.
pub async fn with_timeout<F, T, E>(duration: Duration, future: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
    E: From<TimedOut>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(TimedOut(duration).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_constants() {
        assert_eq!(DEFAULT_QUERY_TIMEOUT.as_secs(), 5);
        assert_eq!(DEFAULT_TRANSACTION_TIMEOUT.as_secs(), 10);
    }

    #[tokio::test]
    async fn test_slow_future_times_out() {
        let result: Result<(), TimedOut> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(TimedOut(Duration::from_millis(10))));
    }

    #[tokio::test]
    async fn test_timeout_error_display() {
        let err = TimedOut(Duration::from_secs(5));
        assert!(err.to_string().contains("timed out"));
        assert!(err.to_string().contains("5s"));
    }
}
