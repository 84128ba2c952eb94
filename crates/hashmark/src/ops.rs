//! Helpers shared by the services for calling the ledger.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use hashmark_store::StoreError;

/// Bound a ledger call by `deadline`, turning expiry into [`StoreError::Timeout`].
pub(crate) async fn with_deadline<T, F>(deadline: Duration, call: F) -> hashmark_store::Result<T>
where
    F: Future<Output = hashmark_store::Result<T>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(
            u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}

/// Run-and-forget: log a failure at `warn` and carry on without the value.
pub(crate) fn best_effort<T, E: Display>(operation: &'static str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(operation, error = %e, "best-effort operation failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_passes_result_through() {
        let ok = with_deadline(Duration::from_secs(1), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expires() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, StoreError>(())
        };
        let result = with_deadline(Duration::from_millis(250), slow).await;
        assert!(matches!(result, Err(StoreError::Timeout(250))));
    }

    #[test]
    fn test_best_effort_swallows() {
        assert_eq!(best_effort("ok", Ok::<_, String>(1)), Some(1));
        assert_eq!(best_effort("fail", Err::<u8, _>("boom")), None);
    }
}
