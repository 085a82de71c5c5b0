//! Timeout enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - The deadline wraps the downstream call, not the breaker
//! - An expired deadline is an infrastructure failure (`ServiceError::Timeout`)

use std::future::Future;
use std::time::Duration;

use crate::service::ServiceError;

/// Run `call` with a deadline.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let result = with_deadline(Duration::from_millis(200), async { Ok::<_, ServiceError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let deadline = Duration::from_millis(20);
        let result = with_deadline(deadline, async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, ServiceError>(())
        })
        .await;
        assert!(matches!(result, Err(ServiceError::Timeout(d)) if d == deadline));
    }
}
