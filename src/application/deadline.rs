//! Deadline wrapper for port calls.

use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::DomainError;

/// Runs `call` under `limit`. An expired deadline becomes a `Timeout` error
/// naming `operation`, never an empty result.
pub async fn bounded<T, F>(operation: &'static str, limit: Duration, call: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "store call exceeded deadline"
            );
            Err(DomainError::timeout(operation))
        }
    }
}
