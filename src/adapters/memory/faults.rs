//! Fault injection shared by the in-memory adapters.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::domain::foundation::DomainError;

/// Injected failure and latency applied before an adapter call runs.
#[derive(Debug, Default)]
pub struct Faults {
    failure: Mutex<Option<DomainError>>,
    latency: Mutex<Option<Duration>>,
}

impl Faults {
    /// Every subsequent call fails with `error` until cleared.
    pub fn fail_with(&self, error: DomainError) {
        *lock(&self.failure) = Some(error);
    }

    /// Every subsequent call sleeps for `latency` before running.
    pub fn delay(&self, latency: Duration) {
        *lock(&self.latency) = Some(latency);
    }

    pub fn clear(&self) {
        *lock(&self.failure) = None;
        *lock(&self.latency) = None;
    }

    pub async fn apply(&self) -> Result<(), DomainError> {
        let latency = *lock(&self.latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match lock(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Lock that survives a panicked holder; test adapters keep serving.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
