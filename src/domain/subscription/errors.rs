//! Subscription-specific error types.
//!
//! | Error | Meaning |
//! |-------|---------|
//! | PlanNotFound | plan code confirmed absent from the catalog |
//! | SubscriptionNotFound | tenant confirmed to have no active subscription |
//! | InvalidPlanCode / Validation | caller input rejected |
//! | InvalidState | lifecycle transition not allowed |
//! | BackendUnavailable / Timeout | store failed; retryable, never a fallback trigger |
//! | ConcurrencyConflict | conditional write lost a race; retry once |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, TenantId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("plan '{0}' not found")]
    PlanNotFound(String),

    #[error("no active subscription for tenant {0}")]
    SubscriptionNotFound(TenantId),

    #[error("invalid plan code '{code}': {reason}")]
    InvalidPlanCode { code: String, reason: String },

    #[error("validation failed on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("cannot {attempted} a subscription in state {current}")]
    InvalidState { current: String, attempted: String },

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("backend timed out: {0}")]
    Timeout(String),

    #[error("concurrent update conflict for tenant {0}")]
    ConcurrencyConflict(TenantId),
}

impl SubscriptionError {
    pub fn invalid_plan_code(code: impl Into<String>, reason: impl Into<String>) -> Self {
        SubscriptionError::InvalidPlanCode {
            code: code.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        SubscriptionError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    /// Store failures the UI should present as "try again".
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubscriptionError::BackendUnavailable(_)
                | SubscriptionError::Timeout(_)
                | SubscriptionError::ConcurrencyConflict(_)
        )
    }
}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Timeout => SubscriptionError::Timeout(err.message),
            ErrorCode::ValidationFailed => SubscriptionError::Validation {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            ErrorCode::PlanNotFound => SubscriptionError::PlanNotFound(
                err.details.get("plan_code").cloned().unwrap_or(err.message),
            ),
            ErrorCode::InvalidStateTransition => SubscriptionError::InvalidState {
                current: err.details.get("current").cloned().unwrap_or_default(),
                attempted: err.message,
            },
            ErrorCode::ConcurrencyConflict => match tenant_detail(&err) {
                Some(tenant) => SubscriptionError::ConcurrencyConflict(tenant),
                None => SubscriptionError::BackendUnavailable(err.message),
            },
            ErrorCode::SubscriptionNotFound => match tenant_detail(&err) {
                Some(tenant) => SubscriptionError::SubscriptionNotFound(tenant),
                None => SubscriptionError::BackendUnavailable(err.message),
            },
            _ => SubscriptionError::BackendUnavailable(err.message),
        }
    }
}

fn tenant_detail(err: &DomainError) -> Option<TenantId> {
    err.details
        .get("tenant_id")
        .and_then(|id| id.parse::<TenantId>().ok())
}

impl From<ValidationError> for SubscriptionError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::Negative { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        SubscriptionError::Validation {
            field,
            message: err.to_string(),
        }
    }
}
