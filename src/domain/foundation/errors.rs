//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' cannot be negative, got {actual}")]
    Negative { field: String, actual: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        actual: String,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a negative value validation error.
    pub fn negative(field: impl Into<String>, actual: impl fmt::Display) -> Self {
        ValidationError::Negative {
            field: field.into(),
            actual: actual.to_string(),
        }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(
        field: impl Into<String>,
        min: impl fmt::Display,
        max: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min: min.to_string(),
            max: max.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors (confirmed absent after a successful lookup)
    PlanNotFound,
    SubscriptionNotFound,
    MemberNotFound,

    // State errors
    InvalidStateTransition,
    ConcurrencyConflict,

    // Infrastructure errors
    BackendUnavailable,
    Timeout,
    InternalError,
}

impl ErrorCode {
    /// Returns true for the "confirmed absent" family of codes.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::PlanNotFound | ErrorCode::SubscriptionNotFound | ErrorCode::MemberNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::PlanNotFound => "PLAN_NOT_FOUND",
            ErrorCode::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            ErrorCode::MemberNotFound => "MEMBER_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            ErrorCode::BackendUnavailable => "BACKEND_UNAVAILABLE",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Ports report every store failure through this type. A failed lookup is
/// always `BackendUnavailable` or `Timeout`; a confirmed absence is reported
/// as `Ok(None)` by the port, never as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// The backing store could not be reached or the query failed.
    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendUnavailable, message)
    }

    /// A store call exceeded its deadline.
    pub fn timeout(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        Self::new(ErrorCode::Timeout, format!("{} timed out", operation))
            .with_detail("operation", operation)
    }

    /// An atomic conditional write lost a race.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConcurrencyConflict, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Whether the caller should offer a retry instead of an error page.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::BackendUnavailable | ErrorCode::Timeout | ErrorCode::ConcurrencyConflict
        )
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::Negative { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        DomainError::validation(field, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("tenant_id");
        assert_eq!(format!("{}", err), "Field 'tenant_id' cannot be empty");
    }

    #[test]
    fn validation_error_negative_displays_value() {
        let err = ValidationError::negative("amount", "-10.50");
        assert_eq!(format!("{}", err), "Field 'amount' cannot be negative, got -10.50");
    }

    #[test]
    fn validation_error_out_of_range_displays_bounds() {
        let err = ValidationError::out_of_range("amount", 0, 10, 12);
        assert_eq!(format!("{}", err), "Field 'amount' must be between 0 and 10, got 12");
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::PlanNotFound, "Plan 'gold' not found");
        assert_eq!(format!("{}", err), "[PLAN_NOT_FOUND] Plan 'gold' not found");
    }

    #[test]
    fn timeout_records_operation_detail() {
        let err = DomainError::timeout("subscriptions.get_active");
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(
            err.details.get("operation"),
            Some(&"subscriptions.get_active".to_string())
        );
    }

    #[test]
    fn infrastructure_errors_are_retryable() {
        assert!(DomainError::backend_unavailable("down").is_retryable());
        assert!(DomainError::timeout("op").is_retryable());
        assert!(DomainError::conflict("race").is_retryable());
        assert!(!DomainError::validation("code", "bad").is_retryable());
        assert!(!DomainError::new(ErrorCode::PlanNotFound, "x").is_retryable());
    }

    #[test]
    fn not_found_family_is_distinct_from_unavailable() {
        assert!(ErrorCode::SubscriptionNotFound.is_not_found());
        assert!(!ErrorCode::BackendUnavailable.is_not_found());
        assert!(!ErrorCode::Timeout.is_not_found());
    }

    #[test]
    fn validation_error_converts_with_field_detail() {
        let err: DomainError = ValidationError::empty_field("plan_code").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"plan_code".to_string()));
    }
}
