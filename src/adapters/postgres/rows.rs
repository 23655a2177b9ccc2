//! Conversions shared by the row types.

use rust_decimal::Decimal;

use crate::domain::foundation::{Amount, DomainError, ErrorCode};

/// Any sqlx failure: the lookup did not complete.
pub(super) fn query_failed(operation: &'static str, err: sqlx::Error) -> DomainError {
    DomainError::backend_unavailable(format!("Failed to {}: {}", operation, err))
        .with_detail("operation", operation)
}

/// A row that the schema should not have allowed.
pub(super) fn corrupt_row(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::InternalError, message)
}

pub(super) fn to_u32(field: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| corrupt_row(format!("Negative {}: {}", field, value)))
}

pub(super) fn opt_u32(field: &str, value: Option<i32>) -> Result<Option<u32>, DomainError> {
    value.map(|v| to_u32(field, v)).transpose()
}

pub(super) fn to_i32(field: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value)
        .map_err(|_| DomainError::validation(field, format!("{} exceeds column range", value)))
}

/// Negative stored amounts are rejected as `ValidationFailed`.
pub(super) fn to_amount(value: Decimal) -> Result<Amount, DomainError> {
    Amount::try_new(value).map_err(DomainError::from)
}
