//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the clock abstraction and error types
//! that form the vocabulary of the clinic domain.

mod clock;
mod errors;
mod ids;
mod money;
mod percentage;
mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{MemberId, PlanId, RecordId, SubscriptionId, TenantId};
pub use money::Amount;
pub use percentage::Percentage;
pub use timestamp::Timestamp;
