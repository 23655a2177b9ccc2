//! Subscription domain module.
//!
//! Plans, tiers, the capability table, the subscription aggregate and the
//! monthly usage counter rules.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription aggregate entity
//! - `status` - SubscriptionStatus (active, cancelled, expired)
//! - `tier` - PlanTier levels
//! - `feature` - Tier-gated capability table
//! - `plan` - Plan definitions and capabilities
//! - `usage` - Monthly counter rollover and allowance
//! - `access` - Access check outcomes

mod access;
mod aggregate;
mod errors;
mod feature;
mod plan;
mod status;
mod tier;
pub mod usage;

pub use access::{AccessDeniedReason, AccessResult};
pub use aggregate::Subscription;
pub use errors::SubscriptionError;
pub use feature::{tier_grants, Feature};
pub use plan::{Plan, PlanCapabilities, PlanCode};
pub use status::SubscriptionStatus;
pub use tier::PlanTier;
pub use usage::Allowance;
