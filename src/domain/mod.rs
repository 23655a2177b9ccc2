//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, clock, errors)
//! - `subscription` - Plans, capability gating, subscription lifecycle and usage rules
//! - `ledger` - Payments and expenses merged into a unified ledger
//! - `team` - Per-member metrics and roster aggregation

pub mod foundation;
pub mod ledger;
pub mod subscription;
pub mod team;
