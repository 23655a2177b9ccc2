//! In-memory adapters.
//!
//! Useful for:
//! - Unit and integration tests (with fault injection)
//! - Embedding the core without a database
//!
//! Thread-safe via internal `Mutex`. Nothing persists across restarts.

mod faults;
mod ledger_source;
mod message_gateway;
mod plan_catalog_store;
mod subscription_store;
mod team_roster;

pub use faults::Faults;
pub use ledger_source::InMemoryLedgerSource;
pub use message_gateway::RecordingMessageGateway;
pub use plan_catalog_store::{default_plans, InMemoryPlanCatalogStore};
pub use subscription_store::InMemorySubscriptionStore;
pub use team_roster::{InMemoryTeamRoster, MemberFault};
