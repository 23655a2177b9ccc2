//! Application layer - services that orchestrate domain rules over ports.
//!
//! Every port call goes through [`deadline::bounded`], so a slow store shows
//! up as a `Timeout` error rather than a hung request.
//!
//! ## Entitlements
//!
//! - `PlanCatalog` - cached, validated plan listing
//! - `EntitlementResolver` - active subscription, capabilities, plan changes
//! - `UsageCounter` - monthly message allowance
//! - `MessageDispatcher` - metered outbound messages
//!
//! ## Read models
//!
//! - `LedgerService` - merged payments and expenses
//! - `TeamMetricsService` - roster-wide member metrics

pub mod deadline;
mod entitlements;
mod ledger_service;
mod message_dispatcher;
mod plan_catalog;
mod settings;
mod team_metrics;
mod usage_counter;

pub use entitlements::EntitlementResolver;
pub use ledger_service::LedgerService;
pub use message_dispatcher::{DispatchError, DispatchOutcome, MessageDispatcher};
pub use plan_catalog::{validate_listing, PlanCatalog};
pub use settings::CoreSettings;
pub use team_metrics::{TeamMetricsService, TeamOverview};
pub use usage_counter::UsageCounter;
