//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `SubscriptionStore` - Active subscription per tenant, atomic writes
//! - `PlanCatalogStore` - Plan definitions
//!
//! ## Source Ports
//!
//! - `PaymentSource` / `ExpenseSource` - Ledger rows per tenant
//! - `TeamRosterSource` - Roster profiles and member metrics
//!
//! ## Delivery Ports
//!
//! - `MessageGateway` - Email / WhatsApp delivery

mod ledger_source;
mod message_gateway;
mod plan_catalog_store;
mod subscription_store;
mod team_roster;

pub use ledger_source::{ExpenseSource, PaymentSource};
pub use message_gateway::{DeliveryReceipt, MessageChannel, MessageGateway, OutboundMessage};
pub use plan_catalog_store::PlanCatalogStore;
pub use subscription_store::SubscriptionStore;
pub use team_roster::TeamRosterSource;
