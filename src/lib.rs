//! Odontia - entitlements and financial read models for dental clinics.
//!
//! Resolves each tenant's subscription and capabilities, meters monthly
//! outbound messages, merges payments and expenses into a filterable ledger,
//! and aggregates metrics across a clinic's team roster.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
