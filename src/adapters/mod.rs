//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - in-process stores with fault injection
//! - `postgres` - sqlx-backed stores and sources

pub mod memory;
pub mod postgres;
