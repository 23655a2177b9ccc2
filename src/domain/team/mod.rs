//! Team metrics across a clinic roster.
//!
//! Callers check the `metricas_equipo` capability before using anything here;
//! this module performs no entitlement checks.

mod aggregator;
mod member;

pub use aggregator::{MetricField, TeamMetricsAggregator, TeamTotals};
pub use member::{MemberProfile, MemberRole, TeamMemberMetric};
