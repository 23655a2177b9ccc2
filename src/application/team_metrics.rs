//! TeamMetricsService - roster-wide metric collection.
//!
//! Callers check the `metricas_equipo` capability first; nothing here does.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use crate::domain::foundation::{DomainError, MemberId, TenantId};
use crate::domain::team::{
    MemberProfile, MemberRole, MetricField, TeamMemberMetric, TeamMetricsAggregator, TeamTotals,
};
use crate::ports::TeamRosterSource;

use super::deadline::bounded;
use super::CoreSettings;

/// Display name for an owner the roster source did not list.
const UNLISTED_OWNER_NAME: &str = "Titular";

/// Roster snapshot with its totals and top earners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamOverview {
    pub members: Vec<TeamMemberMetric>,
    pub totals: TeamTotals,
    pub top_earners: Vec<TeamMemberMetric>,
}

pub struct TeamMetricsService {
    roster: Arc<dyn TeamRosterSource>,
    settings: CoreSettings,
}

impl TeamMetricsService {
    pub fn new(roster: Arc<dyn TeamRosterSource>, settings: CoreSettings) -> Self {
        Self { roster, settings }
    }

    /// One metric per roster member, owner first.
    ///
    /// The owner is always present: if the listing omits them, a profile is
    /// synthesized and their metrics are fetched like any other member's.
    ///
    /// Member lookups run concurrently, each under the store deadline. A
    /// member whose lookup fails, times out or finds nothing gets a zero
    /// metric; only a failed roster listing fails the call.
    pub async fn fetch_roster_metrics(&self, owner_id: &TenantId) -> Result<Vec<TeamMemberMetric>, DomainError> {
        let profiles = bounded(
            "team.list_active_profiles",
            self.settings.store_timeout,
            self.roster.list_active_profiles(owner_id),
        )
        .await?;
        let (profiles, owner_listed) = order_roster(MemberId::from(*owner_id), profiles);
        if !owner_listed {
            tracing::warn!(owner_id = %owner_id, "owner missing from roster listing, adding it");
        }

        let lookups = profiles.iter().map(|profile| {
            bounded(
                "team.get_member_metrics",
                self.settings.store_timeout,
                self.roster.get_member_metrics(&profile.member_id),
            )
        });
        let results = join_all(lookups).await;

        let metrics = profiles
            .iter()
            .zip(results)
            .enumerate()
            .map(|(position, (profile, result))| match result {
                Ok(Some(snapshot)) if position == 0 && !owner_listed => {
                    with_identity(&unlisted_owner_profile(profile, &snapshot), snapshot)
                }
                Ok(Some(snapshot)) => with_identity(profile, snapshot),
                Ok(None) => {
                    tracing::warn!(
                        owner_id = %owner_id,
                        member_id = %profile.member_id,
                        "no metrics snapshot, using zero metric"
                    );
                    TeamMemberMetric::zero(profile)
                }
                Err(err) => {
                    tracing::warn!(
                        owner_id = %owner_id,
                        member_id = %profile.member_id,
                        error = %err,
                        "member metrics lookup failed, using zero metric"
                    );
                    TeamMemberMetric::zero(profile)
                }
            })
            .collect();
        Ok(metrics)
    }

    /// Roster metrics with totals and the `top_n` members by income.
    pub async fn overview(&self, owner_id: &TenantId, top_n: usize) -> Result<TeamOverview, DomainError> {
        let members = self.fetch_roster_metrics(owner_id).await?;
        let totals = TeamMetricsAggregator::totals(&members);
        let top_earners = TeamMetricsAggregator::rank(&members, MetricField::Income, top_n);
        Ok(TeamOverview {
            members,
            totals,
            top_earners,
        })
    }
}

/// Owner first, the rest in listing order, duplicates dropped.
///
/// The flag reports whether the listing contained the owner; when it did
/// not, a placeholder owner profile heads the roster.
fn order_roster(owner: MemberId, profiles: Vec<MemberProfile>) -> (Vec<MemberProfile>, bool) {
    let mut seen = HashSet::new();
    let (mut owners, others): (Vec<_>, Vec<_>) = profiles
        .into_iter()
        .filter(|p| seen.insert(p.member_id))
        .partition(|p| p.member_id == owner);
    let listed = !owners.is_empty();
    if !listed {
        owners.push(MemberProfile::new(owner, UNLISTED_OWNER_NAME, MemberRole::Owner));
    }
    (owners.into_iter().chain(others).collect(), listed)
}

/// Synthesized owner takes its name from the snapshot when it has one.
fn unlisted_owner_profile(placeholder: &MemberProfile, snapshot: &TeamMemberMetric) -> MemberProfile {
    let name = snapshot.display_name.trim();
    if name.is_empty() {
        placeholder.clone()
    } else {
        MemberProfile::new(placeholder.member_id, name, MemberRole::Owner)
    }
}

/// Roster profile is authoritative for identity fields.
fn with_identity(profile: &MemberProfile, snapshot: TeamMemberMetric) -> TeamMemberMetric {
    TeamMemberMetric {
        member_id: profile.member_id,
        display_name: profile.display_name.clone(),
        role: profile.role,
        ..snapshot
    }
}
