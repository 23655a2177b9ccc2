//! Integration tests for team metrics.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use odontia::adapters::memory::{InMemoryTeamRoster, MemberFault};
use odontia::application::{CoreSettings, TeamMetricsService};
use odontia::domain::foundation::{Amount, DomainError, MemberId, Percentage, TenantId};
use odontia::domain::team::{
    MemberProfile, MemberRole, MetricField, TeamMemberMetric, TeamMetricsAggregator,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn member(name: &str, income: i64) -> TeamMemberMetric {
    let profile = MemberProfile::new(MemberId::new(), name, MemberRole::Dentist);
    TeamMemberMetric {
        income_this_period: Amount::try_new(Decimal::from(income)).unwrap(),
        ..TeamMemberMetric::zero(&profile)
    }
}

fn roster_of_five() -> Vec<TeamMemberMetric> {
    vec![
        member("A", 300),
        member("B", 900),
        member("C", 100),
        member("D", 700),
        member("E", 500),
    ]
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn contribution_share_of_zero_total_is_zero() {
    for metric in roster_of_five() {
        assert_eq!(
            TeamMetricsAggregator::contribution_share(&metric, Decimal::ZERO),
            Percentage::ZERO
        );
    }
}

#[test]
fn rank_truncates_to_top_n() {
    let ranked = TeamMetricsAggregator::rank(&roster_of_five(), MetricField::Income, 3);
    let names: Vec<&str> = ranked.iter().map(|m| m.display_name.as_str()).collect();
    assert_eq!(names, vec!["B", "D", "E"]);
}

#[test]
fn rank_does_not_pad_short_rosters() {
    let roster = vec![member("A", 10), member("B", 20)];
    let ranked = TeamMetricsAggregator::rank(&roster, MetricField::from_name("income_this_period").unwrap(), 3);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].display_name, "B");
}

#[test]
fn shares_of_whole_roster_sum_to_one_hundred() {
    let roster = roster_of_five();
    let totals = TeamMetricsAggregator::totals(&roster);
    let sum: Decimal = roster
        .iter()
        .map(|m| TeamMetricsAggregator::contribution_share(m, totals.income_this_period.value()).value())
        .sum();
    assert_eq!(sum.round_dp(6), Decimal::from(100));
}

// =============================================================================
// Roster fetch
// =============================================================================

#[tokio::test]
async fn one_failing_member_does_not_fail_the_roster() {
    let roster = Arc::new(InMemoryTeamRoster::new());
    let owner = TenantId::new();
    let owner_profile = MemberProfile::new(owner.into(), "Dr. Ruiz", MemberRole::Owner);
    roster.add_member(owner, owner_profile.clone(), Some(TeamMemberMetric {
        total_patients: 30,
        ..TeamMemberMetric::zero(&owner_profile)
    }));
    let mut broken = None;
    for (i, name) in ["Soto", "Vega", "Lara"].into_iter().enumerate() {
        let profile = MemberProfile::new(MemberId::new(), name, MemberRole::Assistant);
        roster.add_member(owner, profile.clone(), Some(TeamMemberMetric {
            total_patients: 5,
            ..TeamMemberMetric::zero(&profile)
        }));
        if i == 1 {
            broken = Some(profile.member_id);
        }
    }
    let broken = broken.unwrap();
    roster.set_member_fault(broken, MemberFault::Fail(DomainError::backend_unavailable("timeout")));

    let service = TeamMetricsService::new(
        roster,
        CoreSettings {
            store_timeout: Duration::from_millis(200),
            ..Default::default()
        },
    );
    let metrics = service.fetch_roster_metrics(&owner).await.unwrap();

    assert_eq!(metrics.len(), 4);
    assert_eq!(metrics[0].role, MemberRole::Owner);
    let substituted = metrics.iter().find(|m| m.member_id == broken).unwrap();
    assert_eq!(substituted.display_name, "Vega");
    assert_eq!(substituted.total_patients, 0);
    assert_eq!(TeamMetricsAggregator::totals(&metrics).total_patients, 40);
}

#[tokio::test]
async fn owner_counts_even_when_roster_lists_only_collaborators() {
    let roster = Arc::new(InMemoryTeamRoster::new());
    let owner = TenantId::new();
    let owner_profile = MemberProfile::new(owner.into(), "Dr. Ruiz", MemberRole::Owner);
    roster.put_metrics(TeamMemberMetric {
        income_this_period: Amount::try_new(Decimal::from(900)).unwrap(),
        total_patients: 18,
        ..TeamMemberMetric::zero(&owner_profile)
    });
    let collaborator = MemberProfile::new(MemberId::new(), "Soto", MemberRole::Dentist);
    roster.add_member(owner, collaborator.clone(), Some(TeamMemberMetric {
        income_this_period: Amount::try_new(Decimal::from(100)).unwrap(),
        total_patients: 2,
        ..TeamMemberMetric::zero(&collaborator)
    }));

    let service = TeamMetricsService::new(roster, CoreSettings::default());
    let metrics = service.fetch_roster_metrics(&owner).await.unwrap();

    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics[0].member_id, MemberId::from(owner));
    let totals = TeamMetricsAggregator::totals(&metrics);
    assert_eq!(totals.total_patients, 20);
    assert_eq!(totals.income_this_period.value(), Decimal::from(1000));
}
