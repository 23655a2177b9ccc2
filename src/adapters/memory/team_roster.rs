//! In-memory team roster.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::foundation::{DomainError, MemberId, TenantId};
use crate::domain::team::{MemberProfile, TeamMemberMetric};
use crate::ports::TeamRosterSource;

use super::faults::{lock, Faults};

/// Per-member misbehaviour for metric lookups.
#[derive(Debug, Clone)]
pub enum MemberFault {
    Fail(DomainError),
    Delay(Duration),
}

#[derive(Debug, Default)]
pub struct InMemoryTeamRoster {
    profiles: Mutex<HashMap<TenantId, Vec<MemberProfile>>>,
    metrics: Mutex<HashMap<MemberId, TeamMemberMetric>>,
    member_faults: Mutex<HashMap<MemberId, MemberFault>>,
    listing_faults: Faults,
}

impl InMemoryTeamRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile to the owner's roster, optionally with its snapshot.
    pub fn add_member(&self, owner_id: TenantId, profile: MemberProfile, metric: Option<TeamMemberMetric>) {
        if let Some(metric) = metric {
            lock(&self.metrics).insert(profile.member_id, metric);
        }
        lock(&self.profiles).entry(owner_id).or_default().push(profile);
    }

    /// Store a snapshot without listing its member on any roster.
    pub fn put_metrics(&self, metric: TeamMemberMetric) {
        lock(&self.metrics).insert(metric.member_id, metric);
    }

    pub fn set_member_fault(&self, member_id: MemberId, fault: MemberFault) {
        lock(&self.member_faults).insert(member_id, fault);
    }

    pub fn listing_faults(&self) -> &Faults {
        &self.listing_faults
    }
}

#[async_trait]
impl TeamRosterSource for InMemoryTeamRoster {
    async fn list_active_profiles(&self, owner_id: &TenantId) -> Result<Vec<MemberProfile>, DomainError> {
        self.listing_faults.apply().await?;
        Ok(lock(&self.profiles).get(owner_id).cloned().unwrap_or_default())
    }

    async fn get_member_metrics(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<TeamMemberMetric>, DomainError> {
        let fault = lock(&self.member_faults).get(member_id).cloned();
        match fault {
            Some(MemberFault::Fail(error)) => return Err(error),
            Some(MemberFault::Delay(latency)) => tokio::time::sleep(latency).await,
            None => {}
        }
        Ok(lock(&self.metrics).get(member_id).cloned())
    }
}
