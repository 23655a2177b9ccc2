//! Team roster port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId, TenantId};
use crate::domain::team::{MemberProfile, TeamMemberMetric};

/// Source of roster profiles and per-member metric snapshots.
#[async_trait]
pub trait TeamRosterSource: Send + Sync {
    /// Active profiles of the owner's clinic, owner included.
    async fn list_active_profiles(&self, owner_id: &TenantId) -> Result<Vec<MemberProfile>, DomainError>;

    /// Current-period snapshot for one member. `None` if none exists yet.
    async fn get_member_metrics(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<TeamMemberMetric>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_roster_source_is_object_safe() {
        fn _accepts_dyn(_source: &dyn TeamRosterSource) {}
    }
}
