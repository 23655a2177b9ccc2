//! PostgreSQL team roster source.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, MemberId, TenantId};
use crate::domain::team::{MemberProfile, MemberRole, TeamMemberMetric};
use crate::ports::TeamRosterSource;

use super::rows::{query_failed, to_amount, to_u32};

pub struct PostgresTeamRoster {
    pool: PgPool,
}

impl PostgresTeamRoster {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    member_id: Uuid,
    display_name: String,
    role: String,
}

impl From<ProfileRow> for MemberProfile {
    fn from(row: ProfileRow) -> Self {
        MemberProfile::new(
            MemberId::from_uuid(row.member_id),
            row.display_name,
            MemberRole::parse(&row.role),
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MetricRow {
    member_id: Uuid,
    display_name: String,
    role: String,
    total_patients: i32,
    income_this_period: Decimal,
    expenses_this_period: Decimal,
    appointments_this_period: i32,
    procedures_this_period: i32,
}

impl TryFrom<MetricRow> for TeamMemberMetric {
    type Error = DomainError;

    fn try_from(row: MetricRow) -> Result<Self, Self::Error> {
        Ok(TeamMemberMetric {
            member_id: MemberId::from_uuid(row.member_id),
            display_name: row.display_name,
            role: MemberRole::parse(&row.role),
            total_patients: to_u32("total_patients", row.total_patients)?,
            income_this_period: to_amount(row.income_this_period)?,
            expenses_this_period: to_amount(row.expenses_this_period)?,
            appointments_this_period: to_u32("appointments_this_period", row.appointments_this_period)?,
            procedures_this_period: to_u32("procedures_this_period", row.procedures_this_period)?,
        })
    }
}

#[async_trait]
impl TeamRosterSource for PostgresTeamRoster {
    async fn list_active_profiles(&self, owner_id: &TenantId) -> Result<Vec<MemberProfile>, DomainError> {
        let rows: Vec<ProfileRow> = sqlx::query_as(
            r#"
            SELECT member_id, display_name, role
            FROM team_profiles
            WHERE owner_id = $1 AND is_active
            ORDER BY created_at, member_id
            "#,
        )
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_failed("list team profiles", e))?;

        Ok(rows.into_iter().map(MemberProfile::from).collect())
    }

    async fn get_member_metrics(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<TeamMemberMetric>, DomainError> {
        let row: Option<MetricRow> = sqlx::query_as(
            r#"
            SELECT m.member_id, p.display_name, p.role, m.total_patients,
                   m.income_this_period, m.expenses_this_period,
                   m.appointments_this_period, m.procedures_this_period
            FROM team_member_metrics m
            JOIN team_profiles p ON p.member_id = m.member_id
            WHERE m.member_id = $1
            "#,
        )
        .bind(member_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("get member metrics", e))?;

        row.map(TeamMemberMetric::try_from).transpose()
    }
}
