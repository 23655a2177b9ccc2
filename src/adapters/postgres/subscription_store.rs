//! PostgreSQL implementation of SubscriptionStore.
//!
//! Both invariant-bearing writes are single statements:
//!
//! - first subscription: `INSERT ... ON CONFLICT DO NOTHING` against the
//!   partial unique index `subscriptions_one_active_per_tenant`
//! - message counter: one `UPDATE` whose `CASE` decides reset or increment
//!   from the stored reset date

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, TenantId, Timestamp};
use crate::domain::subscription::{Plan, Subscription, SubscriptionStatus};
use crate::ports::SubscriptionStore;

use super::plan_catalog_store::{PlanRow, PLAN_COLUMNS};
use super::rows::{corrupt_row, query_failed, to_i32, to_u32};

pub struct PostgresSubscriptionStore {
    pool: PgPool,
}

impl PostgresSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_active(&self, tenant_id: &TenantId) -> Result<Option<Subscription>, DomainError> {
        let sql = format!(
            "{} FROM subscriptions s JOIN plans p ON p.id = s.plan_id \
             WHERE s.tenant_id = $1 AND s.status = 'active'",
            select_list()
        );
        let row: Option<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(tenant_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("get active subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }
}

/// Rollover compares calendar months of the stored reset date and `$2`.
/// Both `CASE` arms read the pre-update row.
const INCREMENT_COUNTER: &str = r#"
    UPDATE subscriptions SET
        messages_used_this_period = CASE
            WHEN date_trunc('month', last_counter_reset_date) = date_trunc('month', $2::date)
                THEN messages_used_this_period + 1
            ELSE 1
        END,
        last_counter_reset_date = CASE
            WHEN date_trunc('month', last_counter_reset_date) = date_trunc('month', $2::date)
                THEN last_counter_reset_date
            ELSE $2::date
        END,
        updated_at = NOW()
    WHERE tenant_id = $1 AND status = 'active'
    RETURNING *
"#;

fn select_list() -> String {
    format!(
        "SELECT s.id AS subscription_id, s.tenant_id, s.status, s.messages_used_this_period, \
                s.last_counter_reset_date, s.created_at, s.updated_at, {}",
        PLAN_COLUMNS
    )
}

/// Wrap a `RETURNING *` write so the result comes back joined with its plan.
fn returning_joined(write: &str) -> String {
    format!(
        "WITH s AS ({}) {} FROM s JOIN plans p ON p.id = s.plan_id",
        write,
        select_list()
    )
}

/// Subscription row joined with its plan.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    subscription_id: Uuid,
    tenant_id: Uuid,
    status: String,
    messages_used_this_period: i32,
    last_counter_reset_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[sqlx(flatten)]
    plan: PlanRow,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status = SubscriptionStatus::parse(&row.status)
            .ok_or_else(|| corrupt_row(format!("Invalid status value: {}", row.status)))?;

        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.subscription_id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            plan: Plan::try_from(row.plan)?,
            status,
            messages_used_this_period: to_u32("messages_used_this_period", row.messages_used_this_period)?,
            last_counter_reset_date: row.last_counter_reset_date,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn not_found(tenant_id: &TenantId) -> DomainError {
    DomainError::new(
        ErrorCode::SubscriptionNotFound,
        format!("No active subscription for tenant {}", tenant_id),
    )
    .with_detail("tenant_id", tenant_id.to_string())
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    async fn get_active(&self, tenant_id: &TenantId) -> Result<Option<Subscription>, DomainError> {
        self.fetch_active(tenant_id).await
    }

    async fn create_if_absent(&self, candidate: &Subscription) -> Result<Subscription, DomainError> {
        if !candidate.is_active() {
            return Err(DomainError::validation(
                "status",
                "Only active subscriptions can be created",
            ));
        }

        // A losing insert blocks on the winner's commit, so the read below
        // sees the winning row.
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, tenant_id, plan_id, status, messages_used_this_period,
                last_counter_reset_date, created_at, updated_at
            ) VALUES ($1, $2, $3, 'active', $4, $5, $6, $7)
            ON CONFLICT (tenant_id) WHERE status = 'active' DO NOTHING
            "#,
        )
        .bind(candidate.id.as_uuid())
        .bind(candidate.tenant_id.as_uuid())
        .bind(candidate.plan.id.as_uuid())
        .bind(to_i32("messages_used_this_period", candidate.messages_used_this_period)?)
        .bind(candidate.last_counter_reset_date)
        .bind(candidate.created_at.as_datetime())
        .bind(candidate.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| query_failed("insert subscription", e))?;

        self.fetch_active(&candidate.tenant_id).await?.ok_or_else(|| {
            DomainError::conflict("Active subscription changed during insert")
                .with_detail("tenant_id", candidate.tenant_id.to_string())
        })
    }

    async fn update_plan(&self, tenant_id: &TenantId, plan: &Plan) -> Result<Subscription, DomainError> {
        let sql = returning_joined(
            "UPDATE subscriptions SET plan_id = $2, updated_at = NOW() \
             WHERE tenant_id = $1 AND status = 'active' RETURNING *",
        );
        let row: Option<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(tenant_id.as_uuid())
            .bind(plan.id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("update subscription plan", e))?;

        row.map(Subscription::try_from)
            .transpose()?
            .ok_or_else(|| not_found(tenant_id))
    }

    async fn increment_message_counter(
        &self,
        tenant_id: &TenantId,
        today: NaiveDate,
    ) -> Result<Subscription, DomainError> {
        let sql = returning_joined(INCREMENT_COUNTER);
        let row: Option<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(tenant_id.as_uuid())
            .bind(today)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("increment message counter", e))?;

        row.map(Subscription::try_from)
            .transpose()?
            .ok_or_else(|| not_found(tenant_id))
    }

    async fn count_active(&self, tenant_id: &TenantId) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE tenant_id = $1 AND status = 'active'",
        )
        .bind(tenant_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("count active subscriptions", e))?;

        u64::try_from(count).map_err(|_| corrupt_row(format!("Negative count: {}", count)))
    }
}
