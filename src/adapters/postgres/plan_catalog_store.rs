//! PostgreSQL implementation of PlanCatalogStore.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::subscription::{Plan, PlanCapabilities, PlanCode, PlanTier};
use crate::ports::PlanCatalogStore;

use super::rows::{corrupt_row, opt_u32, query_failed};

pub struct PostgresPlanCatalogStore {
    pool: PgPool,
}

impl PostgresPlanCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(super) const PLAN_COLUMNS: &str = "p.id, p.code, p.name, p.tier, p.exportar, p.backups, \
     p.mensajes_ilimitados, p.multiples_usuarios, p.max_perfiles, p.limite_mensajes_mes, p.is_active";

/// Database row representation of a plan.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct PlanRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub tier: String,
    pub exportar: bool,
    pub backups: bool,
    pub mensajes_ilimitados: bool,
    pub multiples_usuarios: bool,
    pub max_perfiles: Option<i32>,
    pub limite_mensajes_mes: Option<i32>,
    pub is_active: bool,
}

impl TryFrom<PlanRow> for Plan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let code = PlanCode::new(row.code.as_str())
            .map_err(|e| corrupt_row(format!("Invalid plan code '{}': {}", row.code, e)))?;
        let tier = PlanTier::parse(&row.tier)
            .ok_or_else(|| corrupt_row(format!("Invalid tier value: {}", row.tier)))?;

        Ok(Plan {
            id: PlanId::from_uuid(row.id),
            code,
            name: row.name,
            tier,
            capabilities: PlanCapabilities {
                export: row.exportar,
                backups: row.backups,
                unlimited_messages: row.mensajes_ilimitados,
                multiple_users: row.multiples_usuarios,
                max_profiles: opt_u32("max_perfiles", row.max_perfiles)?,
                monthly_message_limit: opt_u32("limite_mensajes_mes", row.limite_mensajes_mes)?,
            },
            is_active: row.is_active,
        })
    }
}

#[async_trait]
impl PlanCatalogStore for PostgresPlanCatalogStore {
    async fn list_active(&self) -> Result<Vec<Plan>, DomainError> {
        let sql = format!(
            "SELECT {} FROM plans p WHERE p.is_active ORDER BY p.created_at, p.code",
            PLAN_COLUMNS
        );
        let rows: Vec<PlanRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("list plans", e))?;

        rows.into_iter().map(Plan::try_from).collect()
    }

    async fn get_by_code(&self, code: &PlanCode) -> Result<Option<Plan>, DomainError> {
        let sql = format!("SELECT {} FROM plans p WHERE p.code = $1", PLAN_COLUMNS);
        let row: Option<PlanRow> = sqlx::query_as(&sql)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("get plan by code", e))?;

        row.map(Plan::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn free_row() -> PlanRow {
        PlanRow {
            id: Uuid::new_v4(),
            code: "free".to_string(),
            name: "Gratis".to_string(),
            tier: "free".to_string(),
            exportar: false,
            backups: false,
            mensajes_ilimitados: false,
            multiples_usuarios: false,
            max_perfiles: Some(1),
            limite_mensajes_mes: Some(50),
            is_active: true,
        }
    }

    #[test]
    fn row_maps_capability_columns() {
        let plan = Plan::try_from(free_row()).unwrap();
        assert!(plan.is_free());
        assert_eq!(plan.tier, PlanTier::Free);
        assert_eq!(plan.capabilities.max_profiles, Some(1));
        assert_eq!(plan.capabilities.message_limit(), Some(50));
    }

    #[test]
    fn unknown_tier_is_corrupt() {
        let row = PlanRow {
            tier: "platinum".to_string(),
            ..free_row()
        };
        let err = Plan::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[test]
    fn negative_limit_is_corrupt() {
        let row = PlanRow {
            limite_mensajes_mes: Some(-5),
            ..free_row()
        };
        assert!(Plan::try_from(row).is_err());
    }
}
