//! PostgreSQL adapters - Database implementations of the store and source ports.
//!
//! - `PostgresSubscriptionStore` - atomic insert-if-absent and counter update
//! - `PostgresPlanCatalogStore` - plan definitions
//! - `PostgresLedgerSource` - payments and expenses
//! - `PostgresTeamRoster` - roster profiles and metric snapshots
//!
//! Schema lives in `migrations/` at the crate root.

mod ledger_source;
mod plan_catalog_store;
mod rows;
mod subscription_store;
mod team_roster;

pub use ledger_source::PostgresLedgerSource;
pub use plan_catalog_store::PostgresPlanCatalogStore;
pub use subscription_store::PostgresSubscriptionStore;
pub use team_roster::PostgresTeamRoster;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Open a connection pool, running migrations first when configured to.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect(&config.url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to connect to database");
            DomainError::backend_unavailable(format!("Failed to connect to database: {}", e))
        })?;

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    tracing::info!(
        min_connections = config.min_connections,
        max_connections = config.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Apply pending migrations from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        tracing::error!(error = %e, "database migration failed");
        DomainError::backend_unavailable(format!("Failed to run migrations: {}", e))
    })?;
    tracing::info!("database migrations applied");
    Ok(())
}
