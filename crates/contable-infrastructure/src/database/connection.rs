//! Database connection pool

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{error, info};

use contable_core::DomainError;

pub async fn create_pool(
    url: &str,
    max_connections: u32,
    acquire_timeout_secs: u64,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
        .connect(url)
        .await
}

/// Applies the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Connection-level failures mean the store is unreachable; everything else
/// is reported as a plain database error.
pub(crate) fn map_sqlx_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    let unreachable = matches!(
        e,
        sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed
    );
    if unreachable {
        DomainError::StoreUnavailable(e.to_string())
    } else {
        DomainError::DatabaseError(e.to_string())
    }
}
