//! Database pool and migrations
//!
//! One PostgreSQL pool backs the whole service. The recipe tables come
//! from the sqlx migrations under `migrations/`; the only knobs this
//! service exposes are the URL and the pool size (see `AppConfig`), the
//! rest are fixed here.

use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// How long an acquire may wait before giving up
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
/// Idle connections are dropped after this long
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Create the PostgreSQL connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let connect_options =
        PgConnectOptions::from_str(database_url)?.application_name("recipe-api");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(max_connections, "Database pool created");

    Ok(pool)
}

/// Apply pending migrations from `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Round-trip a trivial query; this is what the readiness probe reports on
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_pool_rejects_malformed_url() {
        // URL parsing fails before any connection is attempted
        assert!(create_pool("not a database url", 5).await.is_err());
    }
}
