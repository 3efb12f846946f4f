//! Database pool, migrations and health check

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Pool tuning on top of the configured URL and size
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl From<&DatabaseConfig> for PoolSettings {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_connections: config.max_connections,
            min_connections: config.max_connections.min(PoolSettings::default().min_connections),
            ..Default::default()
        }
    }
}

/// Connect a pool for the configured database
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let settings = PoolSettings::from(config);
    let options = PgConnectOptions::from_str(&config.url)
        .context("invalid database url")?
        .application_name("macrotrack");

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .connect_with(options)
        .await
        .context("failed to connect to database")?;

    info!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        "Database pool created"
    );
    Ok(pool)
}

/// Apply pending migrations from `backend/migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to run migrations")?;
    info!("Database migrations applied");
    Ok(())
}

/// Round-trip a trivial query
pub async fn health_check(pool: &PgPool) -> Result<()> {
    if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
        warn!(error = %e, "Database health check failed");
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_settings_follow_config() {
        let config = DatabaseConfig {
            url: "postgres://localhost/macrotrack".to_string(),
            max_connections: 4,
        };
        let settings = PoolSettings::from(&config);
        assert_eq!(settings.max_connections, 4);
        assert_eq!(settings.min_connections, 1);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(10));
    }
}
