//! Connection pool construction.
//!
//! Builds the [`SqlitePool`] used by the whole application from [`DatabaseConfig`]. Every
//! connection enables foreign keys (required for `ON DELETE CASCADE`) and runs in WAL mode. Writers
//! contending for the database wait out sqlx's default busy timeout.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use sqlx::{
    ConnectOptions, SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};
use tracing::info;

use crate::config::{DatabaseConfig, PoolSettings};

/// Connection options derived from the configured URL.
pub fn connect_options(config: &DatabaseConfig, slow_statement_threshold: Duration) -> anyhow::Result<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("invalid database url '{}'", config.url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, slow_statement_threshold);

    Ok(options)
}

/// Pool options from [`PoolSettings`]. Zero durations disable the corresponding limit.
pub fn pool_options(settings: &PoolSettings) -> SqlitePoolOptions {
    let non_zero = |d: Duration| (!d.is_zero()).then_some(d);

    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(non_zero(settings.idle_timeout))
        .max_lifetime(non_zero(settings.max_lifetime))
}

/// Open the application pool.
pub async fn connect(config: &DatabaseConfig, slow_statement_threshold: Duration) -> anyhow::Result<SqlitePool> {
    let options = connect_options(config, slow_statement_threshold)?;
    let pool = pool_options(&config.pool)
        .connect_with(options)
        .await
        .context("failed to open sqlite database")?;

    info!(max_connections = config.pool.max_connections, "Database pool ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_connect_creates_database_file_with_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            ..Default::default()
        };

        let pool = connect(&config, Duration::from_secs(1)).await.unwrap();
        assert!(path.exists());

        let foreign_keys: i64 = sqlx::query_scalar("PRAGMA foreign_keys").fetch_one(&pool).await.unwrap();
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn test_invalid_url_parameter_is_rejected() {
        let config = DatabaseConfig {
            url: "sqlite://cadastro.db?mode=sideways".to_string(),
            ..Default::default()
        };

        assert!(connect_options(&config, Duration::from_secs(1)).is_err());
    }
}
