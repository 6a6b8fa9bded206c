//! PostgreSQL persistence for the watches service.
//!
//! [`repositories::WatchRepo`] holds the SQL; [`store::PgWatchStore`] adapts
//! it to the `WatchStore` contract the core service depends on.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::PgWatchStore;

pub type DbPool = sqlx::PgPool;

/// Connection settings for the pool.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// How long to wait for a connection before giving up.
    pub connect_timeout: Duration,
    /// Server-side cap on any single statement.
    pub statement_timeout: Duration,
    /// Statements running longer than this are logged at `WARN`.
    pub slow_query_threshold: Duration,
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 20,
            connect_timeout: Duration::from_millis(3500),
            statement_timeout: Duration::from_millis(1200),
            slow_query_threshold: Duration::from_millis(1200),
        }
    }
}

/// Connection options for `config`: URL, server-side statement timeout and
/// slow statement logging.
pub fn connect_options(config: &DbConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let statement_timeout = config.statement_timeout.as_millis().to_string();
    let options = PgConnectOptions::from_str(&config.database_url)?
        .options([("statement_timeout", statement_timeout.as_str())])
        .log_slow_statements(log::LevelFilter::Warn, config.slow_query_threshold);
    Ok(options)
}

/// Create a connection pool from a [`DbConfig`].
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let options = connect_options(config)?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to prove the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_timeouts_and_slow_statement_logging() {
        let config = DbConfig::new("postgres://localhost/watches");
        assert_eq!(config.connect_timeout, Duration::from_millis(3500));
        assert_eq!(config.statement_timeout, Duration::from_millis(1200));
        assert_eq!(config.slow_query_threshold, Duration::from_millis(1200));
    }

    #[test]
    fn connect_options_carry_statement_timeout() {
        let config = DbConfig {
            statement_timeout: Duration::from_millis(800),
            ..DbConfig::new("postgres://app@db.internal:5433/watches")
        };
        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("watches"));
        assert!(options
            .get_options()
            .is_some_and(|o| o.contains("statement_timeout=800")));
    }

    #[test]
    fn malformed_url_is_rejected() {
        assert!(connect_options(&DbConfig::new("not a url")).is_err());
    }
}
