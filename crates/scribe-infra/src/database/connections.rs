//! Database connection setup.

use std::time::Duration;

#[cfg(feature = "database")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the primary database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SeaORM connection string, e.g. `sqlite://./blog.db?mode=rwc` or `postgres://...`.
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    /// Apply pending migrations at start-up.
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./blog.db?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(10),
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Backend name for logging, without credentials.
    pub fn backend(&self) -> &str {
        self.url.split(':').next().unwrap_or("unknown")
    }
}

/// Open the connection pool.
#[cfg(feature = "database")]
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, DbErr> {
    tracing::info!(backend = config.backend(), "Connecting to database...");

    let opts = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .to_owned();

    let conn = Database::connect(opts).await?;
    tracing::info!(
        backend = config.backend(),
        pool = config.max_connections,
        "Database connected"
    );

    Ok(conn)
}
