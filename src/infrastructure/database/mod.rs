pub mod entities;
pub mod migrator;
pub mod repositories;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./evswap.db?mode=rwc";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./evswap.db?mode=rwc")
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            connect_timeout_secs: 8,
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);
    let mut opts = ConnectOptions::new(config.url.clone());
    opts.max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);
    let db = Database::connect(opts).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Fresh in-memory database with every migration applied.
///
/// A single pooled connection keeps the in-memory schema alive for the
/// lifetime of the returned handle.
#[cfg(test)]
pub async fn test_connection() -> DatabaseConnection {
    use sea_orm_migration::MigratorTrait;

    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("in-memory sqlite");
    migrator::Migrator::up(&db, None)
        .await
        .expect("migrations apply");
    db
}
