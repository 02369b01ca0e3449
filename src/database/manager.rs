use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::memory::MemoryStore;
use super::postgres::PgStore;
use super::store::Store;
use crate::config::{DatabaseConfig, MEMORY_DATABASE_URL};

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedUrl(String),

    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Opens the configured store once at startup.
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        let url = config.url.trim();
        if url.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }

        if url == MEMORY_DATABASE_URL {
            info!("Using in-memory store");
            return Ok(Arc::new(MemoryStore::new()));
        }

        if !Self::is_postgres_url(url) {
            return Err(DatabaseError::UnsupportedUrl(Self::scheme(url).to_string()));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("Connected to database and applied migrations");
        Ok(Arc::new(PgStore::new(pool)))
    }

    fn is_postgres_url(url: &str) -> bool {
        matches!(Self::scheme(url), "postgres" | "postgresql")
    }

    fn scheme(url: &str) -> &str {
        url.split_once("://").map(|(scheme, _)| scheme).unwrap_or(url)
    }
}
