use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{DatabaseError, DatabaseManager, Store};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Open the configured store and build the state around it.
    pub async fn connect(config: AppConfig) -> Result<Self, DatabaseError> {
        let store = DatabaseManager::connect(&config.database).await?;
        Ok(Self::new(config, store))
    }
}
