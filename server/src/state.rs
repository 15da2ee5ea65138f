// server/src/state.rs
use crate::config::{AppConfig, StorageBackend};
use crate::errors::{AppError, Result};
use printshop::{MemoryStore, PgStore, Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Storage>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(store: Arc<dyn Storage>, config: AppConfig) -> Self {
    Self {
      store,
      config: Arc::new(config),
    }
  }

  /// Builds the storage backend named by the configuration.
  pub async fn from_config(config: AppConfig) -> Result<Self> {
    let store: Arc<dyn Storage> = match config.storage_backend {
      StorageBackend::Memory => {
        tracing::warn!("Using the in-memory store; data is lost on restart.");
        Arc::new(MemoryStore::new())
      }
      StorageBackend::Postgres => {
        let url = config
          .database_url
          .as_deref()
          .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres backend".to_string()))?;
        Arc::new(PgStore::connect(url, config.database_max_connections).await?)
      }
    };
    Ok(Self::new(store, config))
  }
}
