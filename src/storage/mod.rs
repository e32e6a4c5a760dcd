pub mod memory;
pub mod sql;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::{StorageConfig, StorageKind};
use crate::models::{Event, Place, Show};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not connected")]
    NotConnected,
    #[error("storage call timed out")]
    Timeout,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Хранилище шоу, событий и мест.
///
/// Все `create_*` работают как upsert по естественному ключу:
/// имя шоу, пара `(show_id, date)` для события и геометрия места.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn connect(&self) -> Result<(), StorageError>;
    async fn close(&self) -> Result<(), StorageError>;

    async fn get_shows(&self) -> Result<Vec<Show>, StorageError>;
    async fn create_shows(&self, shows: Vec<Show>) -> Result<Vec<Show>, StorageError>;
    async fn create_show(&self, show: Show) -> Result<Show, StorageError>;

    async fn get_events(&self) -> Result<Vec<Event>, StorageError>;
    async fn create_events(&self, events: Vec<Event>) -> Result<Vec<Event>, StorageError>;
    async fn create_event(&self, event: Event) -> Result<Event, StorageError>;

    async fn get_places(&self) -> Result<Vec<Place>, StorageError>;
    async fn create_places(&self, places: Vec<Place>) -> Result<Vec<Place>, StorageError>;
    async fn create_place(&self, place: Place) -> Result<Place, StorageError>;
}

/// Выбирает реализацию хранилища по конфигу.
pub fn new_storage(conf: &StorageConfig) -> Arc<dyn Storage> {
    match conf.db {
        StorageKind::Sql => {
            info!("Using SQL storage");
            Arc::new(sql::SqlStorage::new(&conf.dsn, conf.pool_size))
        }
        StorageKind::InMemory => {
            info!("Using in-memory storage");
            Arc::new(memory::MemoryStorage::new())
        }
    }
}

#[cfg(test)]
pub(crate) mod testing;
