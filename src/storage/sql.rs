//! PostgreSQL-хранилище на sqlx.
//!
//! Важная особенность: `create_*` не возвращают ошибок уровня строки.
//! Пакетные версии отдают то, что успели сохранить до первой ошибки,
//! одиночные отдают входной объект без изменений (id = 0). Ошибка при этом
//! только логируется. Поведение унаследовано от исходного сервиса и
//! сохранено намеренно, см. DESIGN.md.

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::{Storage, StorageError};
use crate::models::{Event, Place, Show};

const UPSERT_SHOW: &str = "INSERT INTO shows (name) VALUES ($1)
     ON CONFLICT (name) DO UPDATE SET updated_at = now()
     RETURNING id, name, created_at, updated_at";

const UPSERT_EVENT: &str = "INSERT INTO events (show_id, date) VALUES ($1, $2)
     ON CONFLICT (show_id, date) DO UPDATE SET updated_at = now()
     RETURNING id, show_id, date, created_at, updated_at";

const UPSERT_PLACE: &str = "INSERT INTO places (x, y, width, height, is_available) VALUES ($1, $2, $3, $4, $5)
     ON CONFLICT (x, y, width, height) DO UPDATE SET updated_at = now()
     RETURNING id, x, y, width, height, is_available, created_at, updated_at";

pub struct SqlStorage {
    dsn: String,
    pool_size: u32,
    pool: OnceCell<PgPool>,
}

impl SqlStorage {
    pub fn new(dsn: &str, pool_size: u32) -> Self {
        Self {
            dsn: dsn.to_string(),
            pool_size,
            pool: OnceCell::new(),
        }
    }

    fn pool(&self) -> Result<&PgPool, StorageError> {
        self.pool.get().ok_or(StorageError::NotConnected)
    }

    async fn upsert_show(pool: &PgPool, show: &Show) -> Result<Show, sqlx::Error> {
        sqlx::query_as::<_, Show>(UPSERT_SHOW)
            .bind(&show.name)
            .fetch_one(pool)
            .await
    }

    async fn upsert_event(pool: &PgPool, event: &Event) -> Result<Event, sqlx::Error> {
        sqlx::query_as::<_, Event>(UPSERT_EVENT)
            .bind(event.show_id)
            .bind(&event.date)
            .fetch_one(pool)
            .await
    }

    async fn upsert_place(pool: &PgPool, place: &Place) -> Result<Place, sqlx::Error> {
        sqlx::query_as::<_, Place>(UPSERT_PLACE)
            .bind(place.x)
            .bind(place.y)
            .bind(place.width)
            .bind(place.height)
            .bind(place.is_available)
            .fetch_one(pool)
            .await
    }
}

#[async_trait]
impl Storage for SqlStorage {
    async fn connect(&self) -> Result<(), StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(self.pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&self.dsn)
            .await?;
        info!("Database connected");

        info!("Running database migrations...");
        sqlx::migrate!("./src/migrations").run(&pool).await?;
        info!("Migrations completed");

        if self.pool.set(pool).is_err() {
            warn!("Storage already connected, keeping the existing pool");
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            info!("Database pool closed");
        }
        Ok(())
    }

    async fn get_shows(&self) -> Result<Vec<Show>, StorageError> {
        let shows = sqlx::query_as::<_, Show>(
            "SELECT id, name, created_at, updated_at FROM shows ORDER BY id",
        )
        .fetch_all(self.pool()?)
        .await?;
        Ok(shows)
    }

    async fn create_shows(&self, shows: Vec<Show>) -> Result<Vec<Show>, StorageError> {
        let pool = self.pool()?;
        let mut inserted = Vec::with_capacity(shows.len());
        for show in &shows {
            match Self::upsert_show(pool, show).await {
                Ok(row) => inserted.push(row),
                Err(e) => {
                    warn!("create_shows stopped at {:?}: {:?}", show.name, e);
                    return Ok(inserted);
                }
            }
        }
        Ok(inserted)
    }

    async fn create_show(&self, show: Show) -> Result<Show, StorageError> {
        let pool = self.pool()?;
        match Self::upsert_show(pool, &show).await {
            Ok(row) => Ok(row),
            Err(e) => {
                warn!("create_show {:?} not stored: {:?}", show.name, e);
                Ok(show)
            }
        }
    }

    async fn get_events(&self) -> Result<Vec<Event>, StorageError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, show_id, date, created_at, updated_at FROM events ORDER BY id",
        )
        .fetch_all(self.pool()?)
        .await?;
        Ok(events)
    }

    async fn create_events(&self, events: Vec<Event>) -> Result<Vec<Event>, StorageError> {
        let pool = self.pool()?;
        let mut inserted = Vec::with_capacity(events.len());
        for event in &events {
            match Self::upsert_event(pool, event).await {
                Ok(row) => inserted.push(row),
                Err(e) => {
                    warn!(
                        "create_events stopped at show_id={} date={:?}: {:?}",
                        event.show_id, event.date, e
                    );
                    return Ok(inserted);
                }
            }
        }
        Ok(inserted)
    }

    async fn create_event(&self, event: Event) -> Result<Event, StorageError> {
        let pool = self.pool()?;
        match Self::upsert_event(pool, &event).await {
            Ok(row) => Ok(row),
            Err(e) => {
                warn!(
                    "create_event show_id={} date={:?} not stored: {:?}",
                    event.show_id, event.date, e
                );
                Ok(event)
            }
        }
    }

    async fn get_places(&self) -> Result<Vec<Place>, StorageError> {
        let places = sqlx::query_as::<_, Place>(
            "SELECT id, x, y, width, height, is_available, created_at, updated_at
             FROM places ORDER BY id",
        )
        .fetch_all(self.pool()?)
        .await?;
        Ok(places)
    }

    async fn create_places(&self, places: Vec<Place>) -> Result<Vec<Place>, StorageError> {
        let pool = self.pool()?;
        let mut inserted = Vec::with_capacity(places.len());
        for place in &places {
            match Self::upsert_place(pool, place).await {
                Ok(row) => inserted.push(row),
                Err(e) => {
                    warn!("create_places stopped at {:?}: {:?}", place.key(), e);
                    return Ok(inserted);
                }
            }
        }
        Ok(inserted)
    }

    async fn create_place(&self, place: Place) -> Result<Place, StorageError> {
        let pool = self.pool()?;
        match Self::upsert_place(pool, &place).await {
            Ok(row) => Ok(row),
            Err(e) => {
                warn!("create_place {:?} not stored: {:?}", place.key(), e);
                Ok(place)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn calls_before_connect_fail_with_not_connected() {
        let storage = SqlStorage::new("postgres://localhost/tickets", 1);

        assert!(matches!(
            storage.get_shows().await,
            Err(StorageError::NotConnected)
        ));
        assert!(matches!(
            storage.create_show(Show::new("x")).await,
            Err(StorageError::NotConnected)
        ));
        assert!(matches!(
            storage.create_places(vec![]).await,
            Err(StorageError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn close_without_connect_is_noop() {
        let storage = SqlStorage::new("postgres://localhost/tickets", 1);
        assert!(storage.close().await.is_ok());
    }

    /// Пул, который никогда не получит соединение: каждая строка падает.
    fn unreachable_storage() -> SqlStorage {
        let storage = SqlStorage::new("postgres://127.0.0.1:1/none", 1);
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(100))
            .connect_lazy(&storage.dsn)
            .unwrap();
        storage.pool.set(pool).unwrap();
        storage
    }

    #[tokio::test]
    async fn row_errors_are_logged_not_returned() {
        let storage = unreachable_storage();

        let stored = storage
            .create_shows(vec![Show::new("A"), Show::new("B")])
            .await
            .unwrap();
        assert!(stored.is_empty());

        let show = storage.create_show(Show::new("C")).await.unwrap();
        assert_eq!(show.id, 0);
        assert_eq!(show.name, "C");

        let place = storage
            .create_place(Place::new(0.0, 0.0, 1.0, 1.0, true))
            .await
            .unwrap();
        assert_eq!(place.id, 0);
        let events = storage
            .create_events(vec![Event::new(1, "2024-01-01")])
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn reads_still_fail_on_broken_pool() {
        let storage = unreachable_storage();
        assert!(matches!(
            storage.get_shows().await,
            Err(StorageError::Database(_))
        ));
    }
}
