use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::Application;
use crate::models::{Event, Place, Show};
use crate::storage::{Storage, StorageError};

/// Таймаут на каждый вызов хранилища.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(2);
/// Сколько ждём первичного подключения к хранилищу.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Доменный слой: хранилище плюс таймауты.
pub struct Ticket {
    storage: Arc<dyn Storage>,
    call_timeout: Duration,
}

impl Ticket {
    /// Подключает хранилище. Ошибка здесь фатальна для процесса,
    /// решение об остановке принимает вызывающий.
    pub async fn new(storage: Arc<dyn Storage>) -> Result<Self, StorageError> {
        tokio::time::timeout(CONNECT_TIMEOUT, storage.connect())
            .await
            .map_err(|_| StorageError::Timeout)??;
        info!("Storage connected");

        Ok(Self {
            storage,
            call_timeout: CALL_TIMEOUT,
        })
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Закрывает хранилище. Общий дедлайн остановки задаёт супервизор.
    pub async fn close(&self) -> Result<(), StorageError> {
        self.storage.close().await?;
        info!("Storage closed");
        Ok(())
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>> + Send,
    {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| StorageError::Timeout)?
    }
}

#[async_trait]
impl Application for Ticket {
    async fn get_shows(&self) -> Result<Vec<Show>, StorageError> {
        self.bounded(self.storage.get_shows()).await
    }

    async fn create_shows(&self, shows: Vec<Show>) -> Result<Vec<Show>, StorageError> {
        self.bounded(self.storage.create_shows(shows)).await
    }

    async fn create_show(&self, show: Show) -> Result<Show, StorageError> {
        self.bounded(self.storage.create_show(show)).await
    }

    async fn get_events(&self) -> Result<Vec<Event>, StorageError> {
        self.bounded(self.storage.get_events()).await
    }

    async fn create_events(&self, events: Vec<Event>) -> Result<Vec<Event>, StorageError> {
        self.bounded(self.storage.create_events(events)).await
    }

    async fn create_event(&self, event: Event) -> Result<Event, StorageError> {
        self.bounded(self.storage.create_event(event)).await
    }

    async fn get_places(&self) -> Result<Vec<Place>, StorageError> {
        self.bounded(self.storage.get_places()).await
    }

    async fn create_places(&self, places: Vec<Place>) -> Result<Vec<Place>, StorageError> {
        self.bounded(self.storage.create_places(places)).await
    }

    async fn create_place(&self, place: Place) -> Result<Place, StorageError> {
        self.bounded(self.storage.create_place(place)).await
    }
}
