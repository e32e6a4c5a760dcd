//! Хранилище-заглушка для тестов доменного слоя и супервизора.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::memory::MemoryStorage;
use super::{Storage, StorageError};
use crate::models::{Event, Place, Show};

pub(crate) type Journal = Arc<Mutex<Vec<&'static str>>>;

#[derive(Default)]
pub(crate) struct StubStorage {
    inner: MemoryStorage,
    fail_connect: bool,
    stall: bool,
    journal: Journal,
}

impl StubStorage {
    pub(crate) fn failing_connect() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    /// Все операции с данными зависают навсегда.
    pub(crate) fn stalled() -> Self {
        Self {
            stall: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    fn record(&self, entry: &'static str) {
        self.journal.lock().unwrap().push(entry);
    }

    async fn gate(&self) {
        if self.stall {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl Storage for StubStorage {
    async fn connect(&self) -> Result<(), StorageError> {
        self.record("connect");
        if self.fail_connect {
            return Err(StorageError::NotConnected);
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.record("close");
        Ok(())
    }

    async fn get_shows(&self) -> Result<Vec<Show>, StorageError> {
        self.gate().await;
        self.inner.get_shows().await
    }

    async fn create_shows(&self, shows: Vec<Show>) -> Result<Vec<Show>, StorageError> {
        self.gate().await;
        self.inner.create_shows(shows).await
    }

    async fn create_show(&self, show: Show) -> Result<Show, StorageError> {
        self.gate().await;
        self.inner.create_show(show).await
    }

    async fn get_events(&self) -> Result<Vec<Event>, StorageError> {
        self.gate().await;
        self.inner.get_events().await
    }

    async fn create_events(&self, events: Vec<Event>) -> Result<Vec<Event>, StorageError> {
        self.gate().await;
        self.inner.create_events(events).await
    }

    async fn create_event(&self, event: Event) -> Result<Event, StorageError> {
        self.gate().await;
        self.inner.create_event(event).await
    }

    async fn get_places(&self) -> Result<Vec<Place>, StorageError> {
        self.gate().await;
        self.inner.get_places().await
    }

    async fn create_places(&self, places: Vec<Place>) -> Result<Vec<Place>, StorageError> {
        self.gate().await;
        self.inner.create_places(places).await
    }

    async fn create_place(&self, place: Place) -> Result<Place, StorageError> {
        self.gate().await;
        self.inner.create_place(place).await
    }
}
