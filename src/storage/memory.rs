use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use super::{Storage, StorageError};
use crate::models::{Event, Place, Show};

#[derive(Default)]
struct Tables {
    shows: HashMap<i64, Show>,
    events: HashMap<i64, Event>,
    places: HashMap<i64, Place>,
}

/// Хранилище в памяти. Ошибок не возвращает.
///
/// Один `RwLock` на все таблицы, id выдаются из счётчика этого экземпляра
/// (общего для всех сущностей).
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<Tables>,
    next_id: AtomicI64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn upsert_show(&self, tables: &mut Tables, mut show: Show) -> Show {
        let now = Utc::now();
        if let Some(existing) = tables.shows.values_mut().find(|s| s.name == show.name) {
            existing.updated_at = Some(now);
            return existing.clone();
        }
        show.id = self.new_id();
        show.created_at = now;
        show.updated_at = None;
        tables.shows.insert(show.id, show.clone());
        show
    }

    fn upsert_event(&self, tables: &mut Tables, mut event: Event) -> Event {
        let now = Utc::now();
        if let Some(existing) = tables
            .events
            .values_mut()
            .find(|e| e.show_id == event.show_id && e.date == event.date)
        {
            existing.updated_at = Some(now);
            return existing.clone();
        }
        event.id = self.new_id();
        event.created_at = now;
        event.updated_at = None;
        tables.events.insert(event.id, event.clone());
        event
    }

    fn upsert_place(&self, tables: &mut Tables, mut place: Place) -> Place {
        let now = Utc::now();
        let key = place.key();
        if let Some(existing) = tables.places.values_mut().find(|p| p.key() == key) {
            existing.updated_at = Some(now);
            return existing.clone();
        }
        place.id = self.new_id();
        place.created_at = now;
        place.updated_at = None;
        tables.places.insert(place.id, place.clone());
        place
    }
}

fn sorted_by_id<T: Clone>(items: &HashMap<i64, T>) -> Vec<T> {
    let mut ids: Vec<_> = items.keys().copied().collect();
    ids.sort_unstable();
    ids.into_iter().map(|id| items[&id].clone()).collect()
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn connect(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn get_shows(&self) -> Result<Vec<Show>, StorageError> {
        Ok(sorted_by_id(&self.data.read().await.shows))
    }

    async fn create_shows(&self, shows: Vec<Show>) -> Result<Vec<Show>, StorageError> {
        let mut tables = self.data.write().await;
        Ok(shows
            .into_iter()
            .map(|show| self.upsert_show(&mut tables, show))
            .collect())
    }

    async fn create_show(&self, show: Show) -> Result<Show, StorageError> {
        let mut tables = self.data.write().await;
        Ok(self.upsert_show(&mut tables, show))
    }

    async fn get_events(&self) -> Result<Vec<Event>, StorageError> {
        Ok(sorted_by_id(&self.data.read().await.events))
    }

    async fn create_events(&self, events: Vec<Event>) -> Result<Vec<Event>, StorageError> {
        let mut tables = self.data.write().await;
        Ok(events
            .into_iter()
            .map(|event| self.upsert_event(&mut tables, event))
            .collect())
    }

    async fn create_event(&self, event: Event) -> Result<Event, StorageError> {
        let mut tables = self.data.write().await;
        Ok(self.upsert_event(&mut tables, event))
    }

    async fn get_places(&self) -> Result<Vec<Place>, StorageError> {
        Ok(sorted_by_id(&self.data.read().await.places))
    }

    async fn create_places(&self, places: Vec<Place>) -> Result<Vec<Place>, StorageError> {
        let mut tables = self.data.write().await;
        Ok(places
            .into_iter()
            .map(|place| self.upsert_place(&mut tables, place))
            .collect())
    }

    async fn create_place(&self, place: Place) -> Result<Place, StorageError> {
        let mut tables = self.data.write().await;
        Ok(self.upsert_place(&mut tables, place))
    }
}
