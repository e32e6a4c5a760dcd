pub mod ticket;
pub mod upstream;

use async_trait::async_trait;

use crate::models::{Event, Place, Show};
use crate::storage::StorageError;

/// То, что HTTP-слой использует от доменного слоя.
#[async_trait]
pub trait Application: Send + Sync {
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
