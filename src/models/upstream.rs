//! Модели ответов внешнего каталога.
//!
//! Внешний API заворачивает любой список в конверт `{"response": [...]}`.
//! Мы отдаём клиенту ровно то, что распарсили, поэтому те же структуры
//! используются и для сериализации ответа.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::{Event, Place, Show};

/// Конверт `{"response": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub response: Vec<T>,
}

impl<T: Validate> Envelope<T> {
    /// Проверяет каждый элемент; пустой список считается валидным.
    pub fn validate_items(&self) -> Result<(), ValidationErrors> {
        self.response.iter().try_for_each(Validate::validate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ShowResponse {
    #[validate(range(min = 1))]
    pub id: i64,
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EventResponse {
    #[validate(range(min = 1))]
    pub id: i64,
    #[serde(rename = "showId")]
    #[validate(range(min = 1))]
    pub show_id: i64,
    #[validate(length(min = 1))]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlaceResponse {
    #[validate(range(min = 1))]
    pub id: i64,
    #[validate(range(min = 0.0))]
    pub x: f64,
    #[validate(range(min = 0.0))]
    pub y: f64,
    #[validate(range(min = 0.0))]
    pub width: f64,
    #[validate(range(min = 0.0))]
    pub height: f64,
    pub is_available: bool,
}

pub type ShowListResponse = Envelope<ShowResponse>;
pub type EventListResponse = Envelope<EventResponse>;
pub type PlaceListResponse = Envelope<PlaceResponse>;

// id из внешнего API не переносим: локальные id выдаёт хранилище
impl From<&ShowResponse> for Show {
    fn from(r: &ShowResponse) -> Self {
        Show::new(r.name.clone())
    }
}

impl From<&EventResponse> for Event {
    fn from(r: &EventResponse) -> Self {
        Event::new(r.show_id, r.date.clone())
    }
}

impl From<&PlaceResponse> for Place {
    fn from(r: &PlaceResponse) -> Self {
        Place::new(r.x, r.y, r.width, r.height, r.is_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_show_envelope() {
        let body = r#"{"response":[{"id":1,"name":"Show #1"},{"id":2,"name":"Show #2"}]}"#;
        let list: ShowListResponse = serde_json::from_str(body).unwrap();

        assert_eq!(list.response.len(), 2);
        assert_eq!(list.response[0].name, "Show #1");
        assert_eq!(list.response[1].id, 2);
        assert!(list.validate_items().is_ok());
    }

    #[test]
    fn event_uses_camel_case_show_id() {
        let body = r#"{"response":[{"id":7,"showId":3,"date":"2024-01-01T19:00:00Z"}]}"#;
        let list: EventListResponse = serde_json::from_str(body).unwrap();

        assert_eq!(list.response[0].show_id, 3);
        assert_eq!(Event::from(&list.response[0]).show_id, 3);
    }

    #[test]
    fn empty_list_is_valid() {
        let list: PlaceListResponse = serde_json::from_str(r#"{"response":[]}"#).unwrap();
        assert!(list.validate_items().is_ok());
    }

    #[test]
    fn rejects_blank_name_and_zero_id() {
        let list = ShowListResponse {
            response: vec![
                ShowResponse { id: 1, name: "ok".into() },
                ShowResponse { id: 0, name: "".into() },
            ],
        };
        let errors = list.validate_items().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("id"));
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn rejects_negative_place_geometry() {
        let list = PlaceListResponse {
            response: vec![PlaceResponse {
                id: 1,
                x: 10.0,
                y: -1.0,
                width: 5.0,
                height: 5.0,
                is_available: true,
            }],
        };
        assert!(list.validate_items().is_err());
    }

    #[test]
    fn place_serializes_snake_case_availability() {
        let place = PlaceResponse {
            id: 1,
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            is_available: false,
        };
        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(json["is_available"], false);
    }
}
