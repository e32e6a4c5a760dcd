use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub show_id: i64,
    pub date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn new(show_id: i64, date: impl Into<String>) -> Self {
        Self {
            show_id,
            date: date.into(),
            ..Default::default()
        }
    }
}
