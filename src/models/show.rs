use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    // Пусто до первого upsert по существующему имени
    pub updated_at: Option<DateTime<Utc>>,
}

impl Show {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
