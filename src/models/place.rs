use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Place {
    pub fn new(x: f64, y: f64, width: f64, height: f64, is_available: bool) -> Self {
        Self {
            x,
            y,
            width,
            height,
            is_available,
            ..Default::default()
        }
    }

    /// Ключ upsert: геометрия места. Сравнение по битам, чтобы f64 можно было положить в HashMap.
    /// -0.0 и 0.0 дают один ключ, как в UNIQUE у Postgres.
    pub fn key(&self) -> (u64, u64, u64, u64) {
        (
            key_bits(self.x),
            key_bits(self.y),
            key_bits(self.width),
            key_bits(self.height),
        )
    }
}

fn key_bits(v: f64) -> u64 {
    // -0.0 + 0.0 == +0.0
    (v + 0.0).to_bits()
}
