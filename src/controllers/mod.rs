pub mod health;
pub mod shows;
pub mod events;
pub mod places;

use axum::{
    http::{header, HeaderValue},
    Router,
};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::{error::AppError, middleware, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::routes())
        .merge(shows::routes())
        .merge(events::routes())
        .merge(places::routes())
}

/// Полный роутер: маршруты, access-лог и принудительный JSON Content-Type.
pub fn router(state: Arc<AppState>) -> Router {
    routes()
        .fallback(not_found)
        .layer(axum::middleware::from_fn(middleware::log_request))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Аналог `{id:[0-9]+}`: всё, что не число, считаем несуществующим маршрутом.
pub(crate) fn numeric_id(raw: &str) -> Result<&str, AppError> {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        Ok(raw)
    } else {
        Err(AppError::NotFound)
    }
}
