use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::{error::AppError, models::upstream::ShowResponse, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/shows", get(get_shows))
}

// GET /shows
pub async fn get_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShowResponse>>, AppError> {
    // 1. Забираем список у внешнего API
    let list = state.upstream.shows().await?;

    // 2. Сохраняем по одному, на первой ошибке выходим
    for show in &list.response {
        state
            .app
            .create_show(show.into())
            .await
            .map_err(AppError::storage("failed to create show"))?;
    }

    Ok(Json(list.response))
}
