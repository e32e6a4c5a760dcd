use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::numeric_id;
use crate::{error::AppError, models::upstream::EventResponse, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/shows/{id}/events", get(get_events))
}

// GET /shows/{id}/events
pub async fn get_events(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let show_id = numeric_id(&id)?;
    let list = state.upstream.events(show_id).await?;

    for event in &list.response {
        state
            .app
            .create_event(event.into())
            .await
            .map_err(AppError::storage("failed to create event"))?;
    }

    Ok(Json(list.response))
}
