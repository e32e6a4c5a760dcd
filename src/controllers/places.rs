use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::numeric_id;
use crate::{error::AppError, models::upstream::PlaceResponse, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/events/{id}/places", get(get_places))
}

// GET /events/{id}/places
pub async fn get_places(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PlaceResponse>>, AppError> {
    let event_id = numeric_id(&id)?;
    let list = state.upstream.places(event_id).await?;

    for place in &list.response {
        state
            .app
            .create_place(place.into())
            .await
            .map_err(AppError::storage("failed to create place"))?;
    }

    Ok(Json(list.response))
}
