use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(|| async { "OK healthz\n" }))
        .route("/readiness", get(|| async { "OK readiness\n" }))
}
