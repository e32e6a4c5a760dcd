use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::services::upstream::UpstreamError;
use crate::storage::StorageError;

/// Ошибка обработчика. Клиент всегда получает `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        source: StorageError,
    },
    #[error("not found")]
    NotFound,
}

impl AppError {
    pub fn storage(context: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| AppError::Storage { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream(UpstreamError::Request(_) | UpstreamError::Status(_)) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Upstream(UpstreamError::Decode(_)) => StatusCode::BAD_REQUEST,
            AppError::Upstream(UpstreamError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Storage {
                source: StorageError::Timeout,
                ..
            } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
