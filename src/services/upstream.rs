//! Клиент внешнего каталога шоу.
//!
//! Каждый список приходит в конверте `{"response": [...]}`. Тело читаем
//! целиком и парсим сами, чтобы отличать сетевую ошибку от кривого JSON.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::config::UpstreamConfig;
use crate::models::upstream::{Envelope, EventListResponse, PlaceListResponse, ShowListResponse};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to do request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream responded with status {0}")]
    Status(StatusCode),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid upstream payload: {0}")]
    Validation(#[from] ValidationErrors),
}

#[derive(Clone)]
pub struct UpstreamClient {
    /// Базовый URL без завершающего слэша.
    base_url: String,
    http_client: reqwest::Client,
}

impl UpstreamClient {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub async fn shows(&self) -> Result<ShowListResponse, UpstreamError> {
        self.fetch("/shows").await
    }

    pub async fn events(&self, show_id: &str) -> Result<EventListResponse, UpstreamError> {
        self.fetch(&format!("/shows/{show_id}/events")).await
    }

    pub async fn places(&self, event_id: &str) -> Result<PlaceListResponse, UpstreamError> {
        self.fetch(&format!("/events/{event_id}/places")).await
    }

    async fn fetch<T>(&self, path: &str) -> Result<Envelope<T>, UpstreamError>
    where
        T: DeserializeOwned + Validate,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching upstream {}", url);

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        envelope.validate_items()?;
        Ok(envelope)
    }
}
