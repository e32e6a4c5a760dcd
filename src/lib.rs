pub mod config;
pub mod logger;
pub mod models;
pub mod storage;
pub mod services;
pub mod controllers;
pub mod middleware;
pub mod error;
pub mod server;
pub mod supervisor;

use std::sync::Arc;

use services::{upstream::UpstreamClient, Application};

// Shared state для всех обработчиков
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<dyn Application>,
    pub upstream: UpstreamClient,
}
