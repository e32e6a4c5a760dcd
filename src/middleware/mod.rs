use axum::{
    extract::{ConnectInfo, Request},
    http::header::USER_AGENT,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::debug;

/// Access-лог: пишется после обработчика, когда статус уже известен.
pub async fn log_request(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let started_at = chrono::Local::now()
        .format("%d/%b/%Y:%H:%M:%S %z")
        .to_string();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let response = next.run(req).await;
    let status = response.status();

    debug!(
        "{} [{}] {} {} {} {} {:?} {}",
        remote,
        started_at,
        method,
        uri,
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
        start.elapsed(),
        user_agent,
    );

    response
}
