use async_trait::async_trait;
use axum::Router;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{config::HttpConfig, controllers, AppState};

/// Сервер под управлением супервизора.
#[async_trait]
pub trait Server: Send + Sync {
    /// Работает до остановки или до фатальной ошибки.
    async fn start(&self) -> io::Result<()>;
    /// Просит `start` завершиться и ждёт, пока он вернётся.
    async fn stop(&self) -> io::Result<()>;
}

pub struct HttpServer {
    host: String,
    port: u16,
    router: Router,
    shutdown: CancellationToken,
    finished: CancellationToken,
}

impl HttpServer {
    pub fn new(config: &HttpConfig, state: Arc<AppState>) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            router: controllers::router(state),
            shutdown: CancellationToken::new(),
            finished: CancellationToken::new(),
        }
    }

    async fn serve(&self) -> io::Result<()> {
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        info!("http server started on {}", listener.local_addr()?);

        axum::serve(
            listener,
            self.router
                .clone()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(self.shutdown.clone().cancelled_owned())
        .await
    }
}

#[async_trait]
impl Server for HttpServer {
    async fn start(&self) -> io::Result<()> {
        let result = self.serve().await;
        self.finished.cancel();
        result
    }

    async fn stop(&self) -> io::Result<()> {
        self.shutdown.cancel();
        self.finished.cancelled().await;
        info!("http server shutdown");
        Ok(())
    }
}
