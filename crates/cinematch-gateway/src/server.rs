use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use cinematch_core::QueryService;
use tokio::sync::watch;

use crate::error::GatewayError;
use crate::router::build_router;

#[derive(Clone)]
pub(crate) struct AppState {
    pub service: Arc<dyn QueryService>,
    pub started_at: Instant,
}

pub struct GatewayServer {
    addr: SocketAddr,
    path: String,
    max_body_size: usize,
    service: Arc<dyn QueryService>,
    shutdown_rx: watch::Receiver<bool>,
}

impl GatewayServer {
    #[must_use]
    pub fn new(
        bind: &str,
        port: u16,
        service: Arc<dyn QueryService>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let addr: SocketAddr = format!("{bind}:{port}").parse().unwrap_or_else(|e| {
            tracing::warn!("invalid bind '{bind}': {e}, falling back to 127.0.0.1:{port}");
            SocketAddr::from(([127, 0, 0, 1], port))
        });

        if bind == "0.0.0.0" {
            tracing::warn!("gateway binding to 0.0.0.0, reachable from every interface");
        }

        Self {
            addr,
            path: "/api/match".into(),
            max_body_size: 1_048_576,
            service,
            shutdown_rx,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Start the HTTP server and run until the shutdown signal flips to `true`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or encounters a fatal I/O error.
    pub async fn serve(self) -> Result<(), GatewayError> {
        let state = AppState {
            service: self.service,
            started_at: Instant::now(),
        };

        let router = build_router(state, &self.path, self.max_body_size);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| GatewayError::Bind(self.addr.to_string(), e))?;
        tracing::info!("gateway listening on {}{}", self.addr, self.path);

        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                while !*shutdown_rx.borrow_and_update() {
                    if shutdown_rx.changed().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
                tracing::info!("gateway shutting down");
            })
            .await
            .map_err(|e| GatewayError::Server(format!("{e}")))?;

        Ok(())
    }
}
