//! # HTTP Server
//!
//! Binds the gateway listener and, when configured, the metrics listener.
//! Both stop together on the shutdown signal.

use std::future::{Future, IntoFuture};
use std::io;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::config::HttpServerConfig;
use super::gateway_routes::{gateway_routes, GatewayState};
use super::observability_routes::observability_routes;
use crate::core::EngineAdapter;
use crate::observability::MetricsRegistry;

/// HTTP Server for the sqlgate gateway
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
    metrics: Arc<MetricsRegistry>,
}

impl HttpServer {
    /// Create a server around the given adapter
    pub fn new(config: HttpServerConfig, adapter: EngineAdapter) -> Self {
        let metrics = Arc::clone(adapter.metrics());
        let router = Self::build_router(&config, adapter);
        Self {
            config,
            router,
            metrics,
        }
    }

    /// Build the gateway router with its middleware stack
    pub fn build_router(config: &HttpServerConfig, adapter: EngineAdapter) -> Router {
        let state = Arc::new(GatewayState::new(adapter));

        let mut router = gateway_routes(state);
        // Dropping the timed-out handler cancels its statement
        if let Some(timeout) = config.request_timeout() {
            router = router.layer(TimeoutLayer::new(timeout));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        request_id = %Uuid::new_v4(),
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }))
                .layer(DefaultBodyLimit::max(config.max_body_bytes)),
        )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        self.serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutdown signal received");
        })
        .await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn serve<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(async move {
            shutdown.await;
            let _ = stop_tx.send(true);
        });

        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        tracing::info!(addr = %listener.local_addr()?, "gateway listening: POST /exec, POST /query");
        let gateway = axum::serve(listener, self.router)
            .with_graceful_shutdown(stopped(stop_rx.clone()))
            .into_future();

        match self.config.metrics_socket_addr() {
            Some(addr) => {
                let listener = TcpListener::bind(addr).await?;
                tracing::info!(addr = %listener.local_addr()?, "metrics listening: GET /metrics, GET /health");
                let metrics = axum::serve(listener, observability_routes(self.metrics))
                    .with_graceful_shutdown(stopped(stop_rx))
                    .into_future();
                tokio::try_join!(gateway, metrics)?;
            }
            None => gateway.await?,
        }

        tracing::info!("server stopped");
        Ok(())
    }
}

async fn stopped(mut rx: watch::Receiver<bool>) {
    // A dropped sender also ends the wait
    let _ = rx.wait_for(|stop| *stop).await;
}
