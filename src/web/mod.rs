//! Web server module.

mod handlers;

pub use handlers::*;

use crate::analytics::AnalyticsEngine;
use crate::config::ServerConfig;
use crate::source::HttpSampleSource;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub engine: Arc<AnalyticsEngine<HttpSampleSource>>,
}

/// Web server for ProbeScope.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(config: ServerConfig, engine: Arc<AnalyticsEngine<HttpSampleSource>>) -> Self {
        Self {
            state: AppState { config, engine },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

        Router::new()
            .route("/api/analytics", get(handlers::handle_get_records))
            .route("/api/analytics/comparisons", get(handlers::handle_get_comparisons))
            .route("/api/analytics/export", get(handlers::handle_export))
            .route("/api/analytics/refresh", post(handlers::handle_refresh))
            .route("/api/analytics/options", get(handlers::handle_get_options))
            .route("/api/analytics/options", put(handlers::handle_set_options))
            .route("/api/analytics/auto-refresh", put(handlers::handle_auto_refresh))
            .layer(cors)
            .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
