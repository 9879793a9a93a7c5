//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with all routes
//! - Wire up middleware (trace, pipeline, panic catching, timeout, body limit)
//! - Own the shared application state
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::handlers;
use crate::http::pipeline::{handle_panic, request_pipeline};
use crate::security::RateLimiter;
use crate::store::{FeatureStore, ItemStore};
use crate::upload::UploadStore;

/// Headroom above the upload limit so oversized files reach the validation
/// pipeline and get a 422 problem instead of a bare 413.
const BODY_LIMIT_SLACK: usize = 2 * 1024 * 1024;

/// Shared application state injected into handlers and the pipeline.
#[derive(Clone)]
pub struct AppState {
    pub features: Arc<FeatureStore>,
    pub items: Arc<ItemStore>,
    pub limiter: Arc<RateLimiter>,
    pub uploads: Arc<UploadStore>,
    pub upload_max_bytes: usize,
}

/// The HTTP server for the service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Build the server and all its state from a validated configuration.
    pub fn new(config: AppConfig) -> Self {
        let state = AppState {
            features: Arc::new(FeatureStore::new()),
            items: Arc::new(ItemStore::new()),
            limiter: Arc::new(RateLimiter::new(&config.rate_limit)),
            uploads: Arc::new(UploadStore::new(config.upload.dir.clone())),
            upload_max_bytes: config.upload.max_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route(
                "/features",
                get(handlers::list_features).post(handlers::create_feature),
            )
            .route("/features/top", get(handlers::top_features))
            .route("/features/{feature_id}", get(handlers::get_feature))
            .route("/features/{feature_id}/vote", post(handlers::vote_feature))
            .route("/items", post(handlers::create_item))
            .route("/items/{item_id}", get(handlers::get_item))
            .route("/upload", post(handlers::upload_file))
            .fallback(handlers::not_found)
            .with_state(state.clone())
            // Layers added later wrap the ones before them: the pipeline sees
            // panic/timeout/limit responses, TraceLayer sees everything.
            .layer(DefaultBodyLimit::max(
                config.upload.max_bytes + BODY_LIMIT_SLACK,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(middleware::from_fn_with_state(state, request_pipeline))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
