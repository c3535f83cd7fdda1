//! HTTP trigger
//!
//! `POST /` runs one sweep per request and replies with its counters.
//! Each request gets its own credentials, timeline and cursor; everything in
//! `AppState` is shared read-only.

mod protocol;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub use protocol::{SweepRequest, SweepResponse};

use crate::config::AppConfig;
use crate::credentials::{self, CredentialProvider};
use crate::retention::RetentionPolicy;
use crate::sweep::{Clock, Sweeper, SystemClock, DEFAULT_PAGE_SIZE};
use crate::timeline::{TimelineConnector, TwitterConnector};
use crate::Result;

/// Shared, read-only dependencies of every request
#[derive(Clone)]
pub struct AppState {
    credentials: Arc<dyn CredentialProvider>,
    connector: Arc<dyn TimelineConnector>,
    policy: Arc<RetentionPolicy>,
    clock: Arc<dyn Clock>,
    page_size: u32,
}

impl AppState {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        connector: Arc<dyn TimelineConnector>,
        policy: Arc<RetentionPolicy>,
    ) -> Self {
        Self {
            credentials,
            connector,
            policy,
            clock: Arc::new(SystemClock),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Wire up the production stack from config
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = credentials::from_config(config).await?;
        info!("Using {} credential provider", provider.name());

        Ok(Self::new(
            provider,
            Arc::new(TwitterConnector::new(config.twitter.clone())),
            Arc::new(RetentionPolicy::from_config(&config.retention)),
        )
        .with_page_size(config.twitter.page_size))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(run_sweep))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `0.0.0.0:port` and serve until `shutdown` resolves
pub async fn serve<F>(state: AppState, port: u16, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn run_sweep(State(state): State<AppState>, body: Bytes) -> Response {
    let request: SweepRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejecting malformed request: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let credentials = match state.credentials.credentials().await {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Failed to obtain credentials: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let timeline = match state.connector.connect(credentials).await {
        Ok(timeline) => timeline,
        Err(e) => {
            error!("Failed to create API client: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let result = Sweeper::new(timeline, state.policy.clone())
        .with_clock(state.clock.clone())
        .with_page_size(state.page_size)
        .run(request)
        .await;

    Json(SweepResponse::from(result)).into_response()
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
