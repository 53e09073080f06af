//! HTTP transport: a thin axum layer over the mode router.
//!
//! Two routes only. `POST /deployments/{mode}/run` runs one exchange in
//! the named mode; `GET /health` reports liveness. All article access
//! happens behind the router's tool layer, so the transport never touches
//! the corpus directly.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::agent::{LlmProvider, Mode, ModeRouter};
use crate::config::AppConfig;
use crate::corpus::CorpusStore;
use crate::error::Error;
use crate::index::SemanticIndex;

/// Shared state for all request handlers.
///
/// Everything is behind `Arc` so the state clones per request cheaply;
/// the corpus itself is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Immutable article snapshot.
    pub store: Arc<CorpusStore>,
    /// External semantic index client.
    pub index: Arc<dyn SemanticIndex>,
    /// LLM provider backend.
    pub provider: Arc<dyn LlmProvider>,
    /// Service configuration.
    pub config: Arc<AppConfig>,
}

/// Request body for `POST /deployments/{mode}/run`.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    /// The user's question.
    pub query: String,
    /// Optional caller-supplied correlation id. Logged, otherwise unused;
    /// the service holds no session state.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for a successful exchange.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResponse {
    /// Final assistant answer.
    pub answer: String,
}

/// Maps a service error onto its HTTP status.
const fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Validation { .. } => StatusCode::BAD_REQUEST,
        Error::Forbidden { .. } => StatusCode::FORBIDDEN,
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::Upstream { .. } => StatusCode::BAD_GATEWAY,
        Error::Load { .. } | Error::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error wrapper so handlers can use `?` and still produce JSON bodies.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!(status = %status, "request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Builds the application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/deployments/{mode}/run", post(run_mode))
        .route("/health", get(health))
        .with_state(state)
}

/// POST /deployments/{mode}/run
async fn run_mode(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    Json(request): Json<RunRequest>,
) -> Result<Json<RunResponse>, ApiError> {
    // Mode resolution happens before anything else; an unknown slug must
    // fail without an upstream call.
    let mode: Mode = mode.parse()?;

    info!(
        mode = %mode,
        session_id = request.session_id.as_deref().unwrap_or("-"),
        query_len = request.query.len(),
        "running exchange"
    );

    let router = ModeRouter::new(
        &state.store,
        state.index.as_ref(),
        state.provider.as_ref(),
        &state.config,
    );
    let answer = router.run(mode, &request.query).await?;

    info!(
        mode = %mode,
        total_tokens = answer.usage.total_tokens,
        "exchange complete"
    );

    Ok(Json(RunResponse {
        answer: answer.answer,
    }))
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// Binds the configured address and serves until shutdown.
///
/// # Errors
///
/// Returns [`Error::Config`] if the address cannot be bound.
pub async fn serve(state: AppState) -> Result<(), Error> {
    let bind_addr = state.config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| Error::Config {
            message: format!("failed to bind {bind_addr}: {e}"),
        })?;

    info!(addr = %bind_addr, articles = state.store.len(), "listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Config {
            message: format!("server error: {e}"),
        })
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    if let Err(e) = ctrl_c.await {
        error!("failed to install shutdown handler: {e}");
    } else {
        info!("shutdown signal received");
    }
}
