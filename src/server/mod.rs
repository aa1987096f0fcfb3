//! Backend HTTP service
//!
//! Serves the endpoint the page posts to, plus a root banner and a health
//! check. Failures are answered as `{"detail": "..."}` so the client can
//! surface them verbatim.

pub mod extractor;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::signal;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::api::DOWNLOAD_PATH;
use crate::models::{DownloadRequest, ErrorBody, VideoInfo};
pub use extractor::{ExtractError, Extractor, YtDlp};

pub const WELCOME_MESSAGE: &str =
    "Welcome to the TIKTOKMASTER API. Use the /api/download endpoint to fetch videos.";
pub const NO_FORMATS_DETAIL: &str = "Could not find any downloadable formats for the given URL.";
pub const UNAVAILABLE_DETAIL: &str = "Invalid TikTok URL or video is private/unavailable.";
pub const INTERNAL_DETAIL: &str = "An internal server error occurred.";

/// Shared state injected into every handler
#[derive(Clone)]
pub struct ServerState {
    extractor: Arc<dyn Extractor>,
}

impl ServerState {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self { extractor }
    }
}

#[derive(Debug)]
pub struct ServerError {
    status: StatusCode,
    detail: String,
}

impl ServerError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl From<ExtractError> for ServerError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Unavailable(_) => Self::new(StatusCode::BAD_REQUEST, UNAVAILABLE_DETAIL),
            other => {
                tracing::error!("extraction failed: {}", other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL)
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.detail))).into_response()
    }
}

type ServerResult<T> = std::result::Result<T, ServerError>;

/// Router with all routes mounted
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(DOWNLOAD_PATH, post(download))
        .layer(cors_layer())
        .with_state(state)
}

/// Any origin may call the API with credentials, so the origin and
/// requested headers are mirrored back rather than answered with `*`
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Bind `addr` and serve until Ctrl+C
pub async fn serve(addr: SocketAddr, state: ServerState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {}", err);
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn download(
    State(state): State<ServerState>,
    payload: std::result::Result<Json<DownloadRequest>, JsonRejection>,
) -> ServerResult<Json<VideoInfo>> {
    let Json(request) = payload
        .map_err(|rejection| ServerError::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()))?;

    tracing::info!("extracting {}", request.url);
    let info = state.extractor.extract(&request.url).await?;

    if !info.has_formats() {
        return Err(ServerError::new(StatusCode::NOT_FOUND, NO_FORMATS_DETAIL));
    }

    tracing::debug!("returning {} formats for {}", info.formats.len(), request.url);
    Ok(Json(info))
}
