//! Client for the `POST /api/download` endpoint
//!
//! `DownloadApi` is the seam the submission controller depends on;
//! `ApiClient` is the reqwest implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DownloadRequest, ErrorBody, VideoInfo};

/// Fixed endpoint path
pub const DOWNLOAD_PATH: &str = "/api/download";

/// Message for a non-2xx response without a usable `detail`
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch video data.";

/// Message for a failure that carries no text of its own
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("{}", status_message(.detail))]
    Status { status: u16, detail: Option<String> },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    /// The task running the request ended without producing a response
    #[error("{0}")]
    Aborted(String),
}

fn status_message(detail: &Option<String>) -> &str {
    match detail.as_deref() {
        Some(d) if !d.is_empty() => d,
        _ => FETCH_FAILED_MESSAGE,
    }
}

impl ApiError {
    /// Text shown in the error area
    pub fn user_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            msg
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Backend that turns a video URL into `VideoInfo`
#[async_trait]
pub trait DownloadApi: Send + Sync {
    async fn fetch_video_info(&self, url: &str) -> Result<VideoInfo, ApiError>;
}

/// reqwest client for the backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the backend at `base_url` (e.g. `http://127.0.0.1:8000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), DOWNLOAD_PATH)
    }
}

#[async_trait]
impl DownloadApi for ApiClient {
    async fn fetch_video_info(&self, url: &str) -> Result<VideoInfo, ApiError> {
        let endpoint = self.endpoint();
        tracing::debug!("POST {} url={}", endpoint, url);

        let response = self
            .client
            .post(&endpoint)
            .json(&DownloadRequest {
                url: url.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail);
            tracing::info!("backend returned HTTP {} detail={:?}", status, detail);
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let info: VideoInfo = serde_json::from_str(&body)?;
        tracing::debug!("received {} formats for '{}'", info.formats.len(), info.title);
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_uses_detail() {
        let err = ApiError::Status {
            status: 404,
            detail: Some("Video not found".into()),
        };
        assert_eq!(err.user_message(), "Video not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_status_message_falls_back() {
        let missing = ApiError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(missing.user_message(), FETCH_FAILED_MESSAGE);

        let empty = ApiError::Status {
            status: 500,
            detail: Some(String::new()),
        };
        assert_eq!(empty.user_message(), FETCH_FAILED_MESSAGE);
    }

    #[test]
    fn test_empty_message_becomes_unknown_error() {
        let err = ApiError::Aborted(String::new());
        assert_eq!(err.user_message(), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(
            ApiClient::new("http://127.0.0.1:8000/").endpoint(),
            "http://127.0.0.1:8000/api/download"
        );
        assert_eq!(
            ApiClient::new("http://localhost:5173").endpoint(),
            "http://localhost:5173/api/download"
        );
    }
}
