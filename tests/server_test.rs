//! Backend API tests
//!
//! Runs the router on an ephemeral port with a scripted extractor and talks
//! to it over HTTP, with reqwest directly and through `ApiClient`.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tiktokmaster::api::{ApiClient, DownloadApi};
use tiktokmaster::models::{Format, VideoInfo};
use tiktokmaster::server::{
    self, ExtractError, Extractor, ServerState, INTERNAL_DETAIL, NO_FORMATS_DETAIL,
    UNAVAILABLE_DETAIL, WELCOME_MESSAGE,
};

/// Answers by URL: "ok", "empty", "private", anything else fails to spawn
struct ScriptedExtractor;

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract(&self, url: &str) -> Result<VideoInfo, ExtractError> {
        match url {
            "ok" => Ok(VideoInfo {
                title: "T".into(),
                thumbnail: "X".into(),
                duration: "0:30".into(),
                formats: vec![
                    Format::new("🎧 MP3 (128k)", "128 kbps", "a", "mp3"),
                    Format::new("🎬 MP4 (720p)", "720p", "u1", "mp4"),
                ],
            }),
            "empty" => Ok(VideoInfo {
                title: "T".into(),
                duration: "N/A".into(),
                ..VideoInfo::default()
            }),
            "private" => Err(ExtractError::Unavailable(
                "ERROR: This video is private".into(),
            )),
            _ => Err(ExtractError::Spawn(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "yt-dlp not found",
            ))),
        }
    }
}

async fn spawn_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = server::router(ServerState::new(Arc::new(ScriptedExtractor)));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn post_download(addr: SocketAddr, body: serde_json::Value) -> (u16, serde_json::Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/download", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

// =============================================================================
// Informational routes
// =============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let root: serde_json::Value = client
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(root["message"], WELCOME_MESSAGE);

    let health = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status().as_u16(), 200);
    let health: serde_json::Value = health.json().await.unwrap();
    assert_eq!(health, serde_json::json!({"status": "ok"}));
}

// =============================================================================
// /api/download
// =============================================================================

#[tokio::test]
async fn test_download_returns_video_info() {
    let addr = spawn_server().await;
    let (status, body) = post_download(addr, serde_json::json!({"url": "ok"})).await;

    assert_eq!(status, 200);
    assert_eq!(body["title"], "T");
    assert_eq!(body["formats"][0]["ext"], "mp3");
    assert_eq!(body["formats"][1]["url"], "u1");
}

#[tokio::test]
async fn test_no_formats_is_404() {
    let addr = spawn_server().await;
    let (status, body) = post_download(addr, serde_json::json!({"url": "empty"})).await;

    assert_eq!(status, 404);
    assert_eq!(body["detail"], NO_FORMATS_DETAIL);
}

#[tokio::test]
async fn test_unavailable_is_400() {
    let addr = spawn_server().await;
    let (status, body) = post_download(addr, serde_json::json!({"url": "private"})).await;

    assert_eq!(status, 400);
    assert_eq!(body["detail"], UNAVAILABLE_DETAIL);
}

#[tokio::test]
async fn test_extractor_failure_is_500() {
    let addr = spawn_server().await;
    let (status, body) = post_download(addr, serde_json::json!({"url": "boom"})).await;

    assert_eq!(status, 500);
    assert_eq!(body["detail"], INTERNAL_DETAIL);
}

#[tokio::test]
async fn test_missing_url_field_is_422() {
    let addr = spawn_server().await;
    let (status, body) = post_download(addr, serde_json::json!({"link": "ok"})).await;

    assert_eq!(status, 422);
    assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));
}

// =============================================================================
// Cross-origin access
// =============================================================================

const PAGE_ORIGIN: &str = "http://localhost:5173";

#[tokio::test]
async fn test_preflight_allows_page_origin() {
    let addr = spawn_server().await;
    let response = reqwest::Client::new()
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{}/api/download", addr),
        )
        .header("Origin", PAGE_ORIGIN)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], PAGE_ORIGIN);
    assert_eq!(headers["access-control-allow-credentials"], "true");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"), "allowed methods: {}", methods);
    let allowed = headers["access-control-allow-headers"].to_str().unwrap();
    assert!(allowed.contains("content-type"), "allowed headers: {}", allowed);
}

#[tokio::test]
async fn test_cross_origin_post_carries_allow_origin() {
    let addr = spawn_server().await;
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/download", addr))
        .header("Origin", PAGE_ORIGIN)
        .json(&serde_json::json!({"url": "ok"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        PAGE_ORIGIN
    );
}

// =============================================================================
// Client against server
// =============================================================================

#[tokio::test]
async fn test_client_round_trip() {
    let addr = spawn_server().await;
    let client = ApiClient::new(format!("http://{}", addr));

    let info = client.fetch_video_info("ok").await.unwrap();
    assert_eq!(info.formats.len(), 2);

    let err = client.fetch_video_info("private").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), UNAVAILABLE_DETAIL);
}
