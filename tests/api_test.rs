//! Download API client tests
//!
//! Tests request shape, response parsing, and error detail handling.

use mockito::{Matcher, Server};
use tiktokmaster::api::{ApiClient, ApiError, DownloadApi, FETCH_FAILED_MESSAGE};

const VIDEO_JSON: &str = r#"{
    "title": "Dance challenge",
    "thumbnail": "https://p16.tiktokcdn.com/thumb.jpg",
    "duration": "0:15",
    "formats": [
        {"label": "🎧 MP3 (128k)", "quality": "128 kbps", "url": "https://cdn/a.mp3", "ext": "mp3"},
        {"label": "🎬 MP4 (1080p)", "quality": "1080p", "url": "https://cdn/v1080.mp4", "ext": "mp4"},
        {"label": "🎬 MP4 (720p) (No Audio)", "quality": "720p", "url": "https://cdn/v720.mp4", "ext": "mp4"}
    ]
}"#;

// =============================================================================
// Request Tests
// =============================================================================

#[tokio::test]
async fn test_posts_json_body_to_download_path() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/download")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "url": "https://www.tiktok.com/@user/video/1"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(VIDEO_JSON)
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let info = client
        .fetch_video_info("https://www.tiktok.com/@user/video/1")
        .await
        .unwrap();

    mock.assert_async().await;

    assert_eq!(info.title, "Dance challenge");
    assert_eq!(info.duration, "0:15");
    assert_eq!(info.formats.len(), 3);
    assert_eq!(info.formats[0].ext, "mp3");
    assert_eq!(info.formats[2].label, "🎬 MP4 (720p) (No Audio)");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/download")
        .with_status(200)
        .with_body(VIDEO_JSON)
        .create_async()
        .await;

    let client = ApiClient::new(format!("{}/", server.url()));
    assert!(client.fetch_video_info("u").await.is_ok());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_null_fields_default_to_empty() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/download")
        .with_status(200)
        .with_body(r#"{"title": null, "thumbnail": "t", "duration": "N/A", "formats": []}"#)
        .create_async()
        .await;

    let info = ApiClient::new(server.url())
        .fetch_video_info("u")
        .await
        .unwrap();

    assert_eq!(info.title, "");
    assert!(info.formats.is_empty());
}

// =============================================================================
// Error Tests
// =============================================================================

#[tokio::test]
async fn test_detail_is_surfaced() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/download")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Video not found"}"#)
        .create_async()
        .await;

    let err = ApiClient::new(server.url())
        .fetch_video_info("u")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Video not found");
}

#[tokio::test]
async fn test_missing_detail_falls_back() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/download")
        .with_status(500)
        .with_body(r#"{"error": "boom"}"#)
        .create_async()
        .await;

    let err = ApiClient::new(server.url())
        .fetch_video_info("u")
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), FETCH_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_non_json_error_body_falls_back() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/download")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = ApiClient::new(server.url())
        .fetch_video_info("u")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 502, .. }));
    assert_eq!(err.user_message(), FETCH_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_invalid_success_body_is_decode_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/download")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = ApiClient::new(server.url())
        .fetch_video_info("u")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
    assert!(!err.user_message().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Bind then release a port so nothing is listening on it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ApiClient::new(format!("http://127.0.0.1:{}", port));
    let err = client.fetch_video_info("u").await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert!(!err.user_message().is_empty());
}
