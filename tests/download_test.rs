//! Format download tests

use mockito::Server;
use tiktokmaster::download::{part_path_for, save_format, DownloadError};
use tiktokmaster::models::Format;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one response announcing `Content-Length: 100000` but sending
/// only ten bytes before closing the connection
async fn spawn_truncating_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nContent-Length: 100000\r\n\r\n0123456789",
            )
            .await;
        let _ = socket.shutdown().await;
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_save_format_writes_body() {
    let mut server = Server::new_async().await;
    let body = vec![7u8; 64 * 1024];
    let mock = server
        .mock("GET", "/v720.mp4")
        .with_status(200)
        .with_header("content-type", "video/mp4")
        .with_body(&body)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested");
    let format = Format::new(
        "🎬 MP4 (720p)",
        "720p",
        format!("{}/v720.mp4", server.url()),
        "mp4",
    );

    let path = save_format(&reqwest::Client::new(), &format, "Dance", &out)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(path, out.join("Dance [720p].mp4"));
    assert_eq!(std::fs::read(&path).unwrap(), body);
}

#[tokio::test]
async fn test_save_format_rejects_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/gone.mp3")
        .with_status(403)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let format = Format::new(
        "🎧 MP3 (128k)",
        "128 kbps",
        format!("{}/gone.mp3", server.url()),
        "mp3",
    );

    let err = save_format(&reqwest::Client::new(), &format, "T", dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Status(403)));
    assert_eq!(err.to_string(), "Server returned HTTP 403");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_truncated_body_leaves_no_file() {
    let base = spawn_truncating_server().await;
    let dir = tempfile::tempdir().unwrap();
    let format = Format::new(
        "🎬 MP4 (720p)",
        "720p",
        format!("{}/v.mp4", base),
        "mp4",
    );

    let err = save_format(&reqwest::Client::new(), &format, "Dance", dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Request(_)));
    let final_path = dir.path().join("Dance [720p].mp4");
    assert!(!final_path.exists(), "partial download must not look finished");
    assert!(!part_path_for(&final_path).exists(), "partial file is cleaned up");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_completed_download_leaves_no_part_file() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/a.mp3")
        .with_status(200)
        .with_body("audio")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let format = Format::new(
        "🎧 MP3 (128k)",
        "128 kbps",
        format!("{}/a.mp3", server.url()),
        "mp3",
    );

    let path = save_format(&reqwest::Client::new(), &format, "T", dir.path())
        .await
        .unwrap();

    assert!(path.exists());
    assert!(!part_path_for(&path).exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
