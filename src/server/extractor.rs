//! Video metadata extraction via yt-dlp
//!
//! `YtDlp` runs `yt-dlp --dump-single-json` and `build_video_info` turns its
//! metadata into the ordered format list the page renders: best audio track
//! first, then every video format with a height, falling back to slideshow
//! images when neither exists.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Format, VideoInfo};

/// Extraction error types
#[derive(Error, Debug)]
pub enum ExtractError {
    /// yt-dlp rejected the URL (private, removed, not a video)
    #[error("video unavailable: {0}")]
    Unavailable(String),

    #[error("failed to run yt-dlp: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("yt-dlp returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Source of `VideoInfo` for a URL
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<VideoInfo, ExtractError>;
}

// =============================================================================
// yt-dlp metadata
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInfo {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration_string: Option<String>,
    #[serde(default)]
    pub formats: Option<Vec<RawFormat>>,
    #[serde(default)]
    pub images: Option<Vec<RawImage>>,
    #[serde(default)]
    pub entries: Option<Vec<RawInfo>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    pub url: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    /// Kept as yt-dlp wrote it, so `128` and `128.0` label differently
    pub abr: Option<serde_json::Number>,
    pub height: Option<u32>,
}

impl RawFormat {
    fn is_audio_only(&self) -> bool {
        self.vcodec.as_deref() == Some("none")
    }

    fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }

    fn bitrate(&self) -> f64 {
        self.abr.as_ref().and_then(|n| n.as_f64()).unwrap_or(0.0)
    }

    fn bitrate_label(&self) -> String {
        self.abr
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "0".to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

fn dimension(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
}

/// Build the page payload from yt-dlp metadata
pub fn build_video_info(mut info: RawInfo) -> VideoInfo {
    // A user page or playlist resolves to its first entry
    if let Some(first) = info.entries.take().and_then(|e| e.into_iter().next()) {
        info = first;
    }

    let raw_formats = info.formats.unwrap_or_default();
    let mut formats = Vec::new();

    let best_audio = raw_formats
        .iter()
        .filter(|f| f.is_audio_only() && f.has_url())
        .fold(None::<&RawFormat>, |best, f| match best {
            Some(b) if b.bitrate() >= f.bitrate() => Some(b),
            _ => Some(f),
        });

    if let Some(audio) = best_audio {
        let abr = audio.bitrate_label();
        formats.push(Format::new(
            format!("🎧 MP3 ({}k)", abr),
            format!("{} kbps", abr),
            audio.url.clone().unwrap_or_default(),
            "mp3",
        ));
    }

    for f in raw_formats.iter().filter(|f| f.has_url() && !f.is_audio_only()) {
        let Some(height) = f.height.filter(|h| *h > 0) else {
            continue;
        };

        let mut label = format!("🎬 MP4 ({}p)", height);
        if f.acodec.as_deref() == Some("none") {
            label.push_str(" (No Audio)");
        }
        formats.push(Format::new(
            label,
            format!("{}p", height),
            f.url.clone().unwrap_or_default(),
            "mp4",
        ));
    }

    if formats.is_empty() {
        for (i, img) in info.images.unwrap_or_default().into_iter().enumerate() {
            let Some(url) = img.url else { continue };
            formats.push(Format::new(
                format!("🖼️ Image {}", i + 1),
                format!("{}x{}", dimension(img.width), dimension(img.height)),
                url,
                "jpg",
            ));
        }
    }

    VideoInfo {
        title: info.title.unwrap_or_default(),
        thumbnail: info.thumbnail.unwrap_or_default(),
        duration: info.duration_string.unwrap_or_else(|| "N/A".to_string()),
        formats,
    }
}

// =============================================================================
// yt-dlp process
// =============================================================================

/// Extractor backed by the `yt-dlp` executable
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Check that the binary runs
    pub async fn is_available(&self) -> bool {
        tokio::process::Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        let bin_name = if cfg!(target_os = "windows") {
            "yt-dlp.exe"
        } else {
            "yt-dlp"
        };
        Self::new(bin_name)
    }
}

#[async_trait]
impl Extractor for YtDlp {
    async fn extract(&self, url: &str) -> Result<VideoInfo, ExtractError> {
        let output = tokio::process::Command::new(&self.binary)
            .args(["--dump-single-json", "--no-warnings", "--no-playlist", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("yt-dlp failed for {}: {}", url, stderr.trim());
            return Err(ExtractError::Unavailable(stderr.trim().to_string()));
        }

        let raw: RawInfo = serde_json::from_slice(&output.stdout)?;
        Ok(build_video_info(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> VideoInfo {
        build_video_info(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_best_audio_first_then_videos_in_order() {
        let info = parse(
            r#"{
            "title": "Dance",
            "thumbnail": "https://p16.tiktokcdn.com/t.jpg",
            "duration_string": "0:15",
            "formats": [
                {"url": "a64", "vcodec": "none", "acodec": "aac", "abr": 64},
                {"url": "v540", "vcodec": "h264", "acodec": "aac", "height": 540},
                {"url": "a128", "vcodec": "none", "acodec": "aac", "abr": 128},
                {"url": "v1080", "vcodec": "h265", "acodec": "none", "height": 1080}
            ]
        }"#,
        );

        assert_eq!(info.title, "Dance");
        assert_eq!(info.duration, "0:15");
        let urls: Vec<&str> = info.formats.iter().map(|f| f.url.as_str()).collect();
        assert_eq!(urls, ["a128", "v540", "v1080"]);

        assert_eq!(info.formats[0].label, "🎧 MP3 (128k)");
        assert_eq!(info.formats[0].quality, "128 kbps");
        assert_eq!(info.formats[0].ext, "mp3");
        assert_eq!(info.formats[1].label, "🎬 MP4 (540p)");
        assert_eq!(info.formats[2].label, "🎬 MP4 (1080p) (No Audio)");
        assert_eq!(info.formats[2].quality, "1080p");
        assert_eq!(info.formats[2].ext, "mp4");
    }

    #[test]
    fn test_audio_label_keeps_bitrate_as_reported() {
        let info = parse(
            r#"{"formats": [
                {"url": "a48", "vcodec": "none", "abr": 48.5},
                {"url": "a128", "vcodec": "none", "abr": 128.0}
            ]}"#,
        );
        assert_eq!(info.formats[0].url, "a128");
        assert_eq!(info.formats[0].label, "🎧 MP3 (128.0k)");
        assert_eq!(info.formats[0].quality, "128.0 kbps");

        let info = parse(r#"{"formats": [{"url": "a", "vcodec": "none"}]}"#);
        assert_eq!(info.formats[0].label, "🎧 MP3 (0k)");
        assert_eq!(info.formats[0].quality, "0 kbps");
    }

    #[test]
    fn test_formats_without_url_or_height_are_skipped() {
        let info = parse(
            r#"{
            "formats": [
                {"vcodec": "h264", "height": 720},
                {"url": "", "vcodec": "h264", "height": 720},
                {"url": "nohd", "vcodec": "h264"},
                {"url": "zero", "vcodec": "h264", "height": 0},
                {"url": "ok", "height": 360}
            ]
        }"#,
        );
        let urls: Vec<&str> = info.formats.iter().map(|f| f.url.as_str()).collect();
        assert_eq!(urls, ["ok"]);
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let info = parse(r#"{"formats": []}"#);
        assert_eq!(info.title, "");
        assert_eq!(info.thumbnail, "");
        assert_eq!(info.duration, "N/A");
        assert!(info.formats.is_empty());
    }

    #[test]
    fn test_image_post_fallback() {
        let info = parse(
            r#"{
            "title": "Slides",
            "images": [
                {"url": "i1", "width": 1080, "height": 1920},
                {"url": "i2"}
            ]
        }"#,
        );
        assert_eq!(info.formats.len(), 2);
        assert_eq!(info.formats[0].label, "🖼️ Image 1");
        assert_eq!(info.formats[0].quality, "1080x1920");
        assert_eq!(info.formats[0].ext, "jpg");
        assert_eq!(info.formats[1].label, "🖼️ Image 2");
        assert_eq!(info.formats[1].quality, "?x?");
    }

    #[test]
    fn test_images_ignored_when_formats_exist() {
        let info = parse(
            r#"{
            "formats": [{"url": "v", "vcodec": "h264", "height": 720}],
            "images": [{"url": "i1"}]
        }"#,
        );
        assert_eq!(info.formats.len(), 1);
        assert_eq!(info.formats[0].url, "v");
    }

    #[test]
    fn test_first_entry_of_playlist_used() {
        let info = parse(
            r#"{
            "title": "user page",
            "entries": [
                {"title": "first", "formats": [{"url": "v", "vcodec": "h264", "height": 720}]},
                {"title": "second"}
            ]
        }"#,
        );
        assert_eq!(info.title, "first");
        assert_eq!(info.formats.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let ytdlp = YtDlp::new("/nonexistent/yt-dlp-binary");
        assert!(!ytdlp.is_available().await);
        let err = ytdlp.extract("https://www.tiktok.com/@a/video/1").await.unwrap_err();
        assert!(matches!(err, ExtractError::Spawn(_)));
    }
}
