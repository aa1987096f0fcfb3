//! Configuration management for TikTokMaster
//!
//! Config is stored at ~/.config/tiktokmaster/config.toml. Every field is
//! optional; lookups fall back to the environment and then to defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Backend the client talks to when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Address `serve` binds when nothing else is configured
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

const API_URL_ENV: &str = "TIKTOKMASTER_API_URL";
const LISTEN_ENV: &str = "TIKTOKMASTER_LISTEN";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Base URL of the backend (without `/api/download`)
    pub api_base_url: Option<String>,
    /// Listen address for `serve`
    pub listen_addr: Option<String>,
    /// Path to the yt-dlp executable
    pub ytdlp_path: Option<PathBuf>,
    /// Where downloaded formats are written
    pub download_dir: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/tiktokmaster/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tiktokmaster").join("config.toml"))
    }

    /// Load config from the default file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from `path`; missing or malformed files yield defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Backend base URL with fallback chain:
    /// 1. Explicit override (`--api-url`)
    /// 2. Environment variable TIKTOKMASTER_API_URL
    /// 3. Config file
    /// 4. DEFAULT_API_URL
    pub fn api_base_url(&self, explicit: Option<&str>) -> String {
        if let Some(url) = explicit {
            return url.to_string();
        }
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                return url;
            }
        }
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Listen address with the same fallback chain as `api_base_url`
    pub fn listen_addr(&self, explicit: Option<&str>) -> Result<SocketAddr> {
        let raw = explicit
            .map(str::to_string)
            .or_else(|| std::env::var(LISTEN_ENV).ok().filter(|v| !v.trim().is_empty()))
            .or_else(|| self.listen_addr.clone())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

        raw.parse()
            .with_context(|| format!("invalid listen address '{}'", raw))
    }

    /// Download directory, falling back to the platform Downloads folder
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(crate::download::default_download_dir)
    }
}
