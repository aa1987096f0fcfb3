//! Data structures shared by the client, the renderer and the backend
//!
//! - **Video**: `VideoInfo` and its ordered `Format` list
//! - **Wire**: request and error bodies of `POST /api/download`
//! - **Theme**: the persisted dark/light preference

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Video Models
// =============================================================================

/// One downloadable variant of a video
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Format {
    #[serde(default, deserialize_with = "string_or_null")]
    pub label: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub quality: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub url: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub ext: String,
}

impl Format {
    pub fn new(
        label: impl Into<String>,
        quality: impl Into<String>,
        url: impl Into<String>,
        ext: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            quality: quality.into(),
            url: url.into(),
            ext: ext.into(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] .{}", self.label, self.quality, self.ext)
    }
}

/// Metadata plus format list returned for a submitted URL
///
/// Fields the backend leaves out or sends as `null` become empty strings;
/// nothing else is validated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub duration: String,
    #[serde(default)]
    pub formats: Vec<Format>,
}

impl VideoInfo {
    pub fn has_formats(&self) -> bool {
        !self.formats.is_empty()
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Wire Models
// =============================================================================

/// Body of `POST /api/download`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
}

/// Body of a non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }
}

// =============================================================================
// Theme Preference
// =============================================================================

/// Visual mode of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Resolve a stored preference. Only an explicit `"light"` selects light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => ThemeMode::Light,
            _ => ThemeMode::Dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}
