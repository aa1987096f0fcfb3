//! TikTokMaster - download TikTok videos from the terminal
//!
//! Paste a link, pick a format, save it. The same page model drives the
//! interactive TUI, the scriptable CLI and the HTML result card; `serve`
//! runs the backend the page talks to.
//!
//! # Modules
//!
//! - `models` - Wire types (video info, formats, error body) and theme mode
//! - `page` - Page view model (input, submit control, result/error areas)
//! - `render` - Result card and error rendering
//! - `theme` - Theme controller over a key-value store
//! - `submit` - URL submission controller
//! - `api` - Client for `POST /api/download`
//! - `server` - Backend service and yt-dlp extraction
//! - `ui` - TUI components
//! - `app` - Application state and key handling

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod download;
pub mod logging;
pub mod models;
pub mod page;
pub mod render;
pub mod server;
pub mod storage;
pub mod submit;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use models::{DownloadRequest, ErrorBody, Format, ThemeMode, VideoInfo};

pub use api::{ApiClient, ApiError, DownloadApi};
pub use app::{Action, App, InputMode};
pub use page::Page;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use submit::{SubmissionController, SubmitOutcome};
pub use theme::ThemeController;
