//! Client side of the backend API
//!
//! - client: `DownloadApi` seam and its reqwest implementation

pub mod client;

pub use client::{
    ApiClient, ApiError, DownloadApi, DOWNLOAD_PATH, FETCH_FAILED_MESSAGE, UNKNOWN_ERROR_MESSAGE,
};
