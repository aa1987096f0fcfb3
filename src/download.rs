//! Saving a format to disk
//!
//! Terminal counterpart of the page's `download` links: the format URL is
//! streamed into `<dir>/<title> [<quality>].<ext>`.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::models::Format;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Server returned HTTP {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The task running the download ended without finishing it
    #[error("Download interrupted: {0}")]
    Aborted(String),
}

/// Default download directory (platform Downloads, else current dir)
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// File name for a format of the video titled `title`
pub fn file_name_for(title: &str, format: &Format) -> String {
    let stem = if title.trim().is_empty() {
        "video"
    } else {
        title.trim()
    };
    let name = if format.quality.is_empty() {
        format!("{}.{}", stem, format.ext)
    } else {
        format!("{} [{}].{}", stem, format.quality, format.ext)
    };
    sanitize_filename::sanitize(name)
}

/// Temporary name used while the body streams in
pub fn part_path_for(path: &Path) -> PathBuf {
    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

/// Stream `format.url` into `dir`, returning the written path.
///
/// The body goes to `<name>.part` and is renamed once complete; on any
/// error the partial file is removed.
pub async fn save_format(
    client: &reqwest::Client,
    format: &Format,
    title: &str,
    dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let path = dir.join(file_name_for(title, format));
    let part_path = part_path_for(&path);

    tracing::info!("downloading {} to {}", format.label, path.display());
    let response = client.get(&format.url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status(status.as_u16()));
    }

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| DownloadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let written = match stream_to_file(response, &part_path).await {
        Ok(written) => written,
        Err(e) => {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e);
        }
    };

    if let Err(source) = tokio::fs::rename(&part_path, &path).await {
        let _ = tokio::fs::remove_file(&part_path).await;
        return Err(DownloadError::Io { path, source });
    }

    tracing::info!("saved {} bytes to {}", written, path.display());
    Ok(path)
}

async fn stream_to_file(
    response: reqwest::Response,
    part_path: &Path,
) -> Result<u64, DownloadError> {
    let io_err = |source| DownloadError::Io {
        path: part_path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(part_path).await.map_err(io_err)?;

    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;

    Ok(written)
}
