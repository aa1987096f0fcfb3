//! CLI Command Handlers
//!
//! Each handler takes CLI args and Output, returns ExitCode. `fetch` drives
//! the same page model and submission controller as the interactive page.

use std::path::Path;
use std::sync::Arc;

use crate::api::{ApiClient, ApiError, DownloadApi};
use crate::cli::{
    ExitCode, FetchCmd, Output, SavedFile, ServeCmd, ThemeAction, ThemeCmd, ThemeStatus,
};
use crate::config::Config;
use crate::download;
use crate::page::Page;
use crate::render::ResultView;
use crate::server::{self, ServerState, YtDlp};
use crate::storage::FileStore;
use crate::submit::{SubmissionController, SubmitOutcome, EMPTY_URL_MESSAGE};
use crate::theme::ThemeController;

/// Load the config from `--config`, or the default location
pub fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    }
}

/// Exit code for a failed request
pub fn exit_code_for(err: &ApiError) -> ExitCode {
    match err {
        ApiError::Status { status: 404, .. } => ExitCode::NoFormats,
        ApiError::Status { .. } => ExitCode::Rejected,
        ApiError::Network(_) | ApiError::Decode(_) => ExitCode::NetworkError,
        ApiError::Aborted(_) => ExitCode::Error,
    }
}

/// Plain-text rendering of the result card
pub fn format_result(view: &ResultView) -> String {
    let mut out = String::new();
    out.push_str(&view.title);
    out.push('\n');
    out.push_str(&view.duration_text);
    out.push('\n');
    out.push_str(&format!("Thumbnail: {}\n", view.thumbnail_src));
    if view.links.is_empty() {
        return out;
    }

    out.push('\n');
    for (i, link) in view.links.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {}  [{}]\n     {}\n",
            i + 1,
            link.text,
            link.format.ext,
            link.href
        ));
    }
    out
}

// =============================================================================
// Fetch Command
// =============================================================================

pub async fn fetch_cmd(
    cmd: FetchCmd,
    config: &Config,
    api_url: Option<&str>,
    output: &Output,
) -> ExitCode {
    let client = ApiClient::new(config.api_base_url(api_url));
    output.info(format!("Fetching from {}", client.endpoint()));

    let mut page = Page::with_input(cmd.url.as_str());
    let mut controller = SubmissionController::new(Arc::new(client));

    let ticket = match controller.begin(&mut page) {
        Ok(ticket) => ticket,
        Err(SubmitOutcome::Invalid) => {
            return output.error(EMPTY_URL_MESSAGE, ExitCode::InvalidArgs);
        }
        Err(other) => return output.error(format!("{:?}", other), ExitCode::Error),
    };

    let result = controller.api().fetch_video_info(&ticket.url).await;
    let (info, code) = match &result {
        Ok(info) => (Some(info.clone()), ExitCode::Success),
        Err(e) => (None, exit_code_for(e)),
    };

    match controller.complete(&mut page, ticket.token, result) {
        SubmitOutcome::Displayed => {}
        SubmitOutcome::Failed(message) => return output.error(message, code),
        other => return output.error(format!("{:?}", other), ExitCode::Error),
    }

    let (Some(info), Some(view)) = (info, page.visible_result()) else {
        return output.error("No result to show", ExitCode::Error);
    };

    if let Some(n) = cmd.save {
        let Some(format) = n.checked_sub(1).and_then(|i| info.formats.get(i)) else {
            return output.error(
                format!(
                    "Format {} does not exist ({} available)",
                    n,
                    info.formats.len()
                ),
                ExitCode::InvalidArgs,
            );
        };

        let dir = cmd
            .output_dir
            .clone()
            .unwrap_or_else(|| config.download_dir());
        output.info(format!("Downloading {}...", format.label));

        let http = reqwest::Client::new();
        return match download::save_format(&http, format, &info.title, &dir).await {
            Ok(path) => {
                let text = format!("Saved {}", path.display());
                let saved = SavedFile {
                    format: format.label.clone(),
                    path,
                };
                match output.print(&saved, text) {
                    Ok(()) => ExitCode::Success,
                    Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
                }
            }
            Err(e) => output.error(format!("Download failed: {}", e), ExitCode::NetworkError),
        };
    }

    let printed = if cmd.html {
        let html = view.to_html();
        output.print(&html, &html)
    } else {
        output.print(&info, format_result(view))
    };

    match printed {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Theme Command
// =============================================================================

pub fn theme_cmd(cmd: ThemeCmd, output: &Output) -> ExitCode {
    let Some(path) = FileStore::default_path() else {
        return output.error("Could not determine data directory", ExitCode::Error);
    };

    let mut page = Page::new();
    let mut theme = ThemeController::new(FileStore::open(&path));
    let mut mode = theme.init(&mut page);

    if cmd.action.unwrap_or_default() == ThemeAction::Toggle {
        mode = theme.toggle_theme(&mut page);
        tracing::info!("theme switched to {}", mode);
    }

    let status = ThemeStatus {
        theme: mode,
        path: Some(path),
    };
    match output.print(&status, mode) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

pub async fn serve_cmd(cmd: ServeCmd, config: &Config, output: &Output) -> ExitCode {
    let addr = match config.listen_addr(cmd.listen.as_deref()) {
        Ok(addr) => addr,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
    };

    let ytdlp = cmd
        .ytdlp
        .or_else(|| config.ytdlp_path.clone())
        .map(YtDlp::new)
        .unwrap_or_default();

    if !ytdlp.is_available().await {
        tracing::warn!(
            "{} did not run; requests will fail until it is installed",
            ytdlp.binary().display()
        );
        output.info(format!(
            "Warning: {} not found or not executable",
            ytdlp.binary().display()
        ));
    }

    output.info(format!("Listening on http://{}", addr));
    let state = ServerState::new(Arc::new(ytdlp));
    match server::serve(addr, state).await {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Server failed: {:#}", e), ExitCode::Error),
    }
}
