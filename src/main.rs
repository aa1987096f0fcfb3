//! TikTokMaster - download TikTok videos from the terminal
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive page
//! tiktokmaster
//!
//! # CLI mode (for automation)
//! tiktokmaster fetch "https://www.tiktok.com/@user/video/123" --json
//! tiktokmaster theme toggle
//! tiktokmaster serve --listen 0.0.0.0:8000
//! ```

use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::task::JoinHandle;

use tiktokmaster::api::{ApiClient, ApiError, DownloadApi};
use tiktokmaster::app::{Action, App};
use tiktokmaster::cli::{Cli, Command, ExitCode, Output};
use tiktokmaster::commands;
use tiktokmaster::config::Config;
use tiktokmaster::download::{self, DownloadError};
use tiktokmaster::logging;
use tiktokmaster::models::VideoInfo;
use tiktokmaster::storage::{FileStore, KeyValueStore, MemoryStore};
use tiktokmaster::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        logging::init_stderr_logging(cli.quiet || cli.json);
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: the terminal is ours, so logs go to a file
        if let Err(e) = logging::init_file_logging() {
            eprintln!("Logging disabled: {:#}", e);
        }
        let config = commands::load_config(cli.config.as_deref());
        run_tui(config, cli.api_url).await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let config = commands::load_config(cli.config.as_deref());
    let api_url = cli.api_url.as_deref();

    match cli.command {
        Some(Command::Fetch(cmd)) => commands::fetch_cmd(cmd, &config, api_url, &output).await,

        Some(Command::Theme(cmd)) => commands::theme_cmd(cmd, &output),

        Some(Command::Serve(cmd)) => commands::serve_cmd(cmd, &config, &output).await,

        None => {
            // This shouldn't happen (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Theme store for the TUI, in memory when no data dir exists
fn open_store() -> Box<dyn KeyValueStore> {
    match FileStore::default_path() {
        Some(path) => Box::new(FileStore::open(path)),
        None => {
            tracing::warn!("no data directory, theme preference will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

/// Run interactive TUI
async fn run_tui(config: Config, api_url: Option<String>) -> Result<()> {
    let base_url = config.api_base_url(api_url.as_deref());
    tracing::info!("starting TUI against {}", base_url);

    let api: Arc<dyn DownloadApi> = Arc::new(ApiClient::new(base_url));
    let mut app = App::new(api, open_store());

    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app, &config).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Background work started from the event loop
#[derive(Default)]
struct Tasks {
    fetch: Option<(u64, JoinHandle<Result<VideoInfo, ApiError>>)>,
    download: Option<JoinHandle<Result<PathBuf, DownloadError>>>,
}

impl Tasks {
    fn spawn(&mut self, action: Action, app: &App, config: &Config) {
        match action {
            Action::None => {}
            Action::Fetch(ticket) => {
                let api = app.api();
                let handle =
                    tokio::spawn(async move { api.fetch_video_info(&ticket.url).await });
                self.fetch = Some((ticket.token, handle));
            }
            Action::Download { format, title } => {
                let dir = config.download_dir();
                let handle = tokio::spawn(async move {
                    let client = reqwest::Client::new();
                    download::save_format(&client, &format, &title, &dir).await
                });
                self.download = Some(handle);
            }
        }
    }

    /// Hand finished tasks back to the app
    async fn collect(&mut self, app: &mut App) {
        if self.fetch.as_ref().is_some_and(|(_, h)| h.is_finished()) {
            if let Some((token, handle)) = self.fetch.take() {
                let result = handle
                    .await
                    .unwrap_or_else(|e| Err(ApiError::Aborted(e.to_string())));
                app.complete_fetch(token, result);
            }
        }

        if self.download.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = self.download.take() {
                let result = handle
                    .await
                    .unwrap_or_else(|e| Err(DownloadError::Aborted(e.to_string())));
                app.finish_download(result);
            }
        }
    }
}

/// Main event loop - handles input, updates state, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App, config: &Config) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let mut tasks = Tasks::default();

    while app.running {
        // Render current state
        terminal.draw(|frame| ui::render_ui(frame, app))?;

        // Poll for events with timeout so finished tasks are picked up
        if event::poll(TICK_RATE)? {
            match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let action = app.handle_key(key);
                    tasks.spawn(action, app, config);
                }
                Event::Paste(text) => app.handle_paste(&text),
                _ => {}
            }
        }

        tasks.collect(app).await;
    }

    Ok(())
}
