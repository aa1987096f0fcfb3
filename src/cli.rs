//! CLI - Command Line Interface for TikTokMaster
//!
//! Every page action is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Fetch the formats of a video
//! tiktokmaster fetch "https://www.tiktok.com/@user/video/123" --json
//!
//! # Save the second format to ~/Downloads
//! tiktokmaster fetch "https://www.tiktok.com/@user/video/123" --save 2
//!
//! # Flip the stored theme
//! tiktokmaster theme toggle
//!
//! # Run the backend
//! tiktokmaster serve --listen 0.0.0.0:8000
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::ThemeMode;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments (e.g. empty URL)
    InvalidArgs = 2,
    /// Backend unreachable or response unreadable
    NetworkError = 3,
    /// Backend rejected the request
    Rejected = 4,
    /// Backend found no downloadable formats
    NoFormats = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// TikTokMaster - download TikTok videos from the terminal
///
/// Run without arguments to launch the interactive page.
/// Use subcommands for scripting or to run the backend.
#[derive(Parser, Debug)]
#[command(
    name = "tiktokmaster",
    version,
    about = "Download TikTok videos, audio and images",
    long_about = "Paste a TikTok link, pick a format, save it.\n\n\
                  Run without arguments to launch the interactive page.\n\
                  Use subcommands for automation and to run the backend.",
    after_help = "EXAMPLES:\n\
                  tiktokmaster                              Launch interactive page\n\
                  tiktokmaster fetch <url>                  List formats\n\
                  tiktokmaster fetch <url> --save 1         Download the first format\n\
                  tiktokmaster serve                        Run the backend API"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config and TIKTOKMASTER_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the downloadable formats of a video
    #[command(visible_alias = "f")]
    Fetch(FetchCmd),

    /// Show or toggle the stored theme
    Theme(ThemeCmd),

    /// Run the backend API
    Serve(ServeCmd),
}

/// Submit a TikTok URL to the backend
#[derive(Args, Debug)]
pub struct FetchCmd {
    /// TikTok video URL
    pub url: String,

    /// Print the result card as HTML
    #[arg(long)]
    pub html: bool,

    /// Download the Nth format (1-based) after fetching
    #[arg(long, short = 's', value_name = "N")]
    pub save: Option<usize>,

    /// Directory for --save (default: config download_dir, then ~/Downloads)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}

/// Theme preference
#[derive(Args, Debug)]
pub struct ThemeCmd {
    #[command(subcommand)]
    pub action: Option<ThemeAction>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeAction {
    /// Print the stored theme (default)
    #[default]
    Show,
    /// Switch between dark and light
    Toggle,
}

/// Serve `POST /api/download` backed by yt-dlp
#[derive(Args, Debug)]
pub struct ServeCmd {
    /// Address to bind (default: config listen_addr, then 127.0.0.1:8000)
    #[arg(long, short = 'l')]
    pub listen: Option<String>,

    /// Path to the yt-dlp executable
    #[arg(long)]
    pub ytdlp: Option<PathBuf>,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Standard JSON output wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// `theme` response
#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeStatus {
    pub theme: ThemeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// `fetch --save` response
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedFile {
    pub format: String,
    pub path: PathBuf,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data as the JSON envelope, or `text` for humans
    pub fn print<T: Serialize>(&self, data: T, text: impl std::fmt::Display) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", text);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
